//! Header analysis for Vitibrasil wide files.
//!
//! Classifies every column of a wide header before any cell is parsed: key
//! columns are located by name and each remaining label becomes a tagged
//! [`YearColumn`]. Export/import files carry each year twice, first as a
//! quantity column and then as a value column, either written as `YYYY` /
//! `YYYY.1` or as two identical `YYYY` labels.

use crate::constants::{commerce_columns, trade_columns, VALUE_YEAR_SUFFIX};
use crate::error::{Result, VitiError};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static YEAR_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\.1)?$").expect("year label pattern is valid"));

/// Semantic meaning of a year column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearColumn {
    Quantity(i32),
    Value(i32),
}

impl YearColumn {
    /// Interpret a single label in isolation: a trailing `.1` marks the value
    /// variant and is stripped from the year. Only a trailing `.1` counts.
    pub fn from_label(label: &str) -> Option<Self> {
        let caps = YEAR_LABEL.captures(label.trim())?;
        let year = caps.get(1)?.as_str().parse().ok()?;
        if caps.get(2).is_some() {
            Some(YearColumn::Value(year))
        } else {
            Some(YearColumn::Quantity(year))
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            YearColumn::Quantity(year) | YearColumn::Value(year) => *year,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, YearColumn::Value(_))
    }
}

/// Column positions of an export/import wide file
#[derive(Debug, Clone, PartialEq)]
pub struct TradeLayout {
    pub id_index: usize,
    pub country_index: usize,
    pub years: Vec<(usize, YearColumn)>,
}

impl TradeLayout {
    pub fn analyze(file: &str, headers: &[String]) -> Result<Self> {
        let id_index = require_column(file, headers, trade_columns::ID)?;
        let country_index = require_column(file, headers, trade_columns::COUNTRY)?;

        let mut seen: HashMap<i32, (bool, bool)> = HashMap::new();
        let mut years = Vec::new();

        for (index, label) in headers.iter().enumerate() {
            if index == id_index || index == country_index {
                continue;
            }

            let parsed = YearColumn::from_label(label).ok_or_else(|| {
                VitiError::schema(file, format!("column '{}' is not a year label", label))
            })?;

            let year = parsed.year();
            let (has_quantity, has_value) = seen.entry(year).or_default();
            let column = match parsed {
                YearColumn::Value(_) if *has_value => {
                    return Err(VitiError::schema(
                        file,
                        format!("value column for {} appears more than once", year),
                    ));
                }
                YearColumn::Value(_) => {
                    *has_value = true;
                    parsed
                }
                // A repeated bare year is the value column of a raw export
                YearColumn::Quantity(_) if *has_quantity && !*has_value => {
                    *has_value = true;
                    YearColumn::Value(year)
                }
                YearColumn::Quantity(_) if *has_quantity => {
                    return Err(VitiError::schema(
                        file,
                        format!("year {} appears more than twice", year),
                    ));
                }
                YearColumn::Quantity(_) => {
                    *has_quantity = true;
                    parsed
                }
            };

            years.push((index, column));
        }

        if let Some((_, column)) = years
            .iter()
            .find(|(_, c)| seen.get(&c.year()) != Some(&(true, true)))
        {
            let missing = if column.is_value() { "quantity" } else { "value" };
            return Err(VitiError::schema(
                file,
                format!("year {} has no {} column", column.year(), missing),
            ));
        }

        debug!(
            "Trade layout for {}: {} year columns over {} distinct years",
            file,
            years.len(),
            seen.len()
        );

        Ok(Self {
            id_index,
            country_index,
            years,
        })
    }

    /// Number of distinct calendar years covered by the header
    pub fn distinct_years(&self) -> usize {
        let mut years: Vec<i32> = self.years.iter().map(|(_, c)| c.year()).collect();
        years.sort_unstable();
        years.dedup();
        years.len()
    }
}

/// Column positions of a commercialization wide file
#[derive(Debug, Clone, PartialEq)]
pub struct CommerceLayout {
    pub id_index: usize,
    pub product_index: usize,
    pub years: Vec<(usize, i32)>,
}

impl CommerceLayout {
    pub fn analyze(file: &str, headers: &[String]) -> Result<Self> {
        let id_index = require_column(file, headers, commerce_columns::ID)?;
        let control_index = require_column(file, headers, commerce_columns::CONTROL)?;
        let product_index = require_column(file, headers, commerce_columns::PRODUCT)?;

        let mut years: Vec<(usize, i32)> = Vec::new();
        for (index, label) in headers.iter().enumerate() {
            if index == id_index || index == control_index || index == product_index {
                continue;
            }

            let year = match YearColumn::from_label(label) {
                Some(YearColumn::Quantity(year)) => year,
                Some(YearColumn::Value(_)) => {
                    return Err(VitiError::schema(
                        file,
                        format!(
                            "column '{}' carries a '{}' suffix but commercialization files have no value columns",
                            label, VALUE_YEAR_SUFFIX
                        ),
                    ));
                }
                None => {
                    return Err(VitiError::schema(
                        file,
                        format!("column '{}' is not a year label", label),
                    ));
                }
            };

            if years.iter().any(|(_, y)| *y == year) {
                return Err(VitiError::schema(
                    file,
                    format!("year {} appears more than once", year),
                ));
            }
            years.push((index, year));
        }

        debug!("Commerce layout for {}: {} year columns", file, years.len());

        Ok(Self {
            id_index,
            product_index,
            years,
        })
    }
}

fn require_column(file: &str, headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| VitiError::schema(file, format!("missing required column '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_year_label_variants() {
        assert_eq!(YearColumn::from_label("2020"), Some(YearColumn::Quantity(2020)));
        assert_eq!(YearColumn::from_label("2020.1"), Some(YearColumn::Value(2020)));
        assert_eq!(YearColumn::from_label(" 1970 "), Some(YearColumn::Quantity(1970)));
        assert_eq!(YearColumn::from_label("2020.12"), None);
        assert_eq!(YearColumn::from_label("20.1"), None);
        assert_eq!(YearColumn::from_label("2020.1.1"), None);
        assert_eq!(YearColumn::from_label("Total"), None);
    }

    #[test]
    fn test_trade_layout_suffixed_years() {
        let layout =
            TradeLayout::analyze("ExpVinho.csv", &headers(&["Id", "País", "1970", "1970.1", "1971", "1971.1"]))
                .unwrap();

        assert_eq!(layout.id_index, 0);
        assert_eq!(layout.country_index, 1);
        let columns: Vec<YearColumn> = layout.years.iter().map(|(_, c)| *c).collect();
        assert_eq!(
            columns,
            vec![
                YearColumn::Quantity(1970),
                YearColumn::Value(1970),
                YearColumn::Quantity(1971),
                YearColumn::Value(1971),
            ]
        );
        assert_eq!(layout.distinct_years(), 2);
    }

    #[test]
    fn test_trade_layout_duplicated_bare_years() {
        let layout =
            TradeLayout::analyze("ExpVinho.csv", &headers(&["Id", "País", "1970", "1970", "1971", "1971"]))
                .unwrap();

        let columns: Vec<YearColumn> = layout.years.iter().map(|(_, c)| *c).collect();
        assert_eq!(
            columns,
            vec![
                YearColumn::Quantity(1970),
                YearColumn::Value(1970),
                YearColumn::Quantity(1971),
                YearColumn::Value(1971),
            ]
        );
    }

    #[test]
    fn test_trade_layout_missing_key_column() {
        let err = TradeLayout::analyze("ExpVinho.csv", &headers(&["Id", "1970", "1970.1"])).unwrap_err();
        assert!(matches!(err, VitiError::Schema { .. }));
        assert!(err.to_string().contains("País"));
    }

    #[test]
    fn test_trade_layout_rejects_non_numeric_label() {
        let err =
            TradeLayout::analyze("ExpVinho.csv", &headers(&["Id", "País", "1970", "Total"])).unwrap_err();
        assert!(matches!(err, VitiError::Schema { .. }));
    }

    #[test]
    fn test_trade_layout_rejects_third_occurrence() {
        let err = TradeLayout::analyze(
            "ExpVinho.csv",
            &headers(&["Id", "País", "1970", "1970", "1970"]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than twice"));
    }

    #[test]
    fn test_trade_layout_rejects_unpaired_year() {
        let err = TradeLayout::analyze("ExpVinho.csv", &headers(&["Id", "País", "1970"])).unwrap_err();
        assert!(matches!(err, VitiError::Schema { .. }));
        assert!(err.to_string().contains("year 1970 has no value column"));

        let err = TradeLayout::analyze(
            "ExpVinho.csv",
            &headers(&["Id", "País", "1970", "1970.1", "1971.1"]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("year 1971 has no quantity column"));
    }

    #[test]
    fn test_commerce_layout() {
        let layout = CommerceLayout::analyze(
            "Comercio.csv",
            &headers(&["id", "control", "Produto", "1970", "1971"]),
        )
        .unwrap();
        assert_eq!(layout.product_index, 2);
        assert_eq!(layout.years, vec![(3, 1970), (4, 1971)]);
    }

    #[test]
    fn test_commerce_layout_rejects_value_suffix() {
        let err = CommerceLayout::analyze(
            "Comercio.csv",
            &headers(&["id", "control", "Produto", "1970", "1970.1"]),
        )
        .unwrap_err();
        assert!(matches!(err, VitiError::Schema { .. }));
    }
}
