//! Tests for reshaping, disambiguation, aggregation and zero filtering

use crate::error::VitiError;
use crate::header::{TradeLayout, YearColumn};
use crate::models::{FileSource, ProductType, TradeRecord};
use crate::processor::aggregate::sum_by_year;
use crate::processor::disambiguate::{SplitRecord, disambiguate, disambiguate_all};
use crate::processor::filter::{drop_empty_trade, is_empty_trade};
use crate::processor::reshape::{LongRecord, melt, parse_number};
use crate::processor::wide::WideTable;

fn parse(name: &str, body: &str) -> (WideTable, TradeLayout) {
    let table = WideTable::parse(&FileSource::new(name, body)).unwrap();
    let layout = TradeLayout::analyze(name, &table.headers).unwrap();
    (table, layout)
}

fn trade(quantity: Option<f64>, value: Option<f64>) -> TradeRecord {
    TradeRecord {
        id: 1,
        country: "Alemanha".to_string(),
        year: 2020,
        quantity,
        value,
        product_type: ProductType::TableWine,
    }
}

#[test]
fn test_melt_row_count_is_rows_times_columns() {
    let (table, layout) = parse(
        "ExpVinho.csv",
        "Id;País;2019;2019.1;2020;2020.1\n1;A;1;2;3;4\n2;B;5;6;7;8\n3;C;;;;\n",
    );

    let long = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap();

    assert_eq!(long.len(), 3 * 4);
}

#[test]
fn test_melt_is_column_major() {
    let (table, layout) = parse("ExpVinho.csv", "Id;País;2020;2020.1\n1;A;3;4\n2;B;7;8\n");

    let long = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap();

    let order: Vec<(i64, YearColumn)> = long.iter().map(|r| (r.id, r.column)).collect();
    assert_eq!(
        order,
        vec![
            (1, YearColumn::Quantity(2020)),
            (2, YearColumn::Quantity(2020)),
            (1, YearColumn::Value(2020)),
            (2, YearColumn::Value(2020)),
        ]
    );
    assert_eq!(long[0].entity, "A");
    assert_eq!(long[3].value, Some(8.0));
}

#[test]
fn test_melt_keeps_empty_cells_as_null() {
    let (table, layout) = parse("ExpVinho.csv", "Id;País;2020;2020.1\n1;A;;4\n");

    let long = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap();

    assert_eq!(long.len(), 2);
    assert_eq!(long[0].value, None);
    assert_eq!(long[1].value, Some(4.0));
}

#[test]
fn test_melt_rejects_non_numeric_cell() {
    let (table, layout) = parse("ExpVinho.csv", "Id;País;2020;2020.1\n1;A;abc;4\n");

    let err = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap_err();

    match err {
        VitiError::InvalidValue { column, row, value, .. } => {
            assert_eq!(column, "2020");
            assert_eq!(row, 1);
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_value_markers_are_null() {
    let (table, layout) = parse("ExpVinho.csv", "Id;País;2020;2020.1\n1;Alemanha;NaN;5\n2;Angola;NA;null\n");

    let long = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap();
    let values: Vec<Option<f64>> = long.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![None, None, Some(5.0), None]);

    let yearly = sum_by_year(disambiguate_all(long));
    assert_eq!(yearly[0].quantity, Some(0.0));
    assert_eq!(yearly[0].value, Some(5.0));
}

#[test]
fn test_parse_number_rejects_non_finite() {
    assert_eq!(parse_number("ExpVinho.csv", "2020", 1, " n/a ").unwrap(), None);
    assert_eq!(parse_number("ExpVinho.csv", "2020", 1, "12.5").unwrap(), Some(12.5));

    for raw in ["inf", "-inf", "infinity", "1e999"] {
        let err = parse_number("ExpVinho.csv", "2020", 1, raw).unwrap_err();
        assert!(matches!(err, VitiError::InvalidValue { .. }), "{raw} accepted");
    }
}

#[test]
fn test_melt_rejects_non_integer_id() {
    let (table, layout) = parse("ExpVinho.csv", "Id;País;2020;2020.1\nx;A;1;4\n");

    let err = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap_err();

    assert!(matches!(err, VitiError::InvalidValue { ref column, .. } if column == "Id"));
}

#[test]
fn test_disambiguate_routes_by_column_kind() {
    let quantity = disambiguate(LongRecord {
        id: 1,
        entity: "A".to_string(),
        column: YearColumn::Quantity(2020),
        value: Some(10.0),
    });
    assert_eq!(quantity.year, 2020);
    assert_eq!(quantity.quantity, Some(10.0));
    assert_eq!(quantity.value, None);

    let value = disambiguate(LongRecord {
        id: 1,
        entity: "A".to_string(),
        column: YearColumn::Value(2020),
        value: Some(99.5),
    });
    assert_eq!(value.year, 2020);
    assert_eq!(value.quantity, None);
    assert_eq!(value.value, Some(99.5));
}

#[test]
fn test_single_row_round_trip() {
    let (table, layout) = parse("ExpVinho.csv", "Id;País;2020;2020.1\n7;Alemanha;10;99.5\n");

    let long = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap();
    let yearly = sum_by_year(disambiguate_all(long));

    assert_eq!(
        yearly,
        vec![SplitRecord {
            id: 7,
            country: "Alemanha".to_string(),
            year: 2020,
            quantity: Some(10.0),
            value: Some(99.5),
        }]
    );
}

#[test]
fn test_aggregate_treats_null_as_zero() {
    let (table, layout) = parse("ExpVinho.csv", "Id;País;2020;2020.1\n1;A;;\n2;B;;5\n");

    let long = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap();
    let yearly = sum_by_year(disambiguate_all(long));

    assert_eq!(yearly.len(), 2);
    assert_eq!(yearly[0].quantity, Some(0.0));
    assert_eq!(yearly[0].value, Some(0.0));
    assert_eq!(yearly[1].quantity, Some(0.0));
    assert_eq!(yearly[1].value, Some(5.0));
}

#[test]
fn test_aggregate_output_bounded_by_distinct_years() {
    for rows in 1..5 {
        for years in 1..6 {
            let mut header = String::from("Id;País");
            for y in 0..years {
                header.push_str(&format!(";{0};{0}.1", 2000 + y));
            }
            let mut body = header;
            body.push('\n');
            for r in 0..rows {
                body.push_str(&format!("{};C{}", r, r));
                for y in 0..years {
                    body.push_str(&format!(";{};{}", y + 1, r + 1));
                }
                body.push('\n');
            }

            let (table, layout) = parse("ExpVinho.csv", &body);
            let year_columns = layout.years.len();
            let long = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap();
            let yearly = sum_by_year(disambiguate_all(long));

            assert!(yearly.len() <= rows * year_columns / 2);
            assert_eq!(yearly.len(), rows * years);
        }
    }
}

#[test]
fn test_aggregate_merges_rows_sharing_a_key() {
    // Two wide rows with the same Id and country collapse into one per year
    let (table, layout) = parse("ExpVinho.csv", "Id;País;2020;2020.1\n1;A;1;2\n1;A;3;4\n");

    let long = melt(&table, layout.id_index, layout.country_index, &layout.years).unwrap();
    let yearly = sum_by_year(disambiguate_all(long));

    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly[0].quantity, Some(4.0));
    assert_eq!(yearly[0].value, Some(6.0));
}

#[test]
fn test_zero_filter() {
    assert!(is_empty_trade(&trade(Some(0.0), Some(0.0))));
    assert!(!is_empty_trade(&trade(Some(0.0), Some(5.0))));
    assert!(!is_empty_trade(&trade(Some(3.0), Some(0.0))));
    assert!(!is_empty_trade(&trade(None, Some(0.0))));
    assert!(!is_empty_trade(&trade(None, None)));

    let kept = drop_empty_trade(vec![trade(Some(0.0), Some(0.0)), trade(Some(0.0), Some(5.0))]);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].value, Some(5.0));
}
