//! Subtype classification from the source file name.

use super::disambiguate::SplitRecord;
use crate::models::{ProductType, TradeFlow, TradeRecord};
use tracing::warn;

/// Look up the subtype of a trade file. Names are matched exactly
/// (case-sensitive); anything unrecognised falls back to
/// [`ProductType::Unknown`].
pub fn classify(flow: TradeFlow, file_name: &str) -> ProductType {
    flow.subtype_table()
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, product_type)| *product_type)
        .unwrap_or_else(|| {
            warn!(
                "Unrecognised {:?} file name '{}', classifying as '{}'",
                flow,
                file_name,
                ProductType::Unknown
            );
            ProductType::Unknown
        })
}

/// Stamp every record of a file with the file's subtype
pub fn label(records: Vec<SplitRecord>, product_type: ProductType) -> Vec<TradeRecord> {
    records
        .into_iter()
        .map(|r| TradeRecord {
            id: r.id,
            country: r.country,
            year: r.year,
            quantity: r.quantity,
            value: r.value,
            product_type,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_names() {
        assert_eq!(classify(TradeFlow::Export, "ExpVinho.csv"), ProductType::TableWine);
        assert_eq!(classify(TradeFlow::Export, "ExpEspumantes.csv"), ProductType::Sparkling);
        assert_eq!(classify(TradeFlow::Export, "ExpUva.csv"), ProductType::FreshGrapes);
        assert_eq!(classify(TradeFlow::Export, "ExpSuco.csv"), ProductType::GrapeJuice);
    }

    #[test]
    fn test_import_file_names() {
        assert_eq!(classify(TradeFlow::Import, "ImpVinhos.csv"), ProductType::TableWine);
        assert_eq!(classify(TradeFlow::Import, "ImpEspumantes.csv"), ProductType::Sparkling);
        assert_eq!(classify(TradeFlow::Import, "ImpFrescas.csv"), ProductType::FreshGrapes);
        assert_eq!(classify(TradeFlow::Import, "ImpPassas.csv"), ProductType::Raisins);
        assert_eq!(classify(TradeFlow::Import, "ImpSuco.csv"), ProductType::GrapeJuice);
    }

    #[test]
    fn test_unknown_file_names_fall_back() {
        assert_eq!(classify(TradeFlow::Export, "foo.csv"), ProductType::Unknown);
        assert_eq!(ProductType::Unknown.label(), "Desconhecido");
        // Matching is case-sensitive and flow-specific
        assert_eq!(classify(TradeFlow::Export, "expvinho.csv"), ProductType::Unknown);
        assert_eq!(classify(TradeFlow::Export, "ImpPassas.csv"), ProductType::Unknown);
        assert_eq!(classify(TradeFlow::Import, "ExpVinho.csv"), ProductType::Unknown);
    }

    #[test]
    fn test_label_applies_to_every_record() {
        let records = vec![
            SplitRecord {
                id: 1,
                country: "Alemanha".to_string(),
                year: 2020,
                quantity: Some(1.0),
                value: Some(2.0),
            },
            SplitRecord {
                id: 2,
                country: "Angola".to_string(),
                year: 2020,
                quantity: Some(3.0),
                value: Some(4.0),
            },
        ];

        let labelled = label(records, ProductType::Sparkling);
        assert!(labelled.iter().all(|r| r.product_type == ProductType::Sparkling));
    }
}
