//! Tests for the storage layer

pub mod gate_tests;

use crate::models::{CommerceRecord, ProductType, TradeRecord};

pub fn trade(country: &str, year: i32, quantity: f64, value: f64) -> TradeRecord {
    TradeRecord {
        id: 1,
        country: country.to_string(),
        year,
        quantity: Some(quantity),
        value: Some(value),
        product_type: ProductType::TableWine,
    }
}

pub fn commerce(product: &str, year: i32, quantity: Option<f64>) -> CommerceRecord {
    CommerceRecord {
        id: 1,
        product: product.to_string(),
        year,
        quantity,
    }
}
