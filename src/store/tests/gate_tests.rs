//! Tests for the persistence gate against the in-memory store

use super::{commerce, trade};
use crate::constants::{COMMERCE_TABLE, EXPORT_TABLE};
use crate::error::VitiError;
use crate::models::{DedupStrategy, PersistOutcome, ProductType, TableRecord, TradeRecord};
use crate::store::{MemoryStore, PersistenceGate};

fn appended(rows: usize, skipped: usize) -> PersistOutcome {
    PersistOutcome::Appended {
        table: "export_vinho".to_string(),
        rows,
        skipped,
    }
}

#[test]
fn test_missing_table_appends_whole_batch() {
    let mut store = MemoryStore::new();
    let gate = PersistenceGate::default();
    let batch = vec![trade("Alemanha", 2020, 10.0, 99.5), trade("Angola", 2020, 0.0, 5.0)];

    let outcome = gate.persist(&mut store, &EXPORT_TABLE, &batch).unwrap();

    assert_eq!(outcome, appended(2, 0));
    assert_eq!(store.rows("export_vinho").unwrap().len(), 2);
}

#[test]
fn test_same_batch_twice_is_idempotent() {
    let mut store = MemoryStore::new();
    let gate = PersistenceGate::default();
    let batch = vec![trade("Alemanha", 2020, 10.0, 99.5), trade("Angola", 2020, 0.0, 5.0)];

    gate.persist(&mut store, &EXPORT_TABLE, &batch).unwrap();
    let second = gate.persist(&mut store, &EXPORT_TABLE, &batch).unwrap();

    assert_eq!(
        second,
        PersistOutcome::AlreadyExists {
            table: "export_vinho".to_string()
        }
    );
    assert_eq!(second.rows_written(), 0);
    assert_eq!(store.rows("export_vinho").unwrap().len(), 2);
}

#[test]
fn test_only_new_rows_are_appended() {
    let existing = vec![trade("Alemanha", 2019, 1.0, 2.0).to_row()];
    let mut store = MemoryStore::new().with_table("export_vinho", existing);
    let gate = PersistenceGate::default();
    let batch = vec![trade("Alemanha", 2019, 1.0, 2.0), trade("Alemanha", 2020, 3.0, 4.0)];

    let outcome = gate.persist(&mut store, &EXPORT_TABLE, &batch).unwrap();

    assert_eq!(outcome, appended(1, 1));
    assert_eq!(store.rows("export_vinho").unwrap().len(), 2);
}

#[test]
fn test_exact_row_treats_different_subtype_as_new() {
    let mut store = MemoryStore::new();
    let gate = PersistenceGate::new(DedupStrategy::ExactRow);
    let wine = trade("Alemanha", 2020, 10.0, 99.5);
    let unknown = TradeRecord {
        product_type: ProductType::Unknown,
        ..wine.clone()
    };

    gate.persist(&mut store, &EXPORT_TABLE, &[wine]).unwrap();
    let outcome = gate.persist(&mut store, &EXPORT_TABLE, &[unknown]).unwrap();

    assert_eq!(outcome.rows_written(), 1);
    assert_eq!(store.rows("export_vinho").unwrap().len(), 2);
}

#[test]
fn test_natural_key_ignores_changed_measures() {
    let mut store = MemoryStore::new();
    let gate = PersistenceGate::new(DedupStrategy::NaturalKey);

    gate.persist(&mut store, &EXPORT_TABLE, &[trade("Alemanha", 2020, 10.0, 99.5)])
        .unwrap();
    let outcome = gate
        .persist(&mut store, &EXPORT_TABLE, &[trade("Alemanha", 2020, 10.000001, 99.5)])
        .unwrap();

    assert!(matches!(outcome, PersistOutcome::AlreadyExists { .. }));
    assert_eq!(store.rows("export_vinho").unwrap().len(), 1);
}

#[test]
fn test_duplicates_inside_batch_are_written_once() {
    let mut store = MemoryStore::new();
    let gate = PersistenceGate::default();
    let row = commerce("VINHO DE MESA", 2020, Some(10.0));

    let outcome = gate
        .persist(&mut store, &COMMERCE_TABLE, &[row.clone(), row])
        .unwrap();

    assert_eq!(outcome.rows_written(), 1);
    assert_eq!(store.rows("comercio_vinho").unwrap().len(), 1);
}

#[test]
fn test_null_quantities_compare_equal() {
    let mut store = MemoryStore::new();
    let gate = PersistenceGate::default();
    let batch = vec![commerce("OUTROS PRODUTOS", 2019, None)];

    gate.persist(&mut store, &COMMERCE_TABLE, &batch).unwrap();
    let outcome = gate.persist(&mut store, &COMMERCE_TABLE, &batch).unwrap();

    assert!(matches!(outcome, PersistOutcome::AlreadyExists { .. }));
}

#[test]
fn test_read_failure_aborts_write() {
    let mut store = MemoryStore::new().with_read_failure("database is locked");
    let gate = PersistenceGate::default();

    let err = gate
        .persist(&mut store, &EXPORT_TABLE, &[trade("Alemanha", 2020, 1.0, 1.0)])
        .unwrap_err();

    match err {
        VitiError::Storage { table, message } => {
            assert_eq!(table, "export_vinho");
            assert_eq!(message, "database is locked");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.rows("export_vinho").is_none());
}

#[test]
fn test_empty_batch_reports_no_new_data() {
    let mut store = MemoryStore::new();
    let gate = PersistenceGate::default();
    let batch: Vec<TradeRecord> = Vec::new();

    let outcome = gate.persist(&mut store, &EXPORT_TABLE, &batch).unwrap();

    assert!(matches!(outcome, PersistOutcome::AlreadyExists { .. }));
    assert!(store.rows("export_vinho").is_none());
}
