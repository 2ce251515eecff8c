//! Tests for tables, cursors and modifiers working together.

use std::sync::{Arc, Mutex};

use datagrid_core::modifier::{
    ChainModifier, Condition, DataModifier, FilterModifier, InvertModifier, RangeModifier,
    SortModifier, ValueRange,
};
use datagrid_core::{CellValue, ChangeKind, DataTable, DeferredQueue, ListenFilter, TableView};

fn people() -> DataTable {
    DataTable::from_columns([
        ("id", vec![CellValue::from(1.0), CellValue::from(2.0)]),
        ("name", vec![CellValue::from("B"), CellValue::from("A")]),
    ])
    .unwrap()
}

fn ids(table: &DataTable, view: &TableView) -> Vec<f64> {
    view.rows(table)
        .filter_map(|row| row.get("id").and_then(CellValue::as_number))
        .collect()
}

#[test]
fn test_sort_then_filter_scenario() {
    let table = people();
    let sorted = SortModifier::asc("name").apply(&table).unwrap();
    assert_eq!(ids(&table, &sorted), vec![2.0, 1.0]);

    let filtered = FilterModifier::new(Condition::eq("name", "A"))
        .apply_to(&table, sorted)
        .unwrap();
    assert_eq!(ids(&table, &filtered), vec![2.0]);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn test_view_recomputed_after_mutation() {
    let mut table = people();
    let sort = SortModifier::asc("name");
    let before = sort.apply(&table).unwrap();

    let first = table.row_id_at(0).unwrap();
    table.set_cell(first, "name", "0".into()).unwrap();

    let after = sort.apply(&table).unwrap();
    assert_ne!(before, after);
    assert_eq!(ids(&table, &after), vec![1.0, 2.0]);
}

#[test]
fn test_chain_determinism_over_larger_table() {
    let values: Vec<CellValue> = (0..50i32).map(|i| CellValue::from(f64::from((i * 37) % 11))).collect();
    let table = DataTable::from_columns([("v", values)]).unwrap();

    let chain = ChainModifier::new()
        .then(RangeModifier::new(ValueRange::new("v", 2.0, 8.0)))
        .then(SortModifier::desc("v"))
        .then(InvertModifier);

    let first = chain.apply(&table).unwrap();
    let second = chain.apply(&table).unwrap();
    assert_eq!(first.row_ids(), second.row_ids());

    let values: Vec<f64> = first
        .rows(&table)
        .filter_map(|row| row.get("v").and_then(CellValue::as_number))
        .collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert!(values.iter().all(|v| (2.0..=8.0).contains(v)));
}

#[test]
fn test_deferred_write_skips_unrelated_listener() {
    let mut table = people();
    let queue = DeferredQueue::new();
    let kinds = Arc::new(Mutex::new(Vec::new()));

    let listener_queue = queue.clone();
    let sink = Arc::clone(&kinds);
    table.listen(ListenFilter::columns(["name"]), move |event| {
        sink.lock().unwrap().push(event.kind);
        if event.kind == ChangeKind::CellsUpdated {
            let rows = event.rows.clone();
            listener_queue.push(move |table: &mut DataTable| {
                if let Some(row) = table.row_id_at(rows.start) {
                    table.set_cell(row, "id", CellValue::from(99.0))?;
                }
                Ok(())
            });
        }
    });

    let first = table.row_id_at(0).unwrap();
    table.set_cell(first, "name", "Z".into()).unwrap();
    assert_eq!(table.get_cell(first, "id").unwrap(), CellValue::from(1.0));
    assert_eq!(queue.len(), 1);

    let errors = queue.drain_into(&mut table);
    assert!(errors.is_empty());
    assert_eq!(table.get_cell(first, "id").unwrap(), CellValue::from(99.0));
    // The deferred write touched "id", which this listener ignores.
    assert_eq!(*kinds.lock().unwrap(), vec![ChangeKind::CellsUpdated]);
}

#[test]
fn test_retire_notifies_and_clears() {
    let mut table = people();
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&kinds);
    table.listen(ListenFilter::rows(0..1), move |event| {
        sink.lock().unwrap().push(event.kind);
    });

    table.retire();
    assert_eq!(*kinds.lock().unwrap(), vec![ChangeKind::TableReplaced]);
    assert_eq!(table.cursor().listener_count(), 0);
}
