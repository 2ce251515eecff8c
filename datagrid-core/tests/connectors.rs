//! Tests for connectors and the data pool.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use datagrid_core::connector::{
    DataConnector, DataPool, JsonConnector, JsonOrientation, PooledConnector, TableConnector,
};
use datagrid_core::{CellValue, DataTable, ListenFilter, LoadError};

struct CountingConnector {
    loads: Arc<AtomicUsize>,
}

#[async_trait]
impl DataConnector for CountingConnector {
    async fn load(&self) -> Result<DataTable, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(DataTable::from_columns([("n", vec![CellValue::from(1.0)])])?)
    }
}

#[tokio::test]
async fn test_json_text_connector() {
    let table = JsonConnector::from_text(r#"[{"id": 1, "name": "B"}, {"id": 2, "name": "A"}]"#)
        .load()
        .await
        .unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_names(), vec!["id", "name"]);
}

#[tokio::test]
async fn test_json_file_connector() {
    let path = std::env::temp_dir().join(format!("datagrid-core-test-{}.json", std::process::id()));
    std::fs::write(&path, r#"[["name", "a", "b"], ["qty", 1, 2]]"#).unwrap();

    let table = JsonConnector::from_file(&path)
        .with_orientation(JsonOrientation::Columns)
        .load()
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(table.row_count(), 2);
    let second = table.row_id_at(1).unwrap();
    assert_eq!(table.get_cell(second, "qty").unwrap(), CellValue::from(2.0));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let err = JsonConnector::from_file("/definitely/not/here.json")
        .load()
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[tokio::test]
async fn test_table_connector_detaches() {
    let mut source = DataTable::from_columns([("n", vec![CellValue::from(1.0)])]).unwrap();
    source.listen(ListenFilter::all(), |_| {});

    let loaded = TableConnector::new(source).load().await.unwrap();
    assert_eq!(loaded.cursor().listener_count(), 0);
    assert_eq!(loaded.row_count(), 1);
}

#[tokio::test]
async fn test_pool_caches_until_invalidated() {
    let loads = Arc::new(AtomicUsize::new(0));
    let pool = DataPool::new();
    pool.register(
        "numbers",
        CountingConnector {
            loads: Arc::clone(&loads),
        },
    );

    pool.get("numbers").await.unwrap();
    pool.get("numbers").await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(pool.is_cached("numbers"));

    assert!(pool.invalidate("numbers"));
    pool.get("numbers").await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_pool_unknown_connector() {
    let pool = DataPool::new();
    let err = pool.get("nope").await.unwrap_err();
    assert!(matches!(err, LoadError::UnknownConnector { ref id } if id == "nope"));
}

#[tokio::test]
async fn test_pooled_connector() {
    let pool = Arc::new(DataPool::new());
    pool.register("inline", JsonConnector::from_text(r#"[{"a": true}]"#));

    let table = PooledConnector::new(Arc::clone(&pool), "inline")
        .load()
        .await
        .unwrap();
    assert_eq!(table.row_count(), 1);
    assert!(pool.is_cached("inline"));
}
