//! Named connectors with a table cache

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use super::DataConnector;
use crate::error::LoadError;
use crate::table::DataTable;

/// A registry of named connectors whose loaded tables are cached.
///
/// Every successful [`get`](DataPool::get) hands out a detached copy of the
/// cached table, so grids never share a cursor through the pool.
///
/// # Example
///
/// ```ignore
/// use datagrid_core::connector::{DataPool, JsonConnector};
///
/// let pool = DataPool::new();
/// pool.register("people", JsonConnector::from_file("people.json"));
///
/// let first = pool.get("people").await?; // loads
/// let second = pool.get("people").await?; // cached
/// ```
#[derive(Default)]
pub struct DataPool {
    connectors: DashMap<String, Arc<dyn DataConnector>>,
    tables: DashMap<String, DataTable>,
}

impl fmt::Debug for DataPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataPool")
            .field("connectors", &self.connectors.len())
            .field("cached", &self.tables.len())
            .finish()
    }
}

impl DataPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connector under an id, replacing any previous one.
    ///
    /// A replaced connector's cached table is dropped.
    pub fn register(&self, id: impl Into<String>, connector: impl DataConnector + 'static) {
        let id = id.into();
        self.tables.remove(&id);
        self.connectors.insert(id, Arc::new(connector));
    }

    /// Removes a connector and its cached table.
    pub fn remove(&self, id: &str) -> bool {
        self.tables.remove(id);
        self.connectors.remove(id).is_some()
    }

    /// Returns `true` if a connector is registered under the id.
    pub fn contains(&self, id: &str) -> bool {
        self.connectors.contains_key(id)
    }

    /// Returns `true` if the id has a cached table.
    pub fn is_cached(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    /// Returns the number of registered connectors.
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Returns `true` if no connector is registered.
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Returns a copy of the table for an id, loading it on first use.
    pub async fn get(&self, id: &str) -> Result<DataTable, LoadError> {
        if let Some(cached) = self.tables.get(id) {
            debug!("Pool hit for '{}'", id);
            return Ok(cached.value().clone());
        }

        // Clone the connector out so no map guard is held across the await.
        let connector = self
            .connectors
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LoadError::UnknownConnector { id: id.to_string() })?;

        debug!("Pool miss for '{}', loading", id);
        let table = connector.load().await?;
        self.tables.insert(id.to_string(), table.clone());
        Ok(table)
    }

    /// Drops the cached table for an id so the next `get` reloads it.
    pub fn invalidate(&self, id: &str) -> bool {
        self.tables.remove(id).is_some()
    }

    /// Drops every cached table.
    pub fn clear(&self) {
        self.tables.clear();
    }
}

/// Lets a pool entry be handed to anything that takes a connector.
#[derive(Debug, Clone)]
pub struct PooledConnector {
    pool: Arc<DataPool>,
    id: String,
}

impl PooledConnector {
    /// Creates a connector that reads `id` from `pool`.
    pub fn new(pool: Arc<DataPool>, id: impl Into<String>) -> Self {
        Self { pool, id: id.into() }
    }
}

#[async_trait::async_trait]
impl DataConnector for PooledConnector {
    async fn load(&self) -> Result<DataTable, LoadError> {
        self.pool.get(&self.id).await
    }
}
