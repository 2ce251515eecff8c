//! Data acquisition contracts
//!
//! A [`DataConnector`] produces a complete [`DataTable`] from some external
//! source. Connectors usually delegate the text-to-table step to a
//! [`DataConverter`]. The [`DataPool`] keeps named connectors and caches the
//! tables they load.
//!
//! Loading is all-or-nothing: a connector either returns a finished table or
//! a [`LoadError`], never a partially filled one.

mod json;
mod pool;

pub use json::*;
pub use pool::*;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::table::DataTable;
use crate::value::CellValue;
use crate::value::ColumnType;

/// Something that can produce a table asynchronously.
///
/// # Example
///
/// ```ignore
/// use datagrid_core::connector::{DataConnector, JsonConnector};
///
/// let connector = JsonConnector::from_text(r#"[{"name": "A"}]"#);
/// let table = connector.load().await?;
/// assert_eq!(table.row_count(), 1);
/// ```
#[async_trait]
pub trait DataConnector: Send + Sync {
    /// Loads a fresh table.
    async fn load(&self) -> Result<DataTable, LoadError>;
}

/// Rows parsed from raw text, before they become a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRows {
    /// Column names in order.
    pub column_names: Vec<String>,
    /// Row values, each in column order.
    pub rows: Vec<Vec<CellValue>>,
}

impl ParsedRows {
    /// Creates parsed rows from names and row values.
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { column_names, rows }
    }
}

/// Turns raw source text into a table.
pub trait DataConverter: Send + Sync {
    /// Parses raw text into rows.
    fn parse(&self, raw: &str) -> Result<ParsedRows, LoadError>;

    /// Assembles parsed rows into a table, inferring column types.
    ///
    /// Short rows are padded with null. A row with more values than there
    /// are columns is rejected.
    fn rows_to_table(&self, parsed: ParsedRows) -> Result<DataTable, LoadError> {
        let ParsedRows { column_names, rows } = parsed;
        let width = column_names.len();

        let mut columns: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); width];
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(LoadError::parse(format!(
                    "Row {} has {} values but there are only {} columns",
                    index,
                    row.len(),
                    width
                )));
            }
            let mut values = row.into_iter();
            for column in columns.iter_mut() {
                column.push(values.next().unwrap_or_default());
            }
        }

        let mut table = DataTable::new();
        for (name, values) in column_names.into_iter().zip(columns) {
            let kind = ColumnType::infer(&values);
            table.add_column(name, kind, values)?;
        }
        Ok(table)
    }

    /// Parses and assembles in one step.
    fn convert(&self, raw: &str) -> Result<DataTable, LoadError> {
        let parsed = self.parse(raw)?;
        self.rows_to_table(parsed)
    }
}

/// Connector over a table that is already in memory.
///
/// Each load returns a detached copy, so the original is never shared with
/// the grid.
#[derive(Debug, Clone, Default)]
pub struct TableConnector {
    table: DataTable,
}

impl TableConnector {
    /// Wraps a table.
    pub fn new(table: DataTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl DataConnector for TableConnector {
    async fn load(&self) -> Result<DataTable, LoadError> {
        Ok(self.table.clone())
    }
}
