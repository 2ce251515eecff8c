//! View-deriving modifiers.
//!
//! A modifier takes a table and an input view and returns a new view. The
//! trait has no way to mutate the table: the grid always derives, it never
//! modifies in place.
//!
//! # Example
//!
//! ```
//! use datagrid_core::modifier::{Condition, DataModifier, FilterModifier, SortModifier};
//! use datagrid_core::{CellValue, DataTable};
//!
//! let table = DataTable::from_columns([
//!     ("name", vec![CellValue::from("B"), CellValue::from("A")]),
//! ])
//! .unwrap();
//!
//! let sorted = SortModifier::asc("name").apply(&table).unwrap();
//! let filtered = FilterModifier::new(Condition::eq("name", "A"))
//!     .apply_to(&table, sorted)
//!     .unwrap();
//! assert_eq!(filtered.len(), 1);
//! ```

mod chain;
mod filter;
mod invert;
mod range;
mod sort;

pub use chain::ChainModifier;
pub use filter::{Condition, FilterModifier, Predicate};
pub use invert::InvertModifier;
pub use range::{RangeModifier, ValueRange};
pub use sort::{Direction, SortModifier};

use std::fmt::Debug;

use crate::error::SchemaError;
use crate::table::DataTable;
use crate::view::TableView;

/// A pure view transformation.
///
/// Implementations must be deterministic: the same table, input view and
/// parameters always produce the same output view.
pub trait DataModifier: Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Derives a new view from `view`.
    fn apply_to(&self, table: &DataTable, view: TableView) -> Result<TableView, SchemaError>;

    /// Derives a view from the whole table in source order.
    fn apply(&self, table: &DataTable) -> Result<TableView, SchemaError> {
        self.apply_to(table, TableView::full(table))
    }
}

/// Fails with [`SchemaError::UnknownColumn`] if the table lacks the column.
pub(crate) fn require_column(table: &DataTable, column: &str) -> Result<(), SchemaError> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(SchemaError::unknown_column(column))
    }
}
