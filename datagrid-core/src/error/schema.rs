//! Schema error types

use crate::table::RowId;

/// Error raised when an operation references a column or row the table does
/// not have, or would break the table's shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The referenced column does not exist.
    #[error("Column '{column}' does not exist")]
    UnknownColumn { column: String },

    /// The referenced row identifier does not exist.
    #[error("Row {row} does not exist")]
    UnknownRow { row: RowId },

    /// A column with the same name already exists.
    #[error("Column '{column}' already exists")]
    DuplicateColumn { column: String },

    /// Column data does not match the table's row count.
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

impl SchemaError {
    /// Creates a new unknown column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Creates a new unknown row error.
    pub fn unknown_row(row: RowId) -> Self {
        Self::UnknownRow { row }
    }

    /// Creates a new duplicate column error.
    pub fn duplicate_column(column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            column: column.into(),
        }
    }

    /// Creates a new length mismatch error.
    pub fn length_mismatch(column: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            column: column.into(),
            expected,
            actual,
        }
    }
}
