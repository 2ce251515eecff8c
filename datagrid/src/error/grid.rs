//! Grid-level error types

use datagrid_core::{DataError, RowId, SchemaError};

use super::DuplicateRendererError;

/// Errors returned by [`Grid`](crate::Grid) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// A table operation failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A column or row reference was invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A renderer tag collision.
    #[error(transparent)]
    DuplicateRenderer(#[from] DuplicateRendererError),

    /// A validation pattern did not compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The column does not allow sorting.
    #[error("Column '{column}' is not sortable")]
    ColumnNotSortable { column: String },

    /// The column does not allow resizing.
    #[error("Column '{column}' is not resizable")]
    ColumnNotResizable { column: String },

    /// The column does not allow editing, or editing is disabled.
    #[error("Column '{column}' is not editable")]
    ColumnNotEditable { column: String },

    /// The cell is outside the rendered window.
    #[error("Cell {row}/'{column}' is not rendered")]
    CellNotRendered { row: RowId, column: String },

    /// No edit is in progress.
    #[error("No cell is being edited")]
    NoActiveEdit,

    /// No resize is in progress.
    #[error("No column is being resized")]
    NoActiveResize,

    /// A resize is already in progress.
    #[error("A column resize is already in progress")]
    ResizeInProgress,
}

impl GridError {
    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a new not-sortable error.
    pub fn not_sortable(column: impl Into<String>) -> Self {
        Self::ColumnNotSortable {
            column: column.into(),
        }
    }

    /// Creates a new not-resizable error.
    pub fn not_resizable(column: impl Into<String>) -> Self {
        Self::ColumnNotResizable {
            column: column.into(),
        }
    }

    /// Creates a new not-editable error.
    pub fn not_editable(column: impl Into<String>) -> Self {
        Self::ColumnNotEditable {
            column: column.into(),
        }
    }

    /// Creates a new cell-not-rendered error.
    pub fn not_rendered(row: RowId, column: impl Into<String>) -> Self {
        Self::CellNotRendered {
            row,
            column: column.into(),
        }
    }
}
