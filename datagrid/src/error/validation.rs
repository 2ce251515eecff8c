//! Edit validation errors

use datagrid_core::RowId;

/// An edited value failed its column's constraints.
///
/// Raised while committing an inline edit. The grid keeps the cell in its
/// editing state and shows the message next to the control instead of
/// returning the error to the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for '{column}' in row {row}: {message}")]
pub struct ValidationError {
    /// Column being edited.
    pub column: String,
    /// Row being edited.
    pub row: RowId,
    /// Message shown to the user.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(column: impl Into<String>, row: RowId, message: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            row,
            message: message.into(),
        }
    }
}
