//! Umbrella error for table operations

use super::SchemaError;
use super::TypeMismatchError;

/// Errors returned by direct [`DataTable`](crate::DataTable) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    /// Unknown column/row or a shape violation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A value was incompatible with its column's type.
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatchError),
}

impl DataError {
    /// Returns `true` if this is a schema error.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns `true` if this is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch(_))
    }
}
