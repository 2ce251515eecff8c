//! Type mismatch errors

use crate::value::ColumnType;

/// A value could not be coerced into a column's declared type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Column '{column}' expects {expected}, got {actual} '{value}'")]
pub struct TypeMismatchError {
    /// The column being written.
    pub column: String,
    /// The column's declared type.
    pub expected: ColumnType,
    /// Type name of the rejected value.
    pub actual: &'static str,
    /// Display form of the rejected value.
    pub value: String,
}

impl TypeMismatchError {
    /// Creates a new type mismatch error.
    pub fn new(
        column: impl Into<String>,
        expected: ColumnType,
        actual: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            expected,
            actual,
            value: value.into(),
        }
    }
}
