//! Load error types

use super::DataError;
use super::SchemaError;
use super::TypeMismatchError;

/// A connector failed to produce a table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The source was readable but did not have the expected shape.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The parsed rows could not be assembled into a table.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A parsed value did not fit its column.
    #[error("Type error: {0}")]
    TypeMismatch(#[from] TypeMismatchError),

    /// No connector is registered under the requested id.
    #[error("No connector registered as '{id}'")]
    UnknownConnector { id: String },
}

impl LoadError {
    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

impl From<DataError> for LoadError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Schema(e) => Self::Schema(e),
            DataError::TypeMismatch(e) => Self::TypeMismatch(e),
        }
    }
}
