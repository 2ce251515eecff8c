//! JSON converter and connector

use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;
use log::info;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::DataConnector;
use super::DataConverter;
use super::ParsedRows;
use crate::error::LoadError;
use crate::table::DataTable;
use crate::value::CellValue;

/// How a JSON document lays out its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonOrientation {
    /// One entry per row: either objects keyed by column name, or arrays
    /// whose first entry holds the column names.
    #[default]
    Rows,
    /// One entry per column: arrays whose first value is the column name, or
    /// a single object mapping column names to value arrays.
    Columns,
}

/// Parses JSON documents into rows.
///
/// Nested arrays and objects inside a cell are kept as their JSON text.
///
/// # Example
///
/// ```
/// use datagrid_core::connector::{DataConverter, JsonConverter};
///
/// let table = JsonConverter::rows()
///     .convert(r#"[{"id": 1, "name": "B"}, {"id": 2, "name": "A"}]"#)
///     .unwrap();
/// assert_eq!(table.column_names(), vec!["id", "name"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverter {
    orientation: JsonOrientation,
}

impl JsonConverter {
    /// Creates a converter for the given orientation.
    pub fn new(orientation: JsonOrientation) -> Self {
        Self { orientation }
    }

    /// Creates a row-oriented converter.
    pub fn rows() -> Self {
        Self::new(JsonOrientation::Rows)
    }

    /// Creates a column-oriented converter.
    pub fn columns() -> Self {
        Self::new(JsonOrientation::Columns)
    }

    /// Returns the orientation.
    pub fn orientation(&self) -> JsonOrientation {
        self.orientation
    }

    fn parse_rows(entries: Vec<Value>) -> Result<ParsedRows, LoadError> {
        match entries.first() {
            None => return Ok(ParsedRows::default()),
            Some(Value::Array(_)) | Some(Value::Object(_)) => {}
            Some(other) => {
                return Err(LoadError::parse(format!(
                    "Expected rows to be arrays or objects, got {}",
                    other
                )));
            }
        }

        if matches!(entries.first(), Some(Value::Array(_))) {
            Self::parse_array_rows(entries)
        } else {
            Self::parse_object_rows(entries)
        }
    }

    fn parse_array_rows(entries: Vec<Value>) -> Result<ParsedRows, LoadError> {
        let mut entries = entries.into_iter();
        let header = match entries.next() {
            Some(Value::Array(header)) => header,
            _ => return Err(LoadError::parse("Missing header row")),
        };
        let column_names = header
            .into_iter()
            .map(|name| match name {
                Value::String(s) => Ok(s),
                other => Err(LoadError::parse(format!(
                    "Column names must be strings, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows = entries
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Array(values) => Ok(values.into_iter().map(CellValue::from).collect()),
                _ => Err(LoadError::parse(format!("Row {} is not an array", index + 1))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParsedRows::new(column_names, rows))
    }

    fn parse_object_rows(entries: Vec<Value>) -> Result<ParsedRows, LoadError> {
        let objects = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(map) => Ok(map),
                _ => Err(LoadError::parse(format!("Row {} is not an object", index))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Columns appear in order of first mention.
        let mut column_names: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !column_names.contains(key) {
                    column_names.push(key.clone());
                }
            }
        }

        let rows = objects
            .into_iter()
            .map(|mut object| {
                column_names
                    .iter()
                    .map(|name| object.remove(name).map(CellValue::from).unwrap_or_default())
                    .collect()
            })
            .collect();
        Ok(ParsedRows::new(column_names, rows))
    }

    fn parse_columns(document: Value) -> Result<ParsedRows, LoadError> {
        let columns: Vec<(String, Vec<CellValue>)> = match document {
            Value::Array(entries) => entries
                .into_iter()
                .map(|entry| {
                    let mut values = match entry {
                        Value::Array(values) => values.into_iter(),
                        other => {
                            return Err(LoadError::parse(format!(
                                "Expected a column array, got {}",
                                other
                            )));
                        }
                    };
                    let name = match values.next() {
                        Some(Value::String(name)) => name,
                        _ => return Err(LoadError::parse("Column arrays must start with a name")),
                    };
                    Ok((name, values.map(CellValue::from).collect()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(map) => map
                .into_iter()
                .map(|(name, values)| match values {
                    Value::Array(values) => Ok((name, values.into_iter().map(CellValue::from).collect())),
                    other => Err(LoadError::parse(format!(
                        "Column '{}' is not an array, got {}",
                        name, other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(LoadError::parse(format!(
                    "Expected an array or object of columns, got {}",
                    other
                )));
            }
        };

        let row_count = columns.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
        let mut rows: Vec<Vec<CellValue>> = vec![Vec::with_capacity(columns.len()); row_count];
        let mut column_names = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            column_names.push(name);
            let mut values = values.into_iter();
            for row in rows.iter_mut() {
                row.push(values.next().unwrap_or_default());
            }
        }
        Ok(ParsedRows::new(column_names, rows))
    }
}

impl DataConverter for JsonConverter {
    fn parse(&self, raw: &str) -> Result<ParsedRows, LoadError> {
        let document: Value = serde_json::from_str(raw)?;
        let parsed = match self.orientation {
            JsonOrientation::Rows => match document {
                Value::Array(entries) => Self::parse_rows(entries)?,
                other => {
                    return Err(LoadError::parse(format!(
                        "Expected an array of rows, got {}",
                        other
                    )));
                }
            },
            JsonOrientation::Columns => Self::parse_columns(document)?,
        };
        debug!(
            "Parsed {} rows x {} columns",
            parsed.rows.len(),
            parsed.column_names.len()
        );
        Ok(parsed)
    }
}

#[derive(Debug, Clone)]
enum JsonSource {
    Text(String),
    File(PathBuf),
}

/// Loads a table from JSON text or a JSON file.
#[derive(Debug, Clone)]
pub struct JsonConnector {
    source: JsonSource,
    converter: JsonConverter,
}

impl JsonConnector {
    /// Creates a connector over inline JSON text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: JsonSource::Text(text.into()),
            converter: JsonConverter::default(),
        }
    }

    /// Creates a connector that reads a JSON file on each load.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: JsonSource::File(path.into()),
            converter: JsonConverter::default(),
        }
    }

    /// Sets the document orientation.
    pub fn with_orientation(mut self, orientation: JsonOrientation) -> Self {
        self.converter = JsonConverter::new(orientation);
        self
    }
}

#[async_trait]
impl DataConnector for JsonConnector {
    async fn load(&self) -> Result<DataTable, LoadError> {
        let table = match &self.source {
            JsonSource::Text(text) => self.converter.convert(text)?,
            JsonSource::File(path) => {
                let text = tokio::fs::read_to_string(path).await?;
                self.converter.convert(&text)?
            }
        };
        info!(
            "Loaded JSON table with {} rows and {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ColumnType;

    #[test]
    fn test_objects_union_columns() {
        let table = JsonConverter::rows()
            .convert(r#"[{"a": 1}, {"b": true, "a": 2}]"#)
            .unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        let first = table.row_id_at(0).unwrap();
        assert_eq!(table.get_cell(first, "b").unwrap(), CellValue::Null);
        assert_eq!(table.column_type("b").unwrap(), ColumnType::Boolean);
    }

    #[test]
    fn test_arrays_with_header() {
        let table = JsonConverter::rows()
            .convert(r#"[["name", "qty"], ["x", 1], ["y"]]"#)
            .unwrap();
        assert_eq!(table.row_count(), 2);
        let second = table.row_id_at(1).unwrap();
        assert_eq!(table.get_cell(second, "qty").unwrap(), CellValue::Null);
    }

    #[test]
    fn test_columns_orientation() {
        let table = JsonConverter::columns()
            .convert(r#"[["name", "x", "y", "z"], ["qty", 1, 2]]"#)
            .unwrap();
        assert_eq!(table.row_count(), 3);
        let last = table.row_id_at(2).unwrap();
        assert_eq!(table.get_cell(last, "qty").unwrap(), CellValue::Null);

        let table = JsonConverter::columns()
            .convert(r#"{"a": [1, 2], "b": ["p", "q"]}"#)
            .unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_nested_values_become_text() {
        let table = JsonConverter::rows()
            .convert(r#"[{"tags": [1, 2]}]"#)
            .unwrap();
        let first = table.row_id_at(0).unwrap();
        assert_eq!(table.get_cell(first, "tags").unwrap(), CellValue::from("[1,2]"));
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(
            JsonConverter::rows().convert(r#"{"a": 1}"#),
            Err(LoadError::Parse { .. })
        ));
        assert!(matches!(
            JsonConverter::rows().convert(r#"[1, 2]"#),
            Err(LoadError::Parse { .. })
        ));
        assert!(matches!(
            JsonConverter::rows().convert("not json"),
            Err(LoadError::Json(_))
        ));
    }
}
