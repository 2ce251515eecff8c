//! Cell values and column types

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::TypeMismatchError;

/// A single cell value.
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | true/false | `Bool` |
/// | number | `Number` |
/// | string | `String` |
///
/// # Example
///
/// ```
/// use datagrid_core::CellValue;
///
/// let name = CellValue::from("Contoso");
/// let revenue = CellValue::from(1_000_000.0);
/// let active = CellValue::from(true);
/// let empty = CellValue::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty cell.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit floating point number.
    Number(f64),
    /// String value.
    String(String),
}

impl CellValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Bool(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
        }
    }

    /// Returns the number if this is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Interprets the value as a number, parsing numeric strings.
    pub fn to_number_lossy(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Number(_) => 2,
            CellValue::String(_) => 3,
        }
    }

    /// Total ordering used for sorting: `Null < Bool < Number < String`.
    pub fn total_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Ordering between values of the same type.
    ///
    /// Returns `None` when the values have different types, so comparisons
    /// against mismatched values never match.
    pub fn partial_compare(&self, other: &CellValue) -> Option<Ordering> {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => Some(Ordering::Equal),
            (CellValue::Bool(a), CellValue::Bool(b)) => Some(a.cmp(b)),
            (CellValue::Number(a), CellValue::Number(b)) => a.partial_cmp(b),
            (CellValue::String(a), CellValue::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Formats a number without a trailing `.0` for integral values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Number(f64::from(v))
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::String(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::String(v.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
            serde_json::Value::String(s) => CellValue::String(s),
            nested => CellValue::String(nested.to_string()),
        }
    }
}

// =============================================================================
// Column types
// =============================================================================

/// The declared type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    /// Accepts every value unchanged.
    #[default]
    Any,
    /// Text values.
    String,
    /// Numeric values.
    Number,
    /// Boolean values.
    Boolean,
}

impl ColumnType {
    /// Infers a column type from its values.
    ///
    /// Nulls are ignored. A column with only nulls, or with values of more
    /// than one type, is `Any`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut inferred: Option<ColumnType> = None;
        for value in values {
            let kind = match value {
                CellValue::Null => continue,
                CellValue::Bool(_) => ColumnType::Boolean,
                CellValue::Number(_) => ColumnType::Number,
                CellValue::String(_) => ColumnType::String,
            };
            match inferred {
                None => inferred = Some(kind),
                Some(existing) if existing == kind => {}
                Some(_) => return ColumnType::Any,
            }
        }
        inferred.unwrap_or(ColumnType::Any)
    }

    /// Coerces a value into this type.
    ///
    /// Null is accepted by every type. Conversions that could lose meaning
    /// (for example a boolean into a number column) are rejected.
    pub fn coerce(&self, column: &str, value: CellValue) -> Result<CellValue, TypeMismatchError> {
        let mismatch = |value: &CellValue| {
            TypeMismatchError::new(column, *self, value.type_name(), value.to_string())
        };

        match (self, value) {
            (_, CellValue::Null) => Ok(CellValue::Null),
            (ColumnType::Any, value) => Ok(value),

            (ColumnType::String, CellValue::String(s)) => Ok(CellValue::String(s)),
            (ColumnType::String, other) => Ok(CellValue::String(other.to_string())),

            (ColumnType::Number, CellValue::Number(n)) => Ok(CellValue::Number(n)),
            (ColumnType::Number, CellValue::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(CellValue::Null);
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(CellValue::Number(n)),
                    _ => Err(mismatch(&CellValue::String(s))),
                }
            }
            (ColumnType::Number, other) => Err(mismatch(&other)),

            (ColumnType::Boolean, CellValue::Bool(b)) => Ok(CellValue::Bool(b)),
            (ColumnType::Boolean, CellValue::String(s)) => {
                if s.trim().eq_ignore_ascii_case("true") {
                    Ok(CellValue::Bool(true))
                } else if s.trim().eq_ignore_ascii_case("false") {
                    Ok(CellValue::Bool(false))
                } else {
                    Err(mismatch(&CellValue::String(s)))
                }
            }
            (ColumnType::Boolean, CellValue::Number(n)) if n == 0.0 || n == 1.0 => {
                Ok(CellValue::Bool(n == 1.0))
            }
            (ColumnType::Boolean, other) => Err(mismatch(&other)),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Any => "any",
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_types() {
        let numbers = [CellValue::from(1.0), CellValue::Null, CellValue::from(2.0)];
        assert_eq!(ColumnType::infer(&numbers), ColumnType::Number);

        let mixed = [CellValue::from(1.0), CellValue::from("a")];
        assert_eq!(ColumnType::infer(&mixed), ColumnType::Any);

        let nulls = [CellValue::Null];
        assert_eq!(ColumnType::infer(&nulls), ColumnType::Any);
    }

    #[test]
    fn test_coerce_number() {
        let t = ColumnType::Number;
        assert_eq!(t.coerce("n", " 42 ".into()).unwrap(), CellValue::Number(42.0));
        assert_eq!(t.coerce("n", "".into()).unwrap(), CellValue::Null);
        assert!(t.coerce("n", "abc".into()).is_err());
        assert!(t.coerce("n", true.into()).is_err());
    }

    #[test]
    fn test_coerce_boolean() {
        let t = ColumnType::Boolean;
        assert_eq!(t.coerce("b", "TRUE".into()).unwrap(), CellValue::Bool(true));
        assert_eq!(t.coerce("b", 0.0.into()).unwrap(), CellValue::Bool(false));
        assert!(t.coerce("b", 2.0.into()).is_err());
    }

    #[test]
    fn test_coerce_string_formats() {
        let t = ColumnType::String;
        assert_eq!(t.coerce("s", 3.0.into()).unwrap(), CellValue::from("3"));
        assert_eq!(t.coerce("s", 2.5.into()).unwrap(), CellValue::from("2.5"));
        assert_eq!(t.coerce("s", false.into()).unwrap(), CellValue::from("false"));
    }

    #[test]
    fn test_total_ordering() {
        let mut values = vec![
            CellValue::from("b"),
            CellValue::from(2.0),
            CellValue::Null,
            CellValue::from(true),
            CellValue::from("a"),
        ];
        values.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::from(true),
                CellValue::from(2.0),
                CellValue::from("a"),
                CellValue::from("b"),
            ]
        );
    }

    #[test]
    fn test_json_conversion() {
        let value: CellValue = serde_json::json!([1, 2]).into();
        assert_eq!(value, CellValue::from("[1,2]"));
        let value: CellValue = serde_json::json!(3).into();
        assert_eq!(value, CellValue::Number(3.0));
    }
}
