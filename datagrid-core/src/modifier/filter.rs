//! Row filtering.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::{DataModifier, require_column};
use crate::error::SchemaError;
use crate::table::DataTable;
use crate::value::CellValue;
use crate::view::{RowRef, TableView};

/// Host-supplied row predicate.
pub type Predicate = Arc<dyn Fn(&RowRef<'_>) -> bool + Send + Sync>;

/// A condition over a row's values.
///
/// Conditions can be combined using logical operators (`And`, `Or`, `Not`).
/// Comparisons only match values of the same type; null never matches a
/// comparison other than `IsNull`.
///
/// # Example
///
/// ```
/// use datagrid_core::modifier::Condition;
///
/// // Simple equality
/// let cond = Condition::eq("status", "open");
///
/// // Combined
/// let cond = Condition::and([
///     Condition::eq("status", "open"),
///     Condition::gt("price", 100.0),
/// ]);
///
/// // Using combinators
/// let cond = Condition::eq("status", "open")
///     .and_also(Condition::gt("price", 100.0))
///     .not();
/// ```
#[derive(Clone)]
pub enum Condition {
    /// Equality: `column == value`
    Eq(String, CellValue),
    /// Not equal: `column != value`
    Ne(String, CellValue),
    /// Greater than: `column > value`
    Gt(String, CellValue),
    /// Greater than or equal: `column >= value`
    Ge(String, CellValue),
    /// Less than: `column < value`
    Lt(String, CellValue),
    /// Less than or equal: `column <= value`
    Le(String, CellValue),
    /// String column contains a substring.
    Contains(String, String),
    /// String column starts with a prefix.
    StartsWith(String, String),
    /// String column ends with a suffix.
    EndsWith(String, String),
    /// Column is null.
    IsNull(String),
    /// Column is not null.
    IsNotNull(String),
    /// Logical AND of multiple conditions.
    And(Vec<Condition>),
    /// Logical OR of multiple conditions.
    Or(Vec<Condition>),
    /// Logical negation.
    Not(Box<Condition>),
    /// Arbitrary predicate (escape hatch).
    Custom(Predicate),
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq(c, v) => write!(f, "{c} == {v:?}"),
            Self::Ne(c, v) => write!(f, "{c} != {v:?}"),
            Self::Gt(c, v) => write!(f, "{c} > {v:?}"),
            Self::Ge(c, v) => write!(f, "{c} >= {v:?}"),
            Self::Lt(c, v) => write!(f, "{c} < {v:?}"),
            Self::Le(c, v) => write!(f, "{c} <= {v:?}"),
            Self::Contains(c, s) => write!(f, "contains({c}, {s:?})"),
            Self::StartsWith(c, s) => write!(f, "startswith({c}, {s:?})"),
            Self::EndsWith(c, s) => write!(f, "endswith({c}, {s:?})"),
            Self::IsNull(c) => write!(f, "{c} is null"),
            Self::IsNotNull(c) => write!(f, "{c} is not null"),
            Self::And(all) => f.debug_tuple("And").field(all).finish(),
            Self::Or(any) => f.debug_tuple("Or").field(any).finish(),
            Self::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Self::Custom(_) => write!(f, "Custom(...)"),
        }
    }
}

impl Condition {
    /// Creates an equality condition.
    pub fn eq(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Condition::Eq(column.into(), value.into())
    }

    /// Creates a not-equal condition.
    pub fn ne(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Condition::Ne(column.into(), value.into())
    }

    /// Creates a greater-than condition.
    pub fn gt(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Condition::Gt(column.into(), value.into())
    }

    /// Creates a greater-than-or-equal condition.
    pub fn ge(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Condition::Ge(column.into(), value.into())
    }

    /// Creates a less-than condition.
    pub fn lt(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Condition::Lt(column.into(), value.into())
    }

    /// Creates a less-than-or-equal condition.
    pub fn le(column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Condition::Le(column.into(), value.into())
    }

    /// Creates a substring condition.
    pub fn contains(column: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Contains(column.into(), value.into())
    }

    /// Creates a prefix condition.
    pub fn starts_with(column: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::StartsWith(column.into(), value.into())
    }

    /// Creates a suffix condition.
    pub fn ends_with(column: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::EndsWith(column.into(), value.into())
    }

    /// Creates an is-null condition.
    pub fn is_null(column: impl Into<String>) -> Self {
        Condition::IsNull(column.into())
    }

    /// Creates an is-not-null condition.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Condition::IsNotNull(column.into())
    }

    /// Creates a logical AND of multiple conditions.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::And(conditions.into_iter().collect())
    }

    /// Creates a logical OR of multiple conditions.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Or(conditions.into_iter().collect())
    }

    /// Creates a condition from a predicate.
    pub fn custom(predicate: impl Fn(&RowRef<'_>) -> bool + Send + Sync + 'static) -> Self {
        Condition::Custom(Arc::new(predicate))
    }

    /// Combines this condition with another using logical AND.
    pub fn and_also(self, other: Condition) -> Self {
        match self {
            Condition::And(mut conditions) => {
                conditions.push(other);
                Condition::And(conditions)
            }
            _ => Condition::And(vec![self, other]),
        }
    }

    /// Combines this condition with another using logical OR.
    pub fn or_else(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut conditions) => {
                conditions.push(other);
                Condition::Or(conditions)
            }
            _ => Condition::Or(vec![self, other]),
        }
    }

    /// Negates this condition.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Condition::Not(Box::new(self))
    }

    /// Collects every column the condition references.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Condition::Eq(c, _)
            | Condition::Ne(c, _)
            | Condition::Gt(c, _)
            | Condition::Ge(c, _)
            | Condition::Lt(c, _)
            | Condition::Le(c, _)
            | Condition::Contains(c, _)
            | Condition::StartsWith(c, _)
            | Condition::EndsWith(c, _)
            | Condition::IsNull(c)
            | Condition::IsNotNull(c) => out.push(c),
            Condition::And(all) | Condition::Or(all) => {
                for condition in all {
                    condition.collect_columns(out);
                }
            }
            Condition::Not(inner) => inner.collect_columns(out),
            Condition::Custom(_) => {}
        }
    }

    /// Evaluates the condition against a row.
    pub fn matches(&self, row: &RowRef<'_>) -> bool {
        match self {
            Condition::Eq(c, v) => value(row, c) == v,
            Condition::Ne(c, v) => value(row, c) != v,
            Condition::Gt(c, v) => compare(row, c, v, Ordering::is_gt),
            Condition::Ge(c, v) => compare(row, c, v, Ordering::is_ge),
            Condition::Lt(c, v) => compare(row, c, v, Ordering::is_lt),
            Condition::Le(c, v) => compare(row, c, v, Ordering::is_le),
            Condition::Contains(c, s) => text(row, c).is_some_and(|t| t.contains(s.as_str())),
            Condition::StartsWith(c, s) => text(row, c).is_some_and(|t| t.starts_with(s.as_str())),
            Condition::EndsWith(c, s) => text(row, c).is_some_and(|t| t.ends_with(s.as_str())),
            Condition::IsNull(c) => value(row, c).is_null(),
            Condition::IsNotNull(c) => !value(row, c).is_null(),
            Condition::And(all) => all.iter().all(|cond| cond.matches(row)),
            Condition::Or(any) => any.iter().any(|cond| cond.matches(row)),
            Condition::Not(inner) => !inner.matches(row),
            Condition::Custom(predicate) => predicate(row),
        }
    }
}

static NULL: CellValue = CellValue::Null;

fn value<'a>(row: &RowRef<'a>, column: &str) -> &'a CellValue {
    row.get(column).unwrap_or(&NULL)
}

fn text<'a>(row: &RowRef<'a>, column: &str) -> Option<&'a str> {
    value(row, column).as_str()
}

fn compare(row: &RowRef<'_>, column: &str, expected: &CellValue, accept: fn(Ordering) -> bool) -> bool {
    let actual = value(row, column);
    !actual.is_null() && actual.partial_compare(expected).is_some_and(accept)
}

/// Keeps the rows of a view that satisfy a [`Condition`].
///
/// Excluded rows are only left out of the view; the source table keeps them.
#[derive(Debug, Clone)]
pub struct FilterModifier {
    condition: Condition,
}

impl FilterModifier {
    /// Creates a filter from a condition.
    pub fn new(condition: Condition) -> Self {
        Self { condition }
    }

    /// Returns the filter's condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

impl DataModifier for FilterModifier {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn apply_to(&self, table: &DataTable, view: TableView) -> Result<TableView, SchemaError> {
        for column in self.condition.columns() {
            require_column(table, column)?;
        }

        let rows = view
            .rows(table)
            .filter(|row| self.condition.matches(row))
            .map(|row| row.id())
            .collect();
        Ok(TableView::from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::from_columns([
            (
                "name",
                vec![
                    CellValue::from("Apple"),
                    CellValue::from("Banana"),
                    CellValue::Null,
                    CellValue::from("Apricot"),
                ],
            ),
            (
                "price",
                vec![
                    CellValue::from(3.0),
                    CellValue::from(1.0),
                    CellValue::from(2.0),
                    CellValue::Null,
                ],
            ),
        ])
        .unwrap()
    }

    fn raw(view: &TableView) -> Vec<u64> {
        view.row_ids().iter().map(|r| r.get()).collect()
    }

    fn run(condition: Condition) -> Vec<u64> {
        let table = table();
        raw(&FilterModifier::new(condition).apply(&table).unwrap())
    }

    #[test]
    fn test_comparisons_skip_nulls() {
        assert_eq!(run(Condition::ge("price", 2.0)), vec![1, 3]);
        assert_eq!(run(Condition::lt("price", 3.0)), vec![2, 3]);
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(run(Condition::starts_with("name", "Ap")), vec![1, 4]);
        assert_eq!(run(Condition::contains("name", "nan")), vec![2]);
        assert_eq!(run(Condition::ends_with("name", "e")), vec![1]);
    }

    #[test]
    fn test_combined_conditions() {
        let cond = Condition::starts_with("name", "Ap").and_also(Condition::is_not_null("price"));
        assert_eq!(run(cond), vec![1]);

        let cond = Condition::is_null("name").or_else(Condition::is_null("price"));
        assert_eq!(run(cond), vec![3, 4]);

        assert_eq!(run(Condition::eq("name", "Banana").not()), vec![1, 3, 4]);
    }

    #[test]
    fn test_custom_predicate() {
        let cond = Condition::custom(|row| row.index() % 2 == 0);
        assert_eq!(run(cond), vec![1, 3]);
    }

    #[test]
    fn test_unknown_column_fails() {
        let table = table();
        let err = FilterModifier::new(Condition::eq("missing", 1.0))
            .apply(&table)
            .unwrap_err();
        assert_eq!(err, SchemaError::unknown_column("missing"));
    }

    #[test]
    fn test_source_untouched() {
        let table = table();
        FilterModifier::new(Condition::eq("name", "Apple"))
            .apply(&table)
            .unwrap();
        assert_eq!(table.row_count(), 4);
    }
}
