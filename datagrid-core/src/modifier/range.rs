//! Inclusive value-range filtering.

use std::cmp::Ordering;

use super::{DataModifier, require_column};
use crate::error::SchemaError;
use crate::table::DataTable;
use crate::value::CellValue;
use crate::view::TableView;

/// Bounds on one column. Either bound may be left open.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRange {
    /// Column the bounds apply to.
    pub column: String,
    /// Inclusive lower bound.
    pub min: Option<CellValue>,
    /// Inclusive upper bound.
    pub max: Option<CellValue>,
}

impl ValueRange {
    /// Creates a range with both bounds.
    pub fn new(
        column: impl Into<String>,
        min: impl Into<CellValue>,
        max: impl Into<CellValue>,
    ) -> Self {
        Self {
            column: column.into(),
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Creates a range with only a lower bound.
    pub fn at_least(column: impl Into<String>, min: impl Into<CellValue>) -> Self {
        Self {
            column: column.into(),
            min: Some(min.into()),
            max: None,
        }
    }

    /// Creates a range with only an upper bound.
    pub fn at_most(column: impl Into<String>, max: impl Into<CellValue>) -> Self {
        Self {
            column: column.into(),
            min: None,
            max: Some(max.into()),
        }
    }

    fn contains(&self, value: &CellValue, strict: bool) -> bool {
        if value.is_null() {
            return false;
        }
        let above = self
            .min
            .as_ref()
            .is_none_or(|min| compare(value, min, strict).is_some_and(Ordering::is_ge));
        let below = self
            .max
            .as_ref()
            .is_none_or(|max| compare(value, max, strict).is_some_and(Ordering::is_le));
        above && below
    }
}

fn compare(value: &CellValue, bound: &CellValue, strict: bool) -> Option<Ordering> {
    if strict {
        return value.partial_compare(bound);
    }
    match (value.to_number_lossy(), bound.to_number_lossy()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => value.partial_compare(bound),
    }
}

/// Keeps rows whose values fall inside every configured range.
///
/// In the default non-strict mode, numeric strings are compared as numbers,
/// so `"10"` lies between `2` and `20`. Strict mode only compares values of
/// the same type. Null never lies inside a range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeModifier {
    ranges: Vec<ValueRange>,
    strict: bool,
}

impl RangeModifier {
    /// Creates a modifier from a single range.
    pub fn new(range: ValueRange) -> Self {
        Self {
            ranges: vec![range],
            strict: false,
        }
    }

    /// Adds another range that must also hold.
    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Sets strict type comparison.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the configured ranges.
    pub fn ranges(&self) -> &[ValueRange] {
        &self.ranges
    }
}

impl DataModifier for RangeModifier {
    fn name(&self) -> &'static str {
        "range"
    }

    fn apply_to(&self, table: &DataTable, view: TableView) -> Result<TableView, SchemaError> {
        for range in &self.ranges {
            require_column(table, &range.column)?;
        }

        let rows = view
            .rows(table)
            .filter(|row| {
                self.ranges.iter().all(|range| {
                    row.get(&range.column)
                        .is_some_and(|value| range.contains(value, self.strict))
                })
            })
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
                "qty",
                vec![
                    CellValue::from(1.0),
                    CellValue::from("10"),
                    CellValue::from(5.0),
                    CellValue::Null,
                    CellValue::from(20.0),
                ],
            ),
            (
                "price",
                vec![
                    CellValue::from(9.0),
                    CellValue::from(4.0),
                    CellValue::from(2.0),
                    CellValue::from(3.0),
                    CellValue::from(1.0),
                ],
            ),
        ])
        .unwrap()
    }

    fn raw(view: &TableView) -> Vec<u64> {
        view.row_ids().iter().map(|r| r.get()).collect()
    }

    #[test]
    fn test_inclusive_bounds() {
        let table = table();
        let view = RangeModifier::new(ValueRange::new("qty", 5.0, 20.0))
            .apply(&table)
            .unwrap();
        assert_eq!(raw(&view), vec![2, 3, 5]);
    }

    #[test]
    fn test_strict_skips_other_types() {
        let table = table();
        let view = RangeModifier::new(ValueRange::new("qty", 5.0, 20.0))
            .with_strict(true)
            .apply(&table)
            .unwrap();
        assert_eq!(raw(&view), vec![3, 5]);
    }

    #[test]
    fn test_all_ranges_must_hold() {
        let table = table();
        let view = RangeModifier::new(ValueRange::at_least("qty", 5.0))
            .with_range(ValueRange::at_most("price", 2.0))
            .apply(&table)
            .unwrap();
        assert_eq!(raw(&view), vec![3, 5]);
    }

    #[test]
    fn test_unknown_column() {
        let table = table();
        let err = RangeModifier::new(ValueRange::at_least("nope", 1.0))
            .apply(&table)
            .unwrap_err();
        assert_eq!(err, SchemaError::unknown_column("nope"));
    }
}
