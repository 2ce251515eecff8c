//! Stable multi-column sorting.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use super::{DataModifier, require_column};
use crate::error::SchemaError;
use crate::table::{DataTable, RowId};
use crate::value::CellValue;
use crate::view::TableView;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Sorts a view by one or more columns.
///
/// The sort is stable: rows with equal keys keep their order from the input
/// view, so sorting an already sorted view by the same keys changes nothing.
///
/// # Example
///
/// ```
/// use datagrid_core::modifier::SortModifier;
///
/// let sort = SortModifier::desc("revenue").then_asc("name");
/// assert_eq!(sort.keys().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SortModifier {
    keys: Vec<(String, Direction)>,
}

impl SortModifier {
    /// Creates a sort from `(column, direction)` pairs, highest priority first.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = (S, Direction)>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(|(c, d)| (c.into(), d)).collect(),
        }
    }

    /// Creates an ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            keys: vec![(column.into(), Direction::Asc)],
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            keys: vec![(column.into(), Direction::Desc)],
        }
    }

    /// Adds a lower-priority ascending key.
    pub fn then_asc(mut self, column: impl Into<String>) -> Self {
        self.keys.push((column.into(), Direction::Asc));
        self
    }

    /// Adds a lower-priority descending key.
    pub fn then_desc(mut self, column: impl Into<String>) -> Self {
        self.keys.push((column.into(), Direction::Desc));
        self
    }

    /// Returns the sort keys.
    pub fn keys(&self) -> &[(String, Direction)] {
        &self.keys
    }
}

impl DataModifier for SortModifier {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn apply_to(&self, table: &DataTable, view: TableView) -> Result<TableView, SchemaError> {
        for (column, _) in &self.keys {
            require_column(table, column)?;
        }
        if self.keys.is_empty() {
            return Ok(view);
        }

        let null = CellValue::Null;
        let mut keyed: Vec<(RowId, Vec<&CellValue>)> = view
            .into_row_ids()
            .into_iter()
            .map(|id| {
                let index = table.row_index(id);
                let values = self
                    .keys
                    .iter()
                    .map(|(column, _)| {
                        index
                            .and_then(|i| table.cell(i, column))
                            .unwrap_or(&null)
                    })
                    .collect();
                (id, values)
            })
            .collect();

        // `sort_by` is stable.
        keyed.sort_by(|(_, a), (_, b)| {
            for (i, (_, direction)) in self.keys.iter().enumerate() {
                let ordering = a[i].total_cmp(b[i]);
                let ordering = match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        Ok(TableView::from_rows(keyed.into_iter().map(|(id, _)| id).collect()))
    }
}
