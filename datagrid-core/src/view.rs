//! Read-only projections of a table.

use std::ops::Range;

use crate::table::{DataTable, RowId};
use crate::value::CellValue;

/// An ordered selection of row ids from a [`DataTable`].
///
/// A view never owns cell data; it is a permutation or subset of the source
/// table's row ids. Modifiers produce views, they never produce or mutate
/// tables, so a view can be derived as often as needed without touching the
/// source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableView {
    rows: Vec<RowId>,
}

impl TableView {
    /// A view of every row in source order.
    pub fn full(table: &DataTable) -> Self {
        Self {
            rows: table.row_ids().to_vec(),
        }
    }

    /// A view over an explicit row order.
    pub fn from_rows(rows: Vec<RowId>) -> Self {
        Self { rows }
    }

    /// Returns the row ids in view order.
    pub fn row_ids(&self) -> &[RowId] {
        &self.rows
    }

    /// Consumes the view and returns its row ids.
    pub fn into_row_ids(self) -> Vec<RowId> {
        self.rows
    }

    /// Returns the number of rows in the view.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the view has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the id at a view position.
    pub fn get(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).copied()
    }

    /// Returns the ids in a range of view positions, clamped to the view.
    pub fn slice(&self, range: Range<usize>) -> &[RowId] {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        &self.rows[start..end]
    }

    /// Returns the view position of a row.
    pub fn position(&self, row: RowId) -> Option<usize> {
        self.rows.iter().position(|r| *r == row)
    }

    /// Iterates the view's rows as borrowed row references.
    pub fn rows<'a>(&'a self, table: &'a DataTable) -> impl Iterator<Item = RowRef<'a>> + 'a {
        self.rows
            .iter()
            .filter_map(move |id| table.row_index(*id).map(|index| RowRef { table, id: *id, index }))
    }
}

/// Borrowed access to one row of a table.
///
/// Handed to filter predicates and custom modifiers. It only exposes shared
/// references, so a predicate cannot change the row it inspects.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a DataTable,
    id: RowId,
    index: usize,
}

impl<'a> RowRef<'a> {
    /// Creates a row reference for a row id, if the row exists.
    pub fn new(table: &'a DataTable, id: RowId) -> Option<Self> {
        table.row_index(id).map(|index| Self { table, id, index })
    }

    /// The row's id.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// The row's source position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Borrows the value of a column.
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.table.cell(self.index, column)
    }
}
