//! The canonical in-memory table.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::trace;

use crate::cursor::{ChangeEvent, ChangeKind, DataCursor, ListenFilter, ListenerId};
use crate::error::{DataError, SchemaError};
use crate::value::{CellValue, ColumnType};

/// Unique identifier for a table instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table-{}", self.0)
    }
}

/// Stable row identifier, independent of the row's position.
///
/// Identifiers are assigned when a row is added and never change or get
/// reused within a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    /// Creates a row id from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A copy of one row's values, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// The row's identifier.
    pub id: RowId,
    /// `(column, value)` pairs in column order.
    pub values: Vec<(String, CellValue)>,
}

impl Row {
    /// Returns the value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone)]
struct ColumnData {
    name: String,
    kind: ColumnType,
    values: Vec<CellValue>,
}

/// An ordered set of typed columns sharing one set of stable row ids.
///
/// All columns always have the same length. Reads return copies; the only way
/// to change a cell is through the mutating methods, each of which emits a
/// [`ChangeEvent`] on the table's [`DataCursor`].
///
/// # Example
///
/// ```
/// use datagrid_core::{CellValue, DataTable};
///
/// let mut table = DataTable::from_columns([
///     ("name", vec![CellValue::from("B"), CellValue::from("A")]),
/// ])
/// .unwrap();
///
/// let first = table.row_id_at(0).unwrap();
/// table.set_cell(first, "name", "C".into()).unwrap();
/// assert_eq!(table.get_cell(first, "name").unwrap(), CellValue::from("C"));
/// ```
pub struct DataTable {
    id: TableId,
    columns: Vec<ColumnData>,
    column_index: HashMap<String, usize>,
    row_ids: Vec<RowId>,
    row_positions: HashMap<RowId, usize>,
    next_row_id: u64,
    cursor: DataCursor,
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("id", &self.id)
            .field("columns", &self.column_names())
            .field("rows", &self.row_ids.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DataTable {
    /// Produces a detached copy: same row ids and values, fresh cursor.
    fn clone(&self) -> Self {
        Self {
            id: TableId::new(),
            columns: self.columns.clone(),
            column_index: self.column_index.clone(),
            row_ids: self.row_ids.clone(),
            row_positions: self.row_positions.clone(),
            next_row_id: self.next_row_id,
            cursor: DataCursor::new(),
        }
    }
}

impl DataTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            id: TableId::new(),
            columns: Vec::new(),
            column_index: HashMap::new(),
            row_ids: Vec::new(),
            row_positions: HashMap::new(),
            next_row_id: 1,
            cursor: DataCursor::new(),
        }
    }

    /// Creates a table from named columns, inferring each column's type.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (S, Vec<CellValue>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            let kind = ColumnType::infer(&values);
            table.add_column(name, kind, values)?;
        }
        Ok(table)
    }

    /// Returns the table's instance id.
    pub fn id(&self) -> TableId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Shape
    // -------------------------------------------------------------------------

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_ids.len()
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Returns `true` if the column exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_index.contains_key(column)
    }

    /// Returns a column's declared type.
    pub fn column_type(&self, column: &str) -> Result<ColumnType, SchemaError> {
        Ok(self.columns[self.column_position(column)?].kind)
    }

    /// Returns the row ids in source order.
    pub fn row_ids(&self) -> &[RowId] {
        &self.row_ids
    }

    /// Returns the source position of a row.
    pub fn row_index(&self, row: RowId) -> Option<usize> {
        self.row_positions.get(&row).copied()
    }

    /// Returns the id of the row at a source position.
    pub fn row_id_at(&self, index: usize) -> Option<RowId> {
        self.row_ids.get(index).copied()
    }

    /// Returns the table revision (number of change events emitted).
    pub fn revision(&self) -> u64 {
        self.cursor.revision()
    }

    fn column_position(&self, column: &str) -> Result<usize, SchemaError> {
        self.column_index
            .get(column)
            .copied()
            .ok_or_else(|| SchemaError::unknown_column(column))
    }

    fn row_position(&self, row: RowId) -> Result<usize, SchemaError> {
        self.row_index(row).ok_or(SchemaError::unknown_row(row))
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Returns a copy of one cell.
    pub fn get_cell(&self, row: RowId, column: &str) -> Result<CellValue, SchemaError> {
        let col = self.column_position(column)?;
        let index = self.row_position(row)?;
        Ok(self.columns[col].values[index].clone())
    }

    /// Borrows a cell by source position.
    ///
    /// Used by modifiers to read values without copying.
    pub fn cell(&self, index: usize, column: &str) -> Option<&CellValue> {
        let col = *self.column_index.get(column)?;
        self.columns[col].values.get(index)
    }

    /// Returns a copy of one row.
    pub fn get_row(&self, row: RowId) -> Result<Row, SchemaError> {
        let index = self.row_position(row)?;
        let values = self
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.values[index].clone()))
            .collect();
        Ok(Row { id: row, values })
    }

    /// Returns a copy of one column's values in source order.
    pub fn get_column(&self, column: &str) -> Result<Vec<CellValue>, SchemaError> {
        Ok(self.columns[self.column_position(column)?].values.clone())
    }

    // -------------------------------------------------------------------------
    // Cell mutation
    // -------------------------------------------------------------------------

    /// Writes one cell, coercing the value to the column's type.
    ///
    /// Emits a [`ChangeKind::CellsUpdated`] event covering the single cell.
    pub fn set_cell(&mut self, row: RowId, column: &str, value: CellValue) -> Result<(), DataError> {
        let col = self.column_position(column)?;
        let index = self.row_position(row)?;
        let value = self.columns[col].kind.coerce(column, value)?;

        trace!("{}: set {} {} = {:?}", self.id, row, column, value);
        self.columns[col].values[index] = value;
        self.cursor.emit(
            ChangeKind::CellsUpdated,
            index..index + 1,
            Some(vec![column.to_string()]),
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Column mutation
    // -------------------------------------------------------------------------

    /// Adds a column.
    ///
    /// The first column of an empty table defines the row count and assigns
    /// row ids. Later columns must match the existing row count.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        kind: ColumnType,
        values: Vec<CellValue>,
    ) -> Result<(), DataError> {
        let name = name.into();
        if self.column_index.contains_key(&name) {
            return Err(SchemaError::duplicate_column(name).into());
        }

        let defines_rows = self.columns.is_empty() && self.row_ids.is_empty();
        if !defines_rows && values.len() != self.row_count() {
            return Err(SchemaError::length_mismatch(name, self.row_count(), values.len()).into());
        }

        let values = values
            .into_iter()
            .map(|v| kind.coerce(&name, v))
            .collect::<Result<Vec<_>, _>>()?;

        if defines_rows {
            for _ in 0..values.len() {
                self.push_row_id();
            }
        }

        self.column_index.insert(name.clone(), self.columns.len());
        self.columns.push(ColumnData {
            name: name.clone(),
            kind,
            values,
        });
        let rows = 0..self.row_count();
        self.cursor.emit(ChangeKind::ColumnAdded, rows, Some(vec![name]));
        Ok(())
    }

    /// Replaces all values of a column.
    ///
    /// Either every value is coerced and written, or nothing changes.
    pub fn set_column(&mut self, column: &str, values: Vec<CellValue>) -> Result<(), DataError> {
        let col = self.column_position(column)?;
        if values.len() != self.row_count() {
            return Err(SchemaError::length_mismatch(column, self.row_count(), values.len()).into());
        }

        let kind = self.columns[col].kind;
        let values = values
            .into_iter()
            .map(|v| kind.coerce(column, v))
            .collect::<Result<Vec<_>, _>>()?;

        self.columns[col].values = values;
        let rows = 0..self.row_count();
        self.cursor
            .emit(ChangeKind::ColumnReplaced, rows, Some(vec![column.to_string()]));
        Ok(())
    }

    /// Removes a column and returns its values.
    pub fn delete_column(&mut self, column: &str) -> Result<Vec<CellValue>, DataError> {
        let col = self.column_position(column)?;
        let removed = self.columns.remove(col);
        self.column_index = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        let rows = 0..self.row_count();
        self.cursor
            .emit(ChangeKind::ColumnDeleted, rows, Some(vec![column.to_string()]));
        Ok(removed.values)
    }

    // -------------------------------------------------------------------------
    // Row mutation
    // -------------------------------------------------------------------------

    fn push_row_id(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;
        self.row_positions.insert(id, self.row_ids.len());
        self.row_ids.push(id);
        id
    }

    /// Appends one row. Columns not mentioned are set to null.
    pub fn add_row<I, S>(&mut self, values: I) -> Result<RowId, DataError>
    where
        I: IntoIterator<Item = (S, CellValue)>,
        S: Into<String>,
    {
        let ids = self.add_rows([values])?;
        Ok(ids[0])
    }

    /// Appends rows and returns their new ids.
    ///
    /// All rows are validated before any is inserted, so a failure leaves the
    /// table untouched. Emits one [`ChangeKind::RowsAdded`] event.
    pub fn add_rows<R, I, S>(&mut self, rows: R) -> Result<Vec<RowId>, DataError>
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = (S, CellValue)>,
        S: Into<String>,
    {
        let mut prepared: Vec<Vec<CellValue>> = Vec::new();
        for row in rows {
            let mut cells = vec![CellValue::Null; self.columns.len()];
            for (name, value) in row {
                let name = name.into();
                let col = self.column_position(&name)?;
                cells[col] = self.columns[col].kind.coerce(&name, value)?;
            }
            prepared.push(cells);
        }

        let start = self.row_count();
        let mut ids = Vec::with_capacity(prepared.len());
        for cells in prepared {
            for (column, value) in self.columns.iter_mut().zip(cells) {
                column.values.push(value);
            }
            ids.push(self.push_row_id());
        }

        let end = self.row_count();
        self.cursor.emit(ChangeKind::RowsAdded, start..end, None);
        Ok(ids)
    }

    /// Removes rows by id and returns how many were removed.
    ///
    /// Unknown ids fail the whole call before anything is removed. Remaining
    /// rows keep their ids. Emits one [`ChangeKind::RowsDeleted`] event.
    pub fn delete_rows(&mut self, rows: &[RowId]) -> Result<usize, DataError> {
        let mut doomed = HashSet::with_capacity(rows.len());
        for row in rows {
            self.row_position(*row)?;
            doomed.insert(*row);
        }
        if doomed.is_empty() {
            return Ok(0);
        }

        let keep: Vec<bool> = self.row_ids.iter().map(|id| !doomed.contains(id)).collect();
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&true));
        }
        self.row_ids.retain(|id| !doomed.contains(id));
        self.row_positions = self
            .row_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let removed = doomed.len();
        self.cursor
            .emit(ChangeKind::RowsDeleted, 0..self.row_count(), None);
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Change notification
    // -------------------------------------------------------------------------

    /// Borrows the table's cursor.
    pub fn cursor(&self) -> &DataCursor {
        &self.cursor
    }

    /// Mutably borrows the table's cursor.
    pub fn cursor_mut(&mut self) -> &mut DataCursor {
        &mut self.cursor
    }

    /// Registers a change listener on this table's cursor.
    pub fn listen(
        &mut self,
        filter: ListenFilter,
        callback: impl FnMut(&ChangeEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.cursor.listen(filter, callback)
    }

    /// Removes a change listener.
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        self.cursor.unlisten(id)
    }

    /// Announces that this table is being replaced, then drops all listeners.
    pub fn retire(&mut self) {
        let rows = 0..self.row_count();
        self.cursor.emit(ChangeKind::TableReplaced, rows, None);
        self.cursor.clear();
    }
}
