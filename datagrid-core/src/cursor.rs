//! Change-notification registry attached to a table.
//!
//! Every [`DataTable`](crate::DataTable) owns exactly one [`DataCursor`].
//! Mutations emit a [`ChangeEvent`] describing the affected rows and columns,
//! and the cursor dispatches it synchronously to every listener whose
//! [`ListenFilter`] overlaps the change, in registration order.
//!
//! Callbacks only ever see the event, never the table, so a listener cannot
//! mutate the table from inside its own callback. Work that needs to write
//! back goes through a [`DeferredQueue`](crate::DeferredQueue).

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use log::trace;

/// Handle returned by [`DataCursor::listen`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// What kind of mutation produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// One or more cells were written.
    CellsUpdated,
    /// A column's values were replaced in bulk.
    ColumnReplaced,
    /// A column was added.
    ColumnAdded,
    /// A column was removed.
    ColumnDeleted,
    /// Rows were appended.
    RowsAdded,
    /// Rows were removed.
    RowsDeleted,
    /// The whole table was replaced by a new one.
    TableReplaced,
}

impl ChangeKind {
    /// Returns `true` if this kind invalidates the whole table.
    pub fn is_whole_table(&self) -> bool {
        matches!(
            self,
            ChangeKind::RowsAdded | ChangeKind::RowsDeleted | ChangeKind::TableReplaced
        )
    }
}

/// Describes one mutation of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Kind of mutation.
    pub kind: ChangeKind,
    /// Affected rows as a half-open range of source positions.
    pub rows: Range<usize>,
    /// Affected columns, or `None` for all columns.
    pub columns: Option<Vec<String>>,
    /// Table revision after the mutation.
    pub revision: u64,
}

impl ChangeEvent {
    /// Returns `true` if this event invalidates the whole table.
    pub fn is_whole_table(&self) -> bool {
        self.kind.is_whole_table()
    }

    /// Returns `true` if the event touches the given column.
    pub fn touches_column(&self, column: &str) -> bool {
        match &self.columns {
            None => true,
            Some(columns) => columns.iter().any(|c| c == column),
        }
    }

    /// Returns `true` if the event touches the given source row position.
    pub fn touches_row(&self, index: usize) -> bool {
        self.is_whole_table() || self.rows.contains(&index)
    }
}

/// Which part of the table a listener is interested in.
///
/// # Example
///
/// ```
/// use datagrid_core::ListenFilter;
///
/// // Everything
/// let all = ListenFilter::all();
///
/// // First ten rows of the "price" column
/// let narrow = ListenFilter::rows(0..10).with_columns(["price"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenFilter {
    rows: Option<Range<usize>>,
    columns: Option<HashSet<String>>,
}

impl ListenFilter {
    /// Listens to every change.
    pub fn all() -> Self {
        Self::default()
    }

    /// Listens to a half-open range of source rows.
    pub fn rows(rows: Range<usize>) -> Self {
        Self {
            rows: Some(rows),
            columns: None,
        }
    }

    /// Listens to a set of columns.
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().with_columns(columns)
    }

    /// Restricts the filter to a half-open range of source rows.
    pub fn with_rows(mut self, rows: Range<usize>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Restricts the filter to a set of columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` if the event should be delivered to this filter.
    ///
    /// Whole-table events reach every listener.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if event.is_whole_table() {
            return true;
        }

        let rows_match = match &self.rows {
            None => true,
            Some(range) => range.start < event.rows.end && event.rows.start < range.end,
        };

        let columns_match = match (&self.columns, &event.columns) {
            (None, _) | (_, None) => true,
            (Some(wanted), Some(changed)) => changed.iter().any(|c| wanted.contains(c)),
        };

        rows_match && columns_match
    }
}

/// Listener callback type.
pub type ListenerFn = Box<dyn FnMut(&ChangeEvent) + Send + Sync>;

struct Listener {
    id: ListenerId,
    filter: ListenFilter,
    callback: ListenerFn,
}

/// Change-notification registry for one table.
#[derive(Default)]
pub struct DataCursor {
    listeners: Vec<Listener>,
    next_id: u64,
    revision: u64,
}

impl fmt::Debug for DataCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCursor")
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl DataCursor {
    /// Creates an empty cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its handle.
    pub fn listen(
        &mut self,
        filter: ListenFilter,
        callback: impl FnMut(&ChangeEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            filter,
            callback: Box::new(callback),
        });
        trace!("Registered {}", id);
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    /// Removes every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Returns the number of events emitted so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Emits an event to every matching listener, in registration order.
    ///
    /// Only listeners registered before the call are considered.
    pub fn emit(
        &mut self,
        kind: ChangeKind,
        rows: Range<usize>,
        columns: Option<Vec<String>>,
    ) -> ChangeEvent {
        self.revision += 1;
        let event = ChangeEvent {
            kind,
            rows,
            columns,
            revision: self.revision,
        };

        let registered = self.listeners.len();
        let mut delivered = 0;
        for listener in self.listeners.iter_mut().take(registered) {
            if listener.filter.matches(&event) {
                (listener.callback)(&event);
                delivered += 1;
            }
        }

        trace!(
            "Emitted {:?} rows {:?} (revision {}) to {} listener(s)",
            event.kind, event.rows, event.revision, delivered
        );
        event
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> ListenerFn) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = Arc::clone(&log);
        let make = move |name: &str| -> ListenerFn {
            let log = Arc::clone(&log_clone);
            let name = name.to_string();
            Box::new(move |_event: &ChangeEvent| {
                log.lock().unwrap().push(name.clone());
            })
        };
        (log, make)
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let (log, make) = recorder();
        let mut cursor = DataCursor::new();
        cursor.listen(ListenFilter::all(), make("first"));
        cursor.listen(ListenFilter::all(), make("second"));
        cursor.listen(ListenFilter::all(), make("third"));

        cursor.emit(ChangeKind::CellsUpdated, 0..1, Some(vec!["a".into()]));

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_filters_by_row_and_column() {
        let (log, make) = recorder();
        let mut cursor = DataCursor::new();
        cursor.listen(ListenFilter::rows(0..5), make("top"));
        cursor.listen(ListenFilter::rows(5..10), make("bottom"));
        cursor.listen(ListenFilter::columns(["price"]), make("price"));

        cursor.emit(ChangeKind::CellsUpdated, 6..7, Some(vec!["name".into()]));
        assert_eq!(*log.lock().unwrap(), vec!["bottom"]);

        log.lock().unwrap().clear();
        cursor.emit(ChangeKind::CellsUpdated, 2..3, Some(vec!["price".into()]));
        assert_eq!(*log.lock().unwrap(), vec!["top", "price"]);
    }

    #[test]
    fn test_whole_table_reaches_everyone() {
        let (log, make) = recorder();
        let mut cursor = DataCursor::new();
        cursor.listen(ListenFilter::rows(100..200).with_columns(["x"]), make("narrow"));

        cursor.emit(ChangeKind::RowsDeleted, 0..0, None);
        assert_eq!(*log.lock().unwrap(), vec!["narrow"]);
    }

    #[test]
    fn test_unlisten() {
        let (log, make) = recorder();
        let mut cursor = DataCursor::new();
        let id = cursor.listen(ListenFilter::all(), make("gone"));
        assert!(cursor.unlisten(id));
        assert!(!cursor.unlisten(id));

        cursor.emit(ChangeKind::CellsUpdated, 0..1, None);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(cursor.revision(), 1);
    }
}
