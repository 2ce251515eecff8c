//! Notifications for the host application.

use datagrid_core::modifier::Direction;
use datagrid_core::{CellValue, RowId};

use crate::error::ValidationError;

/// Something the grid did in response to an interaction or a load.
///
/// Events queue up inside the grid until the host drains them with
/// [`Grid::drain_events`](crate::Grid::drain_events).
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// An edit was committed to the table.
    CellEdited {
        row: RowId,
        column: String,
        old: CellValue,
        new: CellValue,
    },
    /// An edit was abandoned; the table is unchanged.
    EditCancelled { row: RowId, column: String },
    /// A commit was rejected and the editor stays open.
    ValidationFailed(ValidationError),
    /// Sort state changed. `None` means unsorted.
    SortChanged {
        column: String,
        direction: Option<Direction>,
    },
    /// The filter changed; `rows` is the new view size.
    FilterChanged { rows: usize },
    PageChanged { page: usize, page_size: usize },
    /// A resize drag finished.
    ColumnResized { column: String, widths: Vec<u32> },
    /// A resize drag was abandoned and the widths restored.
    ResizeCancelled { column: String },
    DataLoaded { rows: usize, columns: usize },
    /// A load failed and the previous table was kept.
    LoadFailed { message: String },
}
