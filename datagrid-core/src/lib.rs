//! Data layer for the data grid.
//!
//! Holds the in-memory [`DataTable`], its change-notification [`DataCursor`],
//! the [`modifier`] family that derives read-only [`TableView`]s, and the
//! connector contracts used to acquire tables from external sources.

pub mod connector;
pub mod cursor;
pub mod deferred;
pub mod error;
pub mod modifier;
pub mod table;
pub mod value;
pub mod view;

pub use cursor::{ChangeEvent, ChangeKind, DataCursor, ListenFilter, ListenerId};
pub use deferred::DeferredQueue;
pub use error::*;
pub use table::{DataTable, Row, RowId, TableId};
pub use value::{CellValue, ColumnType};
pub use view::{RowRef, TableView};
