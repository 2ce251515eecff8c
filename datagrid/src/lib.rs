//! Headless data grid.
//!
//! A [`Grid`] shows a [`DataTable`](datagrid_core::DataTable) as sortable,
//! filterable, paginated rows with pluggable cell renderers, inline editing
//! with validation and column resizing. It produces an [`Element`] tree for
//! the host to draw and only renders the rows inside the viewport, recycling
//! row elements as the user scrolls.

pub mod column;
pub mod element;
pub mod error;
pub mod grid;
pub mod options;
pub mod pagination;
pub mod renderer;
pub mod resizing;
pub mod table;
pub mod text;
pub mod validation;

pub use column::Column;
pub use element::{Element, ElementKind};
pub use error::*;
pub use grid::*;
pub use options::GridOptions;
pub use renderer::{CellRenderer, CellRendererRegistry, RendererTag};
pub use resizing::ResizingMode;
pub use table::RenderStats;
pub use text::render_text;
