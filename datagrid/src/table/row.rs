//! Rendered rows and the element recycling pool.

use std::fmt;

use datagrid_core::{CellValue, DataTable, RowId};

use crate::column::Column;
use crate::element::Element;
use crate::renderer::{CellContent, CellRendererRegistry};

/// Identifier of a host row element. Recycled between rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__row_{}", self.0)
    }
}

/// Free list of row elements.
#[derive(Debug, Clone, Default)]
pub struct ElementPool {
    free: Vec<ElementId>,
    allocated: usize,
}

impl ElementPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an element, reusing a released one when possible.
    ///
    /// The flag is `true` when the element came from the free list.
    pub fn acquire(&mut self) -> (ElementId, bool) {
        match self.free.pop() {
            Some(id) => (id, true),
            None => {
                let id = ElementId(self.allocated);
                self.allocated += 1;
                (id, false)
            }
        }
    }

    /// Returns an element to the free list.
    pub fn release(&mut self, id: ElementId) {
        self.free.push(id);
    }

    /// Elements ever allocated.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Elements waiting to be reused.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// A row currently in the rendered window.
#[derive(Debug)]
pub struct RenderedRow {
    pub(crate) element: ElementId,
    pub(crate) row: RowId,
    pub(crate) cells: Vec<CellContent>,
}

impl RenderedRow {
    /// Builds one cell per column.
    pub(crate) fn build(
        element: ElementId,
        row: RowId,
        table: &DataTable,
        columns: &[Column],
        registry: &CellRendererRegistry,
    ) -> Self {
        let cells = columns
            .iter()
            .map(|column| {
                let renderer = registry.create(column.renderer(), &column.renderer_context());
                let value = table.get_cell(row, column.field()).unwrap_or(CellValue::Null);
                CellContent::new(renderer, value)
            })
            .collect();
        Self {
            element,
            row,
            cells,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn row(&self) -> RowId {
        self.row
    }

    pub fn cells(&self) -> &[CellContent] {
        &self.cells
    }

    /// Releases every cell's renderer.
    pub(crate) fn release(self) -> ElementId {
        for cell in self.cells {
            cell.release();
        }
        self.element
    }

    pub(crate) fn view(&self, columns: &[Column]) -> Element {
        let cells = self.cells.iter().zip(columns).map(|(cell, column)| {
            Element::cell()
                .data("field", column.field())
                .data("width", column.width())
                .focused(cell.is_editing())
                .child(cell.view())
        });
        Element::row()
            .id(self.element.to_string())
            .data("row", self.row.get())
            .children(cells)
    }
}
