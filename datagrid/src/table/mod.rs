//! The virtualized rendering surface.
//!
//! The surface holds the rows of the current page that intersect the
//! viewport (plus an overscan margin) and reconciles them against the next
//! window on every render pass: rows that stay are kept as they are, rows
//! that leave release their renderers and hand their element back to the
//! pool, and rows that enter are built from pooled elements where possible.
//!
//! Small pages (at most `virtualizationThreshold` rows) are rendered in full.

mod header;
mod row;
mod virtualization;

pub use header::{header_cell, header_label, header_view, sort_indicator};
pub use row::{ElementId, ElementPool, RenderedRow};
pub use virtualization::{
    DuplicateRow, ReconcilePlan, RenderStats, compute_visible_window, overscan, reconcile,
};

use std::collections::{HashMap, HashSet};
use std::mem;
use std::ops::Range;

use datagrid_core::{CellValue, ChangeEvent, DataTable, RowId};
use log::{debug, warn};

use crate::column::Column;
use crate::element::{Element, ElementKind};
use crate::options::RenderingOptions;
use crate::renderer::{CellContent, CellRendererRegistry, RendererTag};

/// Rendered rows of the current page.
#[derive(Debug)]
pub struct Table {
    rendering: RenderingOptions,
    scroll_top: u64,
    window: Range<usize>,
    page_len: usize,
    rows: Vec<RenderedRow>,
    pool: ElementPool,
    stats: RenderStats,
    pending_updates: usize,
    stale: bool,
}

impl Table {
    /// Creates an empty surface; nothing is rendered until the first render.
    pub fn new(rendering: RenderingOptions) -> Self {
        Self {
            rendering,
            scroll_top: 0,
            window: 0..0,
            page_len: 0,
            rows: Vec::new(),
            pool: ElementPool::new(),
            stats: RenderStats::default(),
            pending_updates: 0,
            stale: false,
        }
    }

    /// Row height, viewport and buffer settings.
    pub fn rendering(&self) -> &RenderingOptions {
        &self.rendering
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Scroll offset in pixels from the top of the page.
    pub fn scroll_top(&self) -> u64 {
        self.scroll_top
    }

    /// Scrolls the body. The offset is clamped on the next render.
    pub fn set_scroll_top(&mut self, scroll_top: u64) {
        self.scroll_top = scroll_top;
    }

    /// Full height of the current page in pixels.
    pub fn content_height(&self) -> u64 {
        self.page_len as u64 * u64::from(self.rendering.row_height)
    }

    fn max_scroll_top(&self, page_len: usize) -> u64 {
        let content = page_len as u64 * u64::from(self.rendering.row_height);
        content.saturating_sub(u64::from(self.rendering.viewport_height))
    }

    /// Returns `true` if a page of this size renders only its visible rows.
    pub fn is_virtualized(&self, page_len: usize) -> bool {
        self.rendering.virtualization && page_len > self.rendering.virtualization_threshold
    }

    fn window_for(&self, page_len: usize) -> Range<usize> {
        if !self.is_virtualized(page_len) {
            return 0..page_len;
        }
        let visible = compute_visible_window(
            self.scroll_top,
            self.rendering.viewport_height,
            self.rendering.row_height,
            page_len,
        );
        overscan(visible, self.rendering.buffer_size, page_len)
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Reconciles the rendered rows with the window over `page`.
    pub fn render(
        &mut self,
        table: &DataTable,
        page: &[RowId],
        columns: &[Column],
        registry: &CellRendererRegistry,
    ) -> RenderStats {
        self.scroll_top = self.scroll_top.min(self.max_scroll_top(page.len()));
        self.page_len = page.len();
        let window = self.window_for(page.len());
        let next = &page[window.clone()];

        let mut stats = RenderStats {
            updated: mem::take(&mut self.pending_updates),
            ..Default::default()
        };

        let previous: Vec<RowId> = self.rows.iter().map(|r| r.row()).collect();
        let stale = mem::take(&mut self.stale);
        let (order, release): (Vec<RowId>, HashSet<RowId>) = match reconcile(&previous, next) {
            Ok(plan) if !stale => (next.to_vec(), plan.release.into_iter().collect()),
            Ok(_) => (next.to_vec(), previous.iter().copied().collect()),
            Err(DuplicateRow(id)) => {
                warn!("Row {} appears twice in the window, rendering from scratch", id);
                stats.fallback = true;
                let mut seen = HashSet::new();
                let unique = next.iter().copied().filter(|id| seen.insert(*id)).collect();
                (unique, previous.iter().copied().collect())
            }
        };

        // Release before creating so freed elements are reused in this pass
        let mut kept: HashMap<RowId, RenderedRow> = HashMap::new();
        for row in self.rows.drain(..) {
            if release.contains(&row.row()) {
                self.pool.release(row.release());
                stats.released += 1;
            } else {
                kept.insert(row.row(), row);
            }
        }

        for id in order {
            match kept.remove(&id) {
                Some(row) => {
                    stats.reused += 1;
                    self.rows.push(row);
                }
                None => {
                    let (element, recycled) = self.pool.acquire();
                    if recycled {
                        stats.recycled += 1;
                        stats.reused += 1;
                    } else {
                        stats.allocated += 1;
                    }
                    stats.created += 1;
                    self.rows
                        .push(RenderedRow::build(element, id, table, columns, registry));
                }
            }
        }

        debug!(
            "Rendered rows {:?} of {}: {} created, {} released, {} reused",
            window, self.page_len, stats.created, stats.released, stats.reused
        );
        self.window = window;
        self.stats = stats;
        stats
    }

    /// Drops every rendered row so the next pass rebuilds the window.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Re-reads the rendered cells touched by a change event.
    ///
    /// Whole-table events invalidate the surface instead. Returns the
    /// number of cells whose value changed.
    pub fn refresh_cells(
        &mut self,
        table: &DataTable,
        event: &ChangeEvent,
        columns: &[Column],
    ) -> usize {
        if event.is_whole_table() {
            self.invalidate();
            return 0;
        }

        let mut updated = 0;
        for row in &mut self.rows {
            let Some(index) = table.row_index(row.row) else {
                continue;
            };
            if !event.touches_row(index) {
                continue;
            }
            for (cell, column) in row.cells.iter_mut().zip(columns) {
                if !event.touches_column(column.field()) {
                    continue;
                }
                let value = table
                    .get_cell(row.row, column.field())
                    .unwrap_or(CellValue::Null);
                if cell.update_value(value) {
                    updated += 1;
                }
            }
        }
        self.pending_updates += updated;
        updated
    }

    /// Rebuilds the renderers of every rendered cell using `tag`.
    pub fn rebuild_renderers(
        &mut self,
        tag: &RendererTag,
        columns: &[Column],
        registry: &CellRendererRegistry,
    ) -> usize {
        let mut rebuilt = 0;
        for row in &mut self.rows {
            for (cell, column) in row.cells.iter_mut().zip(columns) {
                if column.renderer() == tag {
                    cell.replace_renderer(
                        registry.create(column.renderer(), &column.renderer_context()),
                    );
                    rebuilt += 1;
                }
            }
        }
        if rebuilt > 0 {
            debug!("Rebuilt {} '{}' cell(s)", rebuilt, tag);
        }
        rebuilt
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Statistics of the last render pass.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Rendered page positions.
    pub fn window(&self) -> Range<usize> {
        self.window.clone()
    }

    /// Rendered rows in display order.
    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    /// Pool that recycles row elements between renders.
    pub fn pool(&self) -> &ElementPool {
        &self.pool
    }

    /// Whether `row` is inside the rendered window.
    pub fn is_rendered(&self, row: RowId) -> bool {
        self.rows.iter().any(|r| r.row == row)
    }

    /// Cell content of a rendered row, `None` if the row is not rendered.
    pub fn cell(&self, row: RowId, column: usize) -> Option<&CellContent> {
        self.rows
            .iter()
            .find(|r| r.row == row)
            .and_then(|r| r.cells.get(column))
    }

    /// Mutable access to a rendered cell.
    pub fn cell_mut(&mut self, row: RowId, column: usize) -> Option<&mut CellContent> {
        self.rows
            .iter_mut()
            .find(|r| r.row == row)
            .and_then(|r| r.cells.get_mut(column))
    }

    /// Draws the body: rendered rows plus the offsets a host needs to
    /// position them inside the scrollable page.
    pub fn view(&self, columns: &[Column]) -> Element {
        let row_height = u64::from(self.rendering.row_height);
        Element::new(ElementKind::Body)
            .data("offsetTop", self.window.start as u64 * row_height)
            .data("totalHeight", self.content_height())
            .data("scrollTop", self.scroll_top)
            .children(self.rows.iter().map(|row| row.view(columns)))
    }
}
