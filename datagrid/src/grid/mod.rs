//! The grid orchestrator.
//!
//! A [`Grid`] owns the data table and everything derived from it: the
//! columns, the modified view, the page, and the rendered surface. All state
//! changes happen through `&mut self` calls on one thread; table change
//! events are queued by a cursor listener and applied on the next
//! [`tick`](Grid::tick), after every listener for that change has run.
//!
//! # Example
//!
//! ```
//! use datagrid::Grid;
//! use datagrid::options::GridOptions;
//! use datagrid_core::modifier::{Condition, Direction};
//! use datagrid_core::{CellValue, DataTable};
//!
//! let table = DataTable::from_columns([
//!     ("name", vec![CellValue::from("B"), CellValue::from("A"), CellValue::from("C")]),
//! ])
//! .unwrap();
//!
//! let mut grid = Grid::new(table, GridOptions::new()).unwrap();
//! grid.toggle_sort("name").unwrap();
//! grid.set_filter(Some(Condition::ne("name", "C"))).unwrap();
//!
//! let names: Vec<String> = grid.snapshot().rows.iter().map(|r| r[0].clone()).collect();
//! assert_eq!(names, vec!["A", "B"]);
//! assert_eq!(grid.column("name").unwrap().sort(), Some(Direction::Asc));
//! ```

mod editing;
mod events;
mod resizing;

pub use editing::EditOutcome;
pub use events::GridEvent;

use std::collections::{HashMap, VecDeque};
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use datagrid_core::connector::DataConnector;
use datagrid_core::modifier::{
    ChainModifier, Condition, DataModifier, Direction, FilterModifier, SortModifier,
};
use datagrid_core::{
    CellValue, ChangeEvent, ChangeKind, DataTable, DeferredQueue, ListenFilter, ListenerId,
    LoadError, RowId, TableView,
};
use log::{debug, info, warn};

use crate::column::{Column, build_columns, next_sort};
use crate::element::{Element, ElementKind};
use crate::error::GridError;
use crate::options::GridOptions;
use crate::pagination::Pagination;
use crate::renderer::{CellRenderer, CellRendererRegistry, RendererContext, RendererTag};
use crate::resizing::ResizeSession;
use crate::table::{RenderStats, Table, header_label, header_view};

/// Header and visible rows of a grid, as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridSnapshot {
    /// Header labels, including sort indicators.
    pub headers: Vec<String>,
    /// Column widths in pixels.
    pub widths: Vec<u32>,
    /// Rendered rows, one string per column.
    pub rows: Vec<Vec<String>>,
    /// Pagination footer, when pagination is enabled.
    pub footer: Option<String>,
    /// Notification banner, if one is showing.
    pub notification: Option<String>,
}

/// An interactive data grid over one [`DataTable`].
pub struct Grid {
    options: GridOptions,
    table: DataTable,
    listener: ListenerId,
    changes: Arc<Mutex<Vec<ChangeEvent>>>,
    dirty: Arc<AtomicBool>,
    columns: Vec<Column>,
    registry: CellRendererRegistry,
    filter: Option<Condition>,
    modifiers: ChainModifier,
    view: TableView,
    pagination: Pagination,
    surface: Table,
    editing: Option<(RowId, usize)>,
    resize: Option<ResizeSession>,
    deferred: DeferredQueue,
    events: VecDeque<GridEvent>,
    notification: Option<String>,
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("table", &self.table)
            .field("columns", &self.columns.len())
            .field("view", &self.view.len())
            .field("pagination", &self.pagination)
            .field("editing", &self.editing)
            .finish()
    }
}

impl Grid {
    /// Creates a grid with the built-in renderers.
    pub fn new(table: DataTable, options: GridOptions) -> Result<Self, GridError> {
        Self::with_registry(table, options, CellRendererRegistry::with_builtins())
    }

    /// Creates a grid with a prepared renderer registry.
    pub fn with_registry(
        mut table: DataTable,
        options: GridOptions,
        registry: CellRendererRegistry,
    ) -> Result<Self, GridError> {
        let columns = build_columns(&table, &options)?;
        let changes = Arc::new(Mutex::new(Vec::new()));
        let dirty = Arc::new(AtomicBool::new(false));
        let listener = Self::attach(&mut table, &changes, &dirty);

        let mut grid = Self {
            pagination: Pagination::new(&options.pagination),
            surface: Table::new(options.rendering.clone()),
            options,
            view: TableView::full(&table),
            table,
            listener,
            changes,
            dirty,
            columns,
            registry,
            filter: None,
            modifiers: ChainModifier::new(),
            editing: None,
            resize: None,
            deferred: DeferredQueue::new(),
            events: VecDeque::new(),
            notification: None,
        };
        grid.recompute_view()?;
        grid.render();
        Ok(grid)
    }

    /// Registers the grid's own listener, which only records events.
    fn attach(
        table: &mut DataTable,
        changes: &Arc<Mutex<Vec<ChangeEvent>>>,
        dirty: &Arc<AtomicBool>,
    ) -> ListenerId {
        let changes = Arc::clone(changes);
        let dirty = Arc::clone(dirty);
        table.listen(ListenFilter::all(), move |event| {
            if let Ok(mut guard) = changes.lock() {
                guard.push(event.clone());
            }
            dirty.store(true, Ordering::SeqCst);
        })
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// The source table.
    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field() == field)
    }

    pub(crate) fn column_index(&self, field: &str) -> Result<usize, GridError> {
        self.columns
            .iter()
            .position(|c| c.field() == field)
            .ok_or_else(|| datagrid_core::SchemaError::unknown_column(field).into())
    }

    /// Field of the column at `index`, empty if there is none.
    pub(crate) fn field_name(&self, index: usize) -> String {
        self.columns
            .get(index)
            .map(|c| c.field().to_string())
            .unwrap_or_default()
    }

    /// The filtered, sorted and modified view, before pagination.
    pub fn view(&self) -> &TableView {
        &self.view
    }

    /// Rows of the current page, in display order.
    pub fn page_rows(&self) -> &[RowId] {
        self.view.slice(self.pagination.range())
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// The rendered surface.
    pub fn surface(&self) -> &Table {
        &self.surface
    }

    pub fn registry(&self) -> &CellRendererRegistry {
        &self.registry
    }

    /// Statistics of the last render pass.
    pub fn stats(&self) -> RenderStats {
        self.surface.stats()
    }

    pub fn filter(&self) -> Option<&Condition> {
        self.filter.as_ref()
    }

    /// Current sort column and direction.
    pub fn sort(&self) -> Option<(&str, Direction)> {
        self.columns
            .iter()
            .find_map(|c| c.sort().map(|d| (c.field(), d)))
    }

    /// Returns `true` if table changes are waiting for [`tick`](Self::tick).
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst) || !self.deferred.is_empty()
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Writes a cell directly.
    ///
    /// Listeners are notified immediately; the surface catches up on the
    /// next [`tick`](Self::tick).
    pub fn set_cell(&mut self, row: RowId, column: &str, value: CellValue) -> Result<(), GridError> {
        self.table.set_cell(row, column, value)?;
        Ok(())
    }

    /// Reads a cell.
    pub fn get_cell(&self, row: RowId, column: &str) -> Result<CellValue, GridError> {
        Ok(self.table.get_cell(row, column)?)
    }

    /// Registers a change listener on the table.
    ///
    /// Listeners must not mutate the table; they push mutations onto
    /// [`deferred`](Self::deferred) instead.
    pub fn listen(
        &mut self,
        filter: ListenFilter,
        callback: impl FnMut(&ChangeEvent) + Send + Sync + 'static,
    ) -> ListenerId {
        self.table.listen(filter, callback)
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        self.table.unlisten(id)
    }

    /// Queue for mutations requested from listener callbacks.
    pub fn deferred(&self) -> DeferredQueue {
        self.deferred.clone()
    }

    /// Applies pending work: deferred mutations first, then the change
    /// events they and earlier writes produced, then a render pass.
    pub fn tick(&mut self) -> Result<RenderStats, GridError> {
        for error in self.deferred.drain_into(&mut self.table) {
            warn!("Deferred mutation failed: {}", error);
        }

        let changes = match self.changes.lock() {
            Ok(mut guard) => mem::take(&mut *guard),
            Err(_) => Vec::new(),
        };
        self.dirty.store(false, Ordering::SeqCst);

        if !changes.is_empty() {
            debug!("Applying {} change event(s)", changes.len());
            let mut columns_changed = false;
            for event in &changes {
                match event.kind {
                    ChangeKind::ColumnAdded | ChangeKind::ColumnDeleted => columns_changed = true,
                    _ => {
                        self.surface
                            .refresh_cells(&self.table, event, &self.columns);
                    }
                }
            }
            if columns_changed {
                self.rebuild_columns()?;
            }
            self.recompute_view()?;
        }

        Ok(self.render())
    }

    /// Re-derives the columns after the table's column set changed.
    ///
    /// Configured columns whose field disappeared are dropped; widths and
    /// sort state of the others are kept.
    fn rebuild_columns(&mut self) -> Result<(), GridError> {
        // Open edits and drags refer to columns by position
        if let Some((row, index)) = self.editing.take() {
            let column = self.field_name(index);
            if let Some(cell) = self.surface.cell_mut(row, index) {
                cell.cancel();
            }
            debug!("Column set changed, cancelling edit of {} '{}'", row, column);
            self.events.push_back(GridEvent::EditCancelled { row, column });
        }
        let resize = self.resize.take().map(|session| {
            let column = self.field_name(session.column());
            let widths: HashMap<String, u32> = self
                .columns
                .iter()
                .map(|c| c.field().to_string())
                .zip(session.cancel())
                .collect();
            (column, widths)
        });

        if self.options.columns.is_empty() {
            let previous: HashMap<String, Column> = self
                .columns
                .drain(..)
                .map(|c| (c.field().to_string(), c))
                .collect();
            self.columns = build_columns(&self.table, &self.options)?
                .into_iter()
                .map(|fresh| previous.get(fresh.field()).cloned().unwrap_or(fresh))
                .collect();
        } else {
            let table = &self.table;
            self.columns.retain(|c| table.has_column(c.field()));
        }

        if let Some((column, widths)) = resize {
            for c in &mut self.columns {
                if let Some(width) = widths.get(c.field()) {
                    c.apply_width(*width);
                }
            }
            debug!("Column set changed, cancelling resize of '{}'", column);
            self.events.push_back(GridEvent::ResizeCancelled { column });
        }
        self.surface.invalidate();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // View derivation
    // -------------------------------------------------------------------------

    /// Derives the view: filter, then sort, then extra modifiers.
    fn derive_view(&self, filter: Option<&Condition>) -> Result<TableView, GridError> {
        let mut view = TableView::full(&self.table);
        if let Some(condition) = filter {
            view = FilterModifier::new(condition.clone()).apply_to(&self.table, view)?;
        }
        if let Some((field, direction)) = self.sort() {
            view = SortModifier::new([(field, direction)]).apply_to(&self.table, view)?;
        }
        Ok(self.modifiers.apply_to(&self.table, view)?)
    }

    fn recompute_view(&mut self) -> Result<(), GridError> {
        self.view = self.derive_view(self.filter.as_ref())?;
        if self.pagination.set_total(self.view.len()) {
            self.surface.set_scroll_top(0);
        }
        debug!(
            "View: {} of {} rows, page {}/{}",
            self.view.len(),
            self.table.row_count(),
            self.pagination.page() + 1,
            self.pagination.page_count()
        );
        Ok(())
    }

    /// Renders the current page.
    fn render(&mut self) -> RenderStats {
        let page = self.view.slice(self.pagination.range());
        let stats = self
            .surface
            .render(&self.table, page, &self.columns, &self.registry);

        // An editor whose cell left the window or was rebuilt is gone
        if let Some((row, index)) = self.editing
            && !self
                .surface
                .cell(row, index)
                .is_some_and(|cell| cell.is_editing())
        {
            self.editing = None;
            if let Some(column) = self.columns.get(index) {
                debug!("Edit of {} '{}' lost its cell", row, column.field());
                self.events.push_back(GridEvent::EditCancelled {
                    row,
                    column: column.field().to_string(),
                });
            }
        }
        stats
    }

    /// Back to the first page and the top of the body.
    fn reset_position(&mut self) {
        self.pagination.first_page();
        self.surface.set_scroll_top(0);
    }

    // -------------------------------------------------------------------------
    // Sorting and filtering
    // -------------------------------------------------------------------------

    /// Advances a column's sort: none, ascending, descending, none.
    pub fn toggle_sort(&mut self, field: &str) -> Result<Option<Direction>, GridError> {
        let index = self.column_index(field)?;
        let next = next_sort(self.columns[index].sort());
        self.sort_by(field, next)?;
        Ok(next)
    }

    /// Sorts by one column, or clears the sort with `None`.
    pub fn sort_by(&mut self, field: &str, direction: Option<Direction>) -> Result<(), GridError> {
        let index = self.column_index(field)?;
        if !self.columns[index].is_sortable() {
            return Err(GridError::not_sortable(field));
        }

        for column in &mut self.columns {
            column.set_sort(None);
        }
        self.columns[index].set_sort(direction);
        self.reset_position();
        self.recompute_view()?;
        self.render();

        debug!("Sort: {} {:?}", field, direction);
        self.events.push_back(GridEvent::SortChanged {
            column: field.to_string(),
            direction,
        });
        Ok(())
    }

    /// Replaces the filter. `None` shows every row.
    ///
    /// A condition naming an unknown column is rejected and the previous
    /// filter stays in place.
    pub fn set_filter(&mut self, condition: Option<Condition>) -> Result<(), GridError> {
        let view = self.derive_view(condition.as_ref())?;
        self.filter = condition;
        self.view = view;
        self.reset_position();
        self.pagination.set_total(self.view.len());
        self.render();

        debug!("Filter: {} rows", self.view.len());
        self.events.push_back(GridEvent::FilterChanged {
            rows: self.view.len(),
        });
        Ok(())
    }

    /// Appends a modifier applied after the filter and sort.
    pub fn add_modifier(&mut self, modifier: impl DataModifier + 'static) -> Result<(), GridError> {
        let previous = self.modifiers.clone();
        self.modifiers.push(Arc::new(modifier));
        if let Err(e) = self.recompute_view() {
            self.modifiers = previous;
            return Err(e);
        }
        self.render();
        Ok(())
    }

    /// Removes every extra modifier.
    pub fn clear_modifiers(&mut self) -> Result<(), GridError> {
        self.modifiers = ChainModifier::new();
        self.recompute_view()?;
        self.render();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Pagination and scrolling
    // -------------------------------------------------------------------------

    fn page_changed(&mut self, changed: bool) -> bool {
        if changed {
            self.surface.set_scroll_top(0);
            self.render();
            self.events.push_back(GridEvent::PageChanged {
                page: self.pagination.page(),
                page_size: self.pagination.page_size(),
            });
        }
        changed
    }

    pub fn next_page(&mut self) -> bool {
        let changed = self.pagination.next_page();
        self.page_changed(changed)
    }

    pub fn prev_page(&mut self) -> bool {
        let changed = self.pagination.prev_page();
        self.page_changed(changed)
    }

    pub fn first_page(&mut self) -> bool {
        let changed = self.pagination.first_page();
        self.page_changed(changed)
    }

    pub fn last_page(&mut self) -> bool {
        let changed = self.pagination.last_page();
        self.page_changed(changed)
    }

    /// Moves to a zero-based page, clamped to the last page.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let changed = self.pagination.go_to(page);
        self.page_changed(changed)
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let changed = self.pagination.set_page_size(page_size);
        self.page_changed(changed)
    }

    /// Picks one of the configured page sizes.
    pub fn select_page_size_option(&mut self, index: usize) -> bool {
        let changed = self.pagination.select_page_size_option(index);
        self.page_changed(changed)
    }

    /// Scrolls the body and renders the new window.
    pub fn scroll_to(&mut self, scroll_top: u64) -> RenderStats {
        self.surface.set_scroll_top(scroll_top);
        self.render()
    }

    // -------------------------------------------------------------------------
    // Renderers
    // -------------------------------------------------------------------------

    /// Registers a cell renderer factory.
    ///
    /// With `overwrite`, a taken tag is reassigned and every rendered cell
    /// using it is rebuilt with the new factory.
    pub fn register_renderer<F>(
        &mut self,
        tag: impl Into<RendererTag>,
        factory: F,
        overwrite: bool,
    ) -> Result<(), GridError>
    where
        F: Fn(&RendererContext) -> Box<dyn CellRenderer> + Send + Sync + 'static,
    {
        let tag = tag.into();
        self.registry.register(tag.clone(), factory, overwrite)?;
        if let Some((row, index)) = self.editing
            && self.columns.get(index).is_some_and(|c| c.renderer() == &tag)
        {
            self.editing = None;
            let column = self.field_name(index);
            self.events.push_back(GridEvent::EditCancelled { row, column });
        }
        self.surface
            .rebuild_renderers(&tag, &self.columns, &self.registry);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Replaces the table with one loaded from `connector`.
    ///
    /// On success the old table announces its replacement to its listeners
    /// and is dropped; the new table starts with only the grid's listener.
    /// On failure the current table is kept, a notification is shown and
    /// the error is returned.
    pub async fn load(&mut self, connector: &dyn DataConnector) -> Result<(), LoadError> {
        let result = match connector.load().await {
            Ok(table) => build_columns(&table, &self.options)
                .map(|columns| (table, columns))
                .map_err(|e| match e {
                    GridError::Schema(e) => LoadError::Schema(e),
                    other => LoadError::parse(other.to_string()),
                }),
            Err(e) => Err(e),
        };

        let (mut table, columns) = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Load failed, keeping current table: {}", e);
                let message = format!("Could not load data: {}", e);
                self.notification = Some(message.clone());
                self.events.push_back(GridEvent::LoadFailed { message });
                return Err(e);
            }
        };

        self.editing = None;
        self.resize = None;
        self.table.retire();
        self.listener = Self::attach(&mut table, &self.changes, &self.dirty);
        self.table = table;
        self.columns = columns;
        if let Ok(mut guard) = self.changes.lock() {
            guard.clear();
        }
        self.dirty.store(false, Ordering::SeqCst);

        if let Some(condition) = &self.filter
            && condition.columns().iter().any(|c| !self.table.has_column(c))
        {
            warn!("Dropping filter on columns missing from the new table");
            self.filter = None;
        }
        if let Err(e) = self.recompute_view() {
            warn!("Dropping extra modifiers: {}", e);
            self.modifiers = ChainModifier::new();
            self.view = TableView::full(&self.table);
            self.pagination.set_total(self.view.len());
        }

        self.reset_position();
        self.surface.invalidate();
        self.render();
        self.notification = None;

        info!(
            "Loaded {} rows x {} columns",
            self.table.row_count(),
            self.table.column_count()
        );
        self.events.push_back(GridEvent::DataLoaded {
            rows: self.table.row_count(),
            columns: self.table.column_count(),
        });
        Ok(())
    }

    /// Message of the notification banner, if one is showing.
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Takes every queued host event, oldest first.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        self.events.drain(..).collect()
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// Draws the whole grid.
    pub fn element(&self) -> Element {
        let mut root = Element::new(ElementKind::Grid)
            .id("grid")
            .child(header_view(&self.columns))
            .child(self.surface.view(&self.columns));
        if self.pagination.is_enabled() {
            root = root.child(self.pagination.view());
        }
        if let Some(message) = &self.notification {
            root = root.child(Element::new(ElementKind::Notification).content(message.as_str()));
        }
        root
    }

    /// Captures the header and rendered rows as text.
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            headers: self.columns.iter().map(header_label).collect(),
            widths: self.columns.iter().map(|c| c.width()).collect(),
            rows: self
                .surface
                .rows()
                .iter()
                .map(|row| {
                    row.cells()
                        .iter()
                        .map(|cell| cell.view().text_content())
                        .collect()
                })
                .collect(),
            footer: self
                .pagination
                .is_enabled()
                .then(|| self.pagination.view().text_content()),
            notification: self.notification.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use datagrid_core::connector::TableConnector;

    use super::*;
    use crate::options::{ColumnOptions, RenderingOptions};

    fn table(n: usize) -> DataTable {
        let names: Vec<CellValue> = (0..n).map(|i| CellValue::from(format!("r{:03}", i))).collect();
        let nums: Vec<CellValue> = (0..n).map(|i| CellValue::from((n - i) as f64)).collect();
        DataTable::from_columns([("name", names), ("num", nums)]).unwrap()
    }

    fn first_column(grid: &Grid) -> Vec<String> {
        grid.snapshot().rows.iter().map(|r| r[0].clone()).collect()
    }

    #[test]
    fn test_sort_cycle_and_events() {
        let mut grid = Grid::new(table(3), GridOptions::new()).unwrap();
        assert_eq!(grid.toggle_sort("num").unwrap(), Some(Direction::Asc));
        assert_eq!(first_column(&grid), vec!["r002", "r001", "r000"]);
        assert_eq!(grid.toggle_sort("num").unwrap(), Some(Direction::Desc));
        assert_eq!(grid.toggle_sort("num").unwrap(), None);
        assert_eq!(first_column(&grid), vec!["r000", "r001", "r002"]);

        let events = grid.drain_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], GridEvent::SortChanged { direction: Some(Direction::Asc), .. }));
        assert!(grid.drain_events().is_empty());
    }

    #[test]
    fn test_unsortable_column() {
        let options = GridOptions::new()
            .with_column(ColumnOptions::new("name").with_sortable(false));
        let mut grid = Grid::new(table(3), options).unwrap();
        assert_eq!(grid.toggle_sort("name"), Err(GridError::not_sortable("name")));
        assert!(grid.toggle_sort("missing").is_err());
    }

    #[test]
    fn test_bad_filter_keeps_previous() {
        let mut grid = Grid::new(table(5), GridOptions::new()).unwrap();
        grid.set_filter(Some(Condition::gt("num", 3.0))).unwrap();
        assert_eq!(grid.view().len(), 2);
        assert!(grid.set_filter(Some(Condition::eq("missing", 1.0))).is_err());
        assert_eq!(grid.view().len(), 2);
        grid.set_filter(None).unwrap();
        assert_eq!(grid.view().len(), 5);
    }

    #[test]
    fn test_filter_and_sort_return_to_first_page() {
        let mut grid = Grid::new(table(25), GridOptions::new().with_pagination(10)).unwrap();
        assert!(grid.last_page());
        assert_eq!(grid.pagination().page(), 2);
        grid.toggle_sort("name").unwrap();
        assert_eq!(grid.pagination().page(), 0);

        grid.last_page();
        grid.set_filter(Some(Condition::le("num", 12.0))).unwrap();
        assert_eq!(grid.pagination().page(), 0);
        assert_eq!(grid.pagination().page_count(), 2);
    }

    #[test]
    fn test_pages_render_their_slice() {
        let mut grid = Grid::new(table(25), GridOptions::new().with_pagination(10)).unwrap();
        assert_eq!(grid.page_rows().len(), 10);
        grid.go_to_page(2);
        assert_eq!(first_column(&grid), vec!["r020", "r021", "r022", "r023", "r024"]);
        assert_eq!(grid.snapshot().footer.as_deref(), Some("Page 3 of 3 (25 rows)"));

        assert!(grid.set_page_size(20));
        assert_eq!(grid.pagination().page(), 0);
        assert_eq!(grid.page_rows().len(), 20);
        assert!(matches!(
            grid.drain_events().last(),
            Some(GridEvent::PageChanged { page: 0, page_size: 20 })
        ));
    }

    #[test]
    fn test_tick_applies_direct_writes() {
        let mut grid = Grid::new(table(3), GridOptions::new()).unwrap();
        let row = grid.table().row_ids()[1];
        grid.set_cell(row, "name", "changed".into()).unwrap();
        assert!(grid.is_dirty());
        assert_eq!(first_column(&grid)[1], "r001");

        let stats = grid.tick().unwrap();
        assert!(!grid.is_dirty());
        assert_eq!(stats.updated, 1);
        assert_eq!(first_column(&grid)[1], "changed");
    }

    #[test]
    fn test_tick_reapplies_sort() {
        let mut grid = Grid::new(table(3), GridOptions::new()).unwrap();
        grid.sort_by("name", Some(Direction::Asc)).unwrap();
        let row = grid.table().row_ids()[0];
        grid.set_cell(row, "name", "zzz".into()).unwrap();
        grid.tick().unwrap();
        assert_eq!(first_column(&grid), vec!["r001", "r002", "zzz"]);
    }

    #[test]
    fn test_column_added_through_deferred_queue() {
        let mut grid = Grid::new(table(2), GridOptions::new()).unwrap();
        grid.deferred().push(|table: &mut DataTable| {
            table.add_column(
                "extra",
                datagrid_core::ColumnType::Boolean,
                vec![CellValue::from(true), CellValue::from(false)],
            )?;
            Ok(())
        });
        grid.tick().unwrap();
        assert_eq!(grid.columns().len(), 3);
        assert_eq!(grid.snapshot().rows[0][2], "■");
    }

    #[test]
    fn test_virtualized_scroll() {
        let options = GridOptions::new().with_rendering(
            RenderingOptions::default()
                .with_row_height(36)
                .with_viewport_height(360)
                .with_buffer_size(0),
        );
        let mut grid = Grid::new(table(1000), options).unwrap();
        assert_eq!(grid.surface().window(), 0..10);
        grid.scroll_to(360);
        let stats = grid.scroll_to(540);
        assert_eq!((stats.created, stats.released, stats.reused), (5, 5, 10));
    }

    #[test]
    fn test_custom_renderer_overwrite_rebuilds_cells() {
        struct Shout;
        impl CellRenderer for Shout {
            fn tag(&self) -> RendererTag {
                RendererTag::Text
            }
            fn render(&self, value: &CellValue) -> Element {
                Element::text(value.to_string().to_uppercase())
            }
        }

        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let mut grid = Grid::new(table(2), GridOptions::new()).unwrap();
        let err = grid.register_renderer("text", |_| Box::new(Shout), false).unwrap_err();
        assert!(matches!(err, GridError::DuplicateRenderer(_)));
        assert_eq!(first_column(&grid), vec!["r000", "r001"]);

        grid.register_renderer(
            "text",
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Box::new(Shout)
            },
            true,
        )
        .unwrap();
        assert_eq!(first_column(&grid), vec!["R000", "R001"]);
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_replaces_table() {
        let mut grid = Grid::new(table(2), GridOptions::new()).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        grid.listen(ListenFilter::all(), move |event| {
            assert_eq!(event.kind, ChangeKind::TableReplaced);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        grid.load(&TableConnector::new(table(7))).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(grid.table().row_count(), 7);
        assert_eq!(grid.table().cursor().listener_count(), 1);
        assert_eq!(grid.snapshot().rows.len(), 7);
        assert!(matches!(
            grid.drain_events().last(),
            Some(GridEvent::DataLoaded { rows: 7, columns: 2 })
        ));
    }
}
