//! Column resizing.

use log::debug;

use super::{Grid, GridEvent};
use crate::error::GridError;
use crate::resizing::{ResizeOutcome, ResizeSession};

impl Grid {
    /// Starts dragging a column's right edge.
    pub fn begin_resize(&mut self, field: &str) -> Result<(), GridError> {
        if self.resize.is_some() {
            return Err(GridError::ResizeInProgress);
        }
        let index = self.column_index(field)?;
        if !self.columns[index].is_resizable() {
            return Err(GridError::not_resizable(field));
        }

        let specs = self.columns.iter().map(|c| c.width_spec()).collect();
        self.resize = Some(ResizeSession::start(specs, index, self.options.resizing));
        Ok(())
    }

    /// Moves the drag to `total_delta` pixels from where it started.
    ///
    /// Returns the new widths.
    pub fn update_resize(&mut self, total_delta: i64) -> Result<Vec<u32>, GridError> {
        let session = self.resize.as_mut().ok_or(GridError::NoActiveResize)?;
        let widths = session.update(total_delta).widths.clone();
        self.apply_widths(&widths);
        Ok(widths)
    }

    /// Ends the drag, keeping the current widths.
    pub fn end_resize(&mut self) -> Result<ResizeOutcome, GridError> {
        let session = self.resize.take().ok_or(GridError::NoActiveResize)?;
        let column = self
            .columns
            .get(session.column())
            .map(|c| c.field().to_string())
            .ok_or(GridError::NoActiveResize)?;
        let outcome = session.finish();
        self.apply_widths(&outcome.widths);

        debug!(
            "Resized '{}': {:?} (container {:+})",
            column, outcome.widths, outcome.container_delta
        );
        self.events.push_back(GridEvent::ColumnResized {
            column,
            widths: outcome.widths.clone(),
        });
        Ok(outcome)
    }

    /// Abandons the drag and restores the widths from before it started.
    pub fn cancel_resize(&mut self) -> Result<(), GridError> {
        let session = self.resize.take().ok_or(GridError::NoActiveResize)?;
        let column = self
            .columns
            .get(session.column())
            .map(|c| c.field().to_string())
            .ok_or(GridError::NoActiveResize)?;
        self.apply_widths(&session.cancel());
        self.events.push_back(GridEvent::ResizeCancelled { column });
        Ok(())
    }

    /// Resizes a column in one step.
    pub fn resize_column(&mut self, field: &str, delta: i64) -> Result<ResizeOutcome, GridError> {
        self.begin_resize(field)?;
        self.update_resize(delta)?;
        self.end_resize()
    }

    /// Returns `true` while a drag is in progress.
    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Sum of the column widths.
    pub fn total_width(&self) -> u64 {
        self.columns.iter().map(|c| u64::from(c.width())).sum()
    }

    fn apply_widths(&mut self, widths: &[u32]) {
        for (column, width) in self.columns.iter_mut().zip(widths) {
            column.apply_width(*width);
        }
    }
}

#[cfg(test)]
mod tests {
    use datagrid_core::{CellValue, DataTable};

    use super::*;
    use crate::options::{ColumnOptions, GridOptions};
    use crate::resizing::ResizingMode;

    fn grid(mode: ResizingMode) -> Grid {
        let table = DataTable::from_columns([
            ("a", vec![CellValue::from(1.0)]),
            ("b", vec![CellValue::from(2.0)]),
            ("c", vec![CellValue::from(3.0)]),
        ])
        .unwrap();
        let column = |field: &str| ColumnOptions::new(field).with_width(100).with_bounds(50, 400);
        let options = GridOptions::new()
            .with_resizing(mode)
            .with_column(column("a"))
            .with_column(column("b"))
            .with_column(column("c"));
        Grid::new(table, options).unwrap()
    }

    fn widths(grid: &Grid) -> Vec<u32> {
        grid.columns().iter().map(|c| c.width()).collect()
    }

    #[test]
    fn test_distributed_drag() {
        let mut grid = grid(ResizingMode::Distributed);
        let outcome = grid.resize_column("a", 40).unwrap();
        assert_eq!(outcome.widths, vec![140, 80, 80]);
        assert_eq!(grid.total_width(), 300);
        assert!(matches!(
            grid.drain_events().as_slice(),
            [GridEvent::ColumnResized { column, .. }] if column == "a"
        ));
    }

    #[test]
    fn test_cancel_restores_exactly() {
        let mut grid = grid(ResizingMode::Adjacent);
        grid.begin_resize("b").unwrap();
        grid.update_resize(37).unwrap();
        assert_eq!(widths(&grid), vec![100, 137, 63]);
        grid.update_resize(-11).unwrap();
        grid.cancel_resize().unwrap();
        assert_eq!(widths(&grid), vec![100, 100, 100]);
        assert!(!grid.is_resizing());
    }

    #[test]
    fn test_independent_grows_container() {
        let mut grid = grid(ResizingMode::Independent);
        let outcome = grid.resize_column("c", 500).unwrap();
        assert_eq!(outcome.container_delta, 300);
        assert_eq!(grid.total_width(), 600);
    }

    #[test]
    fn test_session_errors() {
        let mut grid = grid(ResizingMode::Adjacent);
        assert_eq!(grid.update_resize(5), Err(GridError::NoActiveResize));
        grid.begin_resize("a").unwrap();
        assert_eq!(grid.begin_resize("b"), Err(GridError::ResizeInProgress));
        assert!(grid.end_resize().is_ok());
        assert_eq!(grid.cancel_resize(), Err(GridError::NoActiveResize));
    }

    #[test]
    fn test_deleted_column_cancels_resize() {
        let mut grid = grid(ResizingMode::Adjacent);
        grid.begin_resize("b").unwrap();
        assert_eq!(grid.update_resize(30).unwrap(), vec![100, 130, 70]);

        grid.deferred().push(|table: &mut DataTable| {
            table.delete_column("c")?;
            Ok(())
        });
        grid.tick().unwrap();

        assert!(!grid.is_resizing());
        assert_eq!(widths(&grid), vec![100, 100]);
        assert_eq!(grid.end_resize(), Err(GridError::NoActiveResize));
        assert_eq!(grid.cancel_resize(), Err(GridError::NoActiveResize));
        assert!(grid.drain_events().contains(&GridEvent::ResizeCancelled {
            column: "b".into()
        }));
    }
}
