//! Drag sessions.

use log::debug;

use super::{ResizeOutcome, ResizingMode, WidthSpec};

/// State of one column drag, from pointer-down to pointer-up.
///
/// The session keeps the widths captured at pointer-down. Every update is
/// computed from that snapshot using the total pointer movement since the
/// drag started, so updates never accumulate rounding or clamping artefacts,
/// and [`cancel`](ResizeSession::cancel) returns the snapshot unchanged.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    column: usize,
    mode: ResizingMode,
    snapshot: Vec<WidthSpec>,
    current: ResizeOutcome,
}

impl ResizeSession {
    /// Starts a session for dragging `column`.
    pub fn start(columns: Vec<WidthSpec>, column: usize, mode: ResizingMode) -> Self {
        debug!("Resize session started on column {} ({:?})", column, mode);
        let current = ResizeOutcome::unchanged(&columns);
        Self {
            column,
            mode,
            snapshot: columns,
            current,
        }
    }

    /// Index of the dragged column.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Strategy in use.
    pub fn mode(&self) -> ResizingMode {
        self.mode
    }

    /// Widths captured at pointer-down.
    pub fn snapshot(&self) -> Vec<u32> {
        self.snapshot.iter().map(|c| c.width).collect()
    }

    /// The most recent outcome.
    pub fn current(&self) -> &ResizeOutcome {
        &self.current
    }

    /// Recomputes widths for the total pointer movement since pointer-down.
    pub fn update(&mut self, total_delta: i64) -> &ResizeOutcome {
        self.current = self.mode.resize(&self.snapshot, self.column, total_delta);
        &self.current
    }

    /// Ends the drag, keeping the latest widths.
    pub fn finish(self) -> ResizeOutcome {
        debug!("Resize session finished: {:?}", self.current.widths);
        self.current
    }

    /// Abandons the drag and returns the widths captured at pointer-down.
    pub fn cancel(self) -> Vec<u32> {
        debug!("Resize session cancelled");
        self.snapshot()
    }
}
