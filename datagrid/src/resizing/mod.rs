//! Column-width resizing strategies.
//!
//! A strategy turns "column `i` was dragged by `delta` pixels" into a new set
//! of widths. Every strategy honours each column's `[min, max]` bounds, and
//! all of them first clamp the delta so the dragged column itself stays in
//! bounds. [`Adjacent`] and [`Distributed`] conserve the total width exactly;
//! [`Independent`] lets the container grow or shrink instead.
//!
//! Widths are whole pixels, so conservation holds without rounding drift.
//!
//! # Example
//!
//! ```
//! use datagrid::resizing::{ResizingMode, WidthSpec};
//!
//! let columns = vec![WidthSpec::new(100, 50, 400); 3];
//! let outcome = ResizingMode::Distributed.resize(&columns, 0, 40);
//! assert_eq!(outcome.widths, vec![140, 80, 80]);
//! assert_eq!(outcome.container_delta, 0);
//! ```

mod adjacent;
mod distributed;
mod independent;
mod session;

pub use adjacent::Adjacent;
pub use distributed::Distributed;
pub use independent::Independent;
pub use session::ResizeSession;

use std::fmt::Debug;

use serde::Deserialize;
use serde::Serialize;

/// Width and bounds of one column taking part in a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthSpec {
    /// Current width in pixels.
    pub width: u32,
    /// Minimum width in pixels.
    pub min: u32,
    /// Maximum width in pixels.
    pub max: u32,
    /// Whether the column may change width at all.
    pub resizable: bool,
}

impl WidthSpec {
    /// Creates a resizable column spec.
    pub fn new(width: u32, min: u32, max: u32) -> Self {
        Self {
            width,
            min,
            max: max.max(min),
            resizable: true,
        }
    }

    /// Marks the column as fixed.
    pub fn fixed(mut self) -> Self {
        self.resizable = false;
        self
    }

    /// Clamps a width to this column's bounds.
    pub fn clamp(&self, width: i64) -> u32 {
        let max = self.max.max(self.min);
        width.clamp(i64::from(self.min), i64::from(max)) as u32
    }

    /// How far this column can grow (`delta > 0`) or shrink (`delta < 0`).
    pub(crate) fn room(&self, direction: i64) -> i64 {
        if !self.resizable {
            return 0;
        }
        if direction > 0 {
            i64::from(self.max) - i64::from(self.width)
        } else {
            i64::from(self.width) - i64::from(self.min)
        }
    }
}

/// Result of one resize computation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResizeOutcome {
    /// New widths, one per column.
    pub widths: Vec<u32>,
    /// How much the container's total width changed.
    pub container_delta: i64,
}

impl ResizeOutcome {
    /// An outcome that changes nothing.
    pub fn unchanged(columns: &[WidthSpec]) -> Self {
        Self {
            widths: columns.iter().map(|c| c.width).collect(),
            container_delta: 0,
        }
    }

    /// Sum of the new widths.
    pub fn total(&self) -> u64 {
        self.widths.iter().map(|w| u64::from(*w)).sum()
    }
}

/// A width-redistribution algorithm.
pub trait ResizeStrategy: Debug + Send + Sync {
    /// Computes new widths after dragging column `index` by `delta` pixels.
    fn resize(&self, columns: &[WidthSpec], index: usize, delta: i64) -> ResizeOutcome;
}

/// Clamps a drag delta so the dragged column stays within its bounds.
///
/// Returns 0 for a non-resizable column.
pub fn clamp_delta(column: &WidthSpec, delta: i64) -> i64 {
    if !column.resizable {
        return 0;
    }
    i64::from(column.clamp(i64::from(column.width) + delta)) - i64::from(column.width)
}

/// Grid-level choice of resizing strategy.
///
/// Defaults to [`ResizingMode::Adjacent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizingMode {
    /// The right-hand neighbour absorbs the change.
    #[default]
    Adjacent,
    /// All other columns absorb the change in proportion to their width.
    Distributed,
    /// Only the dragged column changes; the container grows or shrinks.
    Independent,
}

impl ResizingMode {
    /// Returns the strategy implementing this mode.
    pub fn strategy(&self) -> &'static dyn ResizeStrategy {
        match self {
            ResizingMode::Adjacent => &Adjacent,
            ResizingMode::Distributed => &Distributed,
            ResizingMode::Independent => &Independent,
        }
    }

    /// Resizes with this mode's strategy.
    pub fn resize(&self, columns: &[WidthSpec], index: usize, delta: i64) -> ResizeOutcome {
        self.strategy().resize(columns, index, delta)
    }
}
