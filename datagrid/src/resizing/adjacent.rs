use super::{ResizeOutcome, ResizeStrategy, WidthSpec, clamp_delta};

/// Only the dragged column and its right-hand neighbour change.
///
/// When the neighbour reaches a bound the drag simply stops there; nothing
/// cascades further right. Dragging the last column, or a column whose
/// neighbour is fixed, changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adjacent;

impl ResizeStrategy for Adjacent {
    fn resize(&self, columns: &[WidthSpec], index: usize, delta: i64) -> ResizeOutcome {
        let mut outcome = ResizeOutcome::unchanged(columns);
        let (Some(dragged), Some(neighbour)) = (columns.get(index), columns.get(index + 1)) else {
            return outcome;
        };
        if !neighbour.resizable {
            return outcome;
        }

        let delta = clamp_delta(dragged, delta);
        let neighbour_width = neighbour.clamp(i64::from(neighbour.width) - delta);
        let absorbed = i64::from(neighbour.width) - i64::from(neighbour_width);

        outcome.widths[index] = dragged.clamp(i64::from(dragged.width) + absorbed);
        outcome.widths[index + 1] = neighbour_width;
        outcome
    }
}
