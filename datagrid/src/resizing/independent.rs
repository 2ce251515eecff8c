use super::{ResizeOutcome, ResizeStrategy, WidthSpec, clamp_delta};

/// Only the dragged column changes; the container absorbs the difference.
///
/// Used when the grid may overflow and scroll horizontally.
#[derive(Debug, Clone, Copy, Default)]
pub struct Independent;

impl ResizeStrategy for Independent {
    fn resize(&self, columns: &[WidthSpec], index: usize, delta: i64) -> ResizeOutcome {
        let mut outcome = ResizeOutcome::unchanged(columns);
        let Some(dragged) = columns.get(index) else {
            return outcome;
        };

        let delta = clamp_delta(dragged, delta);
        outcome.widths[index] = dragged.clamp(i64::from(dragged.width) + delta);
        outcome.container_delta = delta;
        outcome
    }
}
