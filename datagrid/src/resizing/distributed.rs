use super::{ResizeOutcome, ResizeStrategy, WidthSpec, clamp_delta};

/// The dragged column's change is spread over every other resizable column.
///
/// Each column first takes a share proportional to its current width. Shares
/// that would push a column past a bound are clamped, and whatever is left
/// goes round-robin to the columns that still have room until it is used up
/// or every column is clamped. The dragged column then moves by exactly the
/// amount the others absorbed, so the total width never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Distributed;

impl ResizeStrategy for Distributed {
    fn resize(&self, columns: &[WidthSpec], index: usize, delta: i64) -> ResizeOutcome {
        let mut outcome = ResizeOutcome::unchanged(columns);
        let Some(dragged) = columns.get(index) else {
            return outcome;
        };

        let delta = clamp_delta(dragged, delta);
        let others: Vec<usize> = (0..columns.len())
            .filter(|&i| i != index && columns[i].resizable)
            .collect();
        if delta == 0 || others.is_empty() {
            return outcome;
        }

        // The others move opposite to the dragged column.
        let target = -delta;
        let mut changes = vec![0i64; columns.len()];

        let total: i64 = others.iter().map(|&i| i64::from(columns[i].width)).sum();
        if total > 0 {
            for &i in &others {
                let share = target * i64::from(columns[i].width) / total;
                changes[i] = bounded(share, columns[i].room(target));
            }
        }

        let mut residual = target - others.iter().map(|&i| changes[i]).sum::<i64>();
        while residual != 0 {
            let open: Vec<usize> = others
                .iter()
                .copied()
                .filter(|&i| columns[i].room(target) - changes[i].abs() > 0)
                .collect();
            if open.is_empty() {
                break;
            }

            let count = open.len() as i64;
            let even = residual / count;
            let extra = (residual % count).abs();
            for (k, &i) in open.iter().enumerate() {
                let mut step = even;
                if (k as i64) < extra {
                    step += residual.signum();
                }
                let room = columns[i].room(target) - changes[i].abs();
                let step = bounded(step, room);
                changes[i] += step;
            }
            residual = target - others.iter().map(|&i| changes[i]).sum::<i64>();
        }

        let absorbed: i64 = others.iter().map(|&i| changes[i]).sum();
        for &i in &others {
            outcome.widths[i] = (i64::from(columns[i].width) + changes[i]).max(0) as u32;
        }
        outcome.widths[index] = (i64::from(dragged.width) - absorbed).max(0) as u32;
        outcome
    }
}

/// Limits a signed change to `room` pixels in its own direction.
fn bounded(change: i64, room: i64) -> i64 {
    change.signum() * change.abs().min(room.max(0))
}
