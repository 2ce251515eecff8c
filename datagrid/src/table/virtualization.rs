//! Visible-window arithmetic and row reconciliation.

use std::collections::HashSet;
use std::ops::Range;

use datagrid_core::RowId;

/// Rows intersecting the viewport, as a half-open range of page positions.
///
/// The first row is the one under `scroll_top`; the last is the one cut by
/// the viewport's bottom edge. The result is clamped to `0..total_rows`.
///
/// # Example
///
/// ```
/// use datagrid::table::compute_visible_window;
///
/// assert_eq!(compute_visible_window(360, 360, 36, 1000), 10..20);
/// assert_eq!(compute_visible_window(370, 360, 36, 1000), 10..21);
/// assert_eq!(compute_visible_window(0, 360, 36, 4), 0..4);
/// ```
pub fn compute_visible_window(
    scroll_top: u64,
    viewport_height: u32,
    row_height: u32,
    total_rows: usize,
) -> Range<usize> {
    if row_height == 0 {
        return 0..total_rows;
    }
    let row_height = u64::from(row_height);
    let first = usize::try_from(scroll_top / row_height).unwrap_or(usize::MAX);
    let last = usize::try_from((scroll_top + u64::from(viewport_height)).div_ceil(row_height))
        .unwrap_or(usize::MAX);
    first.min(total_rows)..last.min(total_rows)
}

/// Widens a window by `buffer` rows on both sides, clamped to `0..total_rows`.
pub fn overscan(window: Range<usize>, buffer: usize, total_rows: usize) -> Range<usize> {
    let start = window.start.saturating_sub(buffer).min(total_rows);
    let end = window.end.saturating_add(buffer).min(total_rows);
    start..end
}

/// Which rows to create, keep and release when the window moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Rows entering the window, in window order.
    pub create: Vec<RowId>,
    /// Rows present before and after.
    pub keep: Vec<RowId>,
    /// Rows leaving the window, in previous order.
    pub release: Vec<RowId>,
}

/// The new window lists a row more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRow(pub RowId);

/// Diffs two windows of row ids.
///
/// Fails if `next` repeats a row, which would render it twice.
pub fn reconcile(previous: &[RowId], next: &[RowId]) -> Result<ReconcilePlan, DuplicateRow> {
    let mut seen = HashSet::with_capacity(next.len());
    for id in next {
        if !seen.insert(*id) {
            return Err(DuplicateRow(*id));
        }
    }

    let before: HashSet<RowId> = previous.iter().copied().collect();
    let mut plan = ReconcilePlan::default();
    for id in next {
        if before.contains(id) {
            plan.keep.push(*id);
        } else {
            plan.create.push(*id);
        }
    }
    plan.release = previous
        .iter()
        .filter(|id| !seen.contains(*id))
        .copied()
        .collect();
    Ok(plan)
}

/// What one render pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Rows that entered the window.
    pub created: usize,
    /// Rows that left the window.
    pub released: usize,
    /// Rows drawn on an existing element, either kept from the previous
    /// pass or recycled from the pool.
    pub reused: usize,
    /// Created rows whose element came from the recycling pool.
    pub recycled: usize,
    /// Created rows that needed a fresh element.
    pub allocated: usize,
    /// Cells refreshed in place by change events since the last pass.
    pub updated: usize,
    /// The pass discarded every row and rendered from scratch.
    pub fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: Range<u64>) -> Vec<RowId> {
        raw.map(RowId::new).collect()
    }

    #[test]
    fn test_window_clamping() {
        assert_eq!(compute_visible_window(0, 400, 36, 0), 0..0);
        assert_eq!(compute_visible_window(100_000, 400, 36, 10), 10..10);
        assert_eq!(compute_visible_window(35, 1, 36, 10), 0..1);
        assert_eq!(compute_visible_window(0, 400, 0, 7), 0..7);
    }

    #[test]
    fn test_overscan() {
        assert_eq!(overscan(10..20, 5, 1000), 5..25);
        assert_eq!(overscan(2..8, 5, 10), 0..10);
        assert_eq!(overscan(0..0, 3, 0), 0..0);
    }

    #[test]
    fn test_scroll_by_half_a_window() {
        let plan = reconcile(&ids(10..20), &ids(15..25)).unwrap();
        assert_eq!(plan.create, ids(20..25));
        assert_eq!(plan.release, ids(10..15));
        assert_eq!(plan.keep, ids(15..20));
    }

    #[test]
    fn test_reordered_rows_are_kept() {
        let plan = reconcile(&ids(1..4), &[RowId::new(3), RowId::new(1), RowId::new(2)]).unwrap();
        assert!(plan.create.is_empty());
        assert!(plan.release.is_empty());
        assert_eq!(plan.keep, vec![RowId::new(3), RowId::new(1), RowId::new(2)]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = reconcile(&[], &[RowId::new(1), RowId::new(1)]).unwrap_err();
        assert_eq!(err, DuplicateRow(RowId::new(1)));
    }
}
