//! Sequential composition of modifiers.

use std::sync::Arc;

use log::trace;

use super::DataModifier;
use crate::error::SchemaError;
use crate::table::DataTable;
use crate::view::TableView;

/// Applies modifiers in order, each one to the previous one's output.
///
/// # Example
///
/// ```
/// use datagrid_core::modifier::{ChainModifier, Condition, FilterModifier, SortModifier};
///
/// let chain = ChainModifier::new()
///     .then(FilterModifier::new(Condition::is_not_null("name")))
///     .then(SortModifier::asc("name"));
/// assert_eq!(chain.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChainModifier {
    steps: Vec<Arc<dyn DataModifier>>,
}

impl ChainModifier {
    /// Creates an empty chain, which passes views through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a modifier.
    pub fn then(mut self, modifier: impl DataModifier + 'static) -> Self {
        self.steps.push(Arc::new(modifier));
        self
    }

    /// Appends a shared modifier.
    pub fn push(&mut self, modifier: Arc<dyn DataModifier>) {
        self.steps.push(modifier);
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl DataModifier for ChainModifier {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn apply_to(&self, table: &DataTable, view: TableView) -> Result<TableView, SchemaError> {
        self.steps.iter().try_fold(view, |view, step| {
            let before = view.len();
            let view = step.apply_to(table, view)?;
            trace!("{}: {} -> {} rows", step.name(), before, view.len());
            Ok(view)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Condition, FilterModifier, InvertModifier, SortModifier};
    use crate::value::CellValue;

    fn table() -> DataTable {
        DataTable::from_columns([(
            "name",
            vec![CellValue::from("B"), CellValue::from("A"), CellValue::from("C")],
        )])
        .unwrap()
    }

    fn raw(view: &TableView) -> Vec<u64> {
        view.row_ids().iter().map(|r| r.get()).collect()
    }

    #[test]
    fn test_sort_then_filter() {
        let table = DataTable::from_columns([(
            "name",
            vec![CellValue::from("B"), CellValue::from("A")],
        )])
        .unwrap();

        let sorted = SortModifier::asc("name").apply(&table).unwrap();
        assert_eq!(raw(&sorted), vec![2, 1]);

        let filtered = FilterModifier::new(Condition::eq("name", "A"))
            .apply_to(&table, sorted)
            .unwrap();
        assert_eq!(raw(&filtered), vec![2]);
    }

    #[test]
    fn test_chain_order_matters() {
        let table = table();
        let chain = ChainModifier::new()
            .then(SortModifier::asc("name"))
            .then(InvertModifier);
        assert_eq!(raw(&chain.apply(&table).unwrap()), vec![3, 1, 2]);
    }

    #[test]
    fn test_chain_is_deterministic() {
        let table = table();
        let chain = ChainModifier::new()
            .then(FilterModifier::new(Condition::ne("name", "A")))
            .then(SortModifier::desc("name"));
        let first = chain.apply(&table).unwrap();
        let second = chain.apply(&table).unwrap();
        assert_eq!(first, second);
        assert_eq!(raw(&first), vec![3, 1]);
    }

    #[test]
    fn test_empty_chain_passes_through() {
        let table = table();
        let view = ChainModifier::new().apply(&table).unwrap();
        assert_eq!(view, TableView::full(&table));
    }

    #[test]
    fn test_error_stops_chain() {
        let table = table();
        let chain = ChainModifier::new()
            .then(SortModifier::asc("name"))
            .then(SortModifier::asc("missing"));
        assert!(chain.apply(&table).is_err());
    }
}
