use super::DataModifier;
use crate::error::SchemaError;
use crate::table::DataTable;
use crate::view::TableView;

/// Reverses the order of a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvertModifier;

impl DataModifier for InvertModifier {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn apply_to(&self, _table: &DataTable, view: TableView) -> Result<TableView, SchemaError> {
        let mut rows = view.into_row_ids();
        rows.reverse();
        Ok(TableView::from_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CellValue;

    #[test]
    fn test_reverses_order() {
        let table = DataTable::from_columns([(
            "n",
            vec![CellValue::from(1.0), CellValue::from(2.0), CellValue::from(3.0)],
        )])
        .unwrap();

        let view = InvertModifier.apply(&table).unwrap();
        let raw: Vec<u64> = view.row_ids().iter().map(|r| r.get()).collect();
        assert_eq!(raw, vec![3, 2, 1]);

        let back = InvertModifier.apply_to(&table, view).unwrap();
        assert_eq!(back, TableView::full(&table));
    }
}
