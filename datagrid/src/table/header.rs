//! Header row.

use datagrid_core::modifier::Direction;

use crate::column::Column;
use crate::element::{Element, ElementKind};

/// Indicator appended to a sorted column's label.
pub fn sort_indicator(sort: Option<Direction>) -> &'static str {
    match sort {
        Some(Direction::Asc) => " ▲",
        Some(Direction::Desc) => " ▼",
        None => "",
    }
}

/// Label shown for a column, including its sort indicator.
pub fn header_label(column: &Column) -> String {
    format!("{}{}", column.header(), sort_indicator(column.sort()))
}

/// Draws one header cell.
pub fn header_cell(column: &Column) -> Element {
    let sort = match column.sort() {
        Some(Direction::Asc) => "asc",
        Some(Direction::Desc) => "desc",
        None => "none",
    };
    Element::new(ElementKind::HeaderCell)
        .content(header_label(column))
        .data("field", column.field())
        .data("width", column.width())
        .data("sort", sort)
        .data("sortable", column.is_sortable())
        .data("resizable", column.is_resizable())
}

/// Draws the header row.
pub fn header_view(columns: &[Column]) -> Element {
    Element::new(ElementKind::Header).children(columns.iter().map(header_cell))
}

#[cfg(test)]
mod tests {
    use datagrid_core::{CellValue, DataTable};

    use super::*;
    use crate::column::build_columns;
    use crate::options::GridOptions;

    #[test]
    fn test_labels_show_sort() {
        let table = DataTable::from_columns([("name", vec![CellValue::from("x")])]).unwrap();
        let mut columns = build_columns(&table, &GridOptions::new()).unwrap();
        assert_eq!(header_label(&columns[0]), "name");

        columns[0].set_sort(Some(Direction::Desc));
        let header = header_view(&columns);
        let cell = &header.child_elements()[0];
        assert_eq!(cell.text_content(), "name ▼");
        assert_eq!(cell.attr("sort"), Some("desc"));
        assert_eq!(cell.attr("width"), Some("100"));
    }
}
