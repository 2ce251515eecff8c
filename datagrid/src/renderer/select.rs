//! Drop-down renderer over a fixed list of choices.

use datagrid_core::CellValue;

use super::{CellRenderer, EditInput, RendererTag};
use crate::element::{Element, ElementKind};

/// Shows the value as text and edits it by picking one of the column's choices.
#[derive(Debug, Default)]
pub struct SelectRenderer {
    choices: Vec<String>,
    editing: bool,
    original: Option<String>,
    selected: Option<String>,
}

impl SelectRenderer {
    pub fn new(choices: Vec<String>) -> Self {
        Self {
            choices,
            ..Default::default()
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Index of the current choice, if it is one of the options.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.choices.iter().position(|c| c == selected)
    }
}

impl CellRenderer for SelectRenderer {
    fn tag(&self) -> RendererTag {
        RendererTag::Select
    }

    fn render(&self, value: &CellValue) -> Element {
        Element::new(ElementKind::Select).content(value.to_string())
    }

    fn enter_edit(&mut self, value: &CellValue) {
        let current = (!value.is_null()).then(|| value.to_string());
        self.editing = true;
        self.original.clone_from(&current);
        self.selected = current;
    }

    fn input(&mut self, input: EditInput) {
        if !self.editing {
            return;
        }
        match input {
            EditInput::Select(index) => {
                if let Some(choice) = self.choices.get(index) {
                    self.selected = Some(choice.clone());
                }
            }
            EditInput::SetText(text) => {
                self.selected = (!text.is_empty()).then_some(text);
            }
            EditInput::Toggle | EditInput::Type(_) | EditInput::Backspace => {}
        }
    }

    fn edit_view(&self) -> Element {
        let current = self.selected_index();
        let options = self.choices.iter().enumerate().map(|(i, choice)| {
            Element::text(choice.as_str()).data("selected", current == Some(i))
        });
        Element::new(ElementKind::Select)
            .children(options)
            .data("value", self.selected.clone().unwrap_or_default())
            .focused(true)
    }

    fn commit(&mut self) -> Result<CellValue, String> {
        if !self.editing {
            return Err(String::from("No edit in progress"));
        }
        match &self.selected {
            None => Ok(CellValue::Null),
            Some(choice)
                if self.choices.is_empty()
                    || self.choices.contains(choice)
                    || self.original.as_ref() == Some(choice) =>
            {
                Ok(CellValue::from(choice.as_str()))
            }
            Some(choice) => Err(format!(
                "'{}' is not one of: {}",
                choice,
                self.choices.join(", ")
            )),
        }
    }

    fn cancel(&mut self) {
        self.editing = false;
        self.selected = None;
        self.original = None;
    }

    fn destroy(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> SelectRenderer {
        SelectRenderer::new(vec!["open".into(), "closed".into()])
    }

    #[test]
    fn test_select_choice() {
        let mut select = renderer();
        select.enter_edit(&"open".into());
        assert_eq!(select.selected_index(), Some(0));
        select.input(EditInput::Select(1));
        assert_eq!(select.commit(), Ok(CellValue::from("closed")));
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let mut select = renderer();
        select.enter_edit(&"open".into());
        select.input(EditInput::Select(9));
        assert_eq!(select.commit(), Ok(CellValue::from("open")));
    }

    #[test]
    fn test_unknown_text_rejected() {
        let mut select = renderer();
        select.enter_edit(&CellValue::Null);
        select.input(EditInput::SetText("pending".into()));
        assert!(select.commit().is_err());
    }

    #[test]
    fn test_original_value_kept_even_if_not_an_option() {
        let mut select = renderer();
        select.enter_edit(&"legacy".into());
        assert_eq!(select.commit(), Ok(CellValue::from("legacy")));
    }

    #[test]
    fn test_edit_view_marks_selection() {
        let mut select = renderer();
        select.enter_edit(&"closed".into());
        let view = select.edit_view();
        let marks: Vec<_> = view
            .child_elements()
            .iter()
            .map(|e| e.attr("selected"))
            .collect();
        assert_eq!(marks, vec![Some("false"), Some("true")]);
    }
}
