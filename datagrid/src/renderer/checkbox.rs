//! Boolean renderer.

use datagrid_core::CellValue;

use super::{CellRenderer, EditInput, RendererTag};
use crate::element::{Element, ElementKind};

/// Reads a cell as a checkbox state. Anything that is not `true` is unchecked.
fn is_checked(value: &CellValue) -> bool {
    match value {
        CellValue::Bool(b) => *b,
        CellValue::Number(n) => *n == 1.0,
        CellValue::String(s) => s.trim().eq_ignore_ascii_case("true"),
        CellValue::Null => false,
    }
}

/// Shows a check mark and toggles it while editing.
#[derive(Debug)]
pub struct CheckboxRenderer {
    pending: Option<bool>,
    checked_char: char,
    unchecked_char: char,
}

impl Default for CheckboxRenderer {
    fn default() -> Self {
        Self {
            pending: None,
            checked_char: '■',
            unchecked_char: '□',
        }
    }
}

impl CheckboxRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses custom indicator characters.
    pub fn with_chars(mut self, checked: char, unchecked: char) -> Self {
        self.checked_char = checked;
        self.unchecked_char = unchecked;
        self
    }

    fn indicator(&self, checked: bool) -> Element {
        let glyph = if checked {
            self.checked_char
        } else {
            self.unchecked_char
        };
        Element::new(ElementKind::Checkbox)
            .content(glyph.to_string())
            .data("checked", checked)
    }
}

impl CellRenderer for CheckboxRenderer {
    fn tag(&self) -> RendererTag {
        RendererTag::Checkbox
    }

    fn render(&self, value: &CellValue) -> Element {
        self.indicator(is_checked(value))
    }

    fn enter_edit(&mut self, value: &CellValue) {
        self.pending = Some(is_checked(value));
    }

    fn input(&mut self, input: EditInput) {
        let Some(checked) = &mut self.pending else {
            return;
        };
        match input {
            EditInput::Toggle | EditInput::Type(' ') => *checked = !*checked,
            EditInput::SetText(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => *checked = true,
                "false" => *checked = false,
                _ => {}
            },
            EditInput::Select(index) => *checked = index != 0,
            EditInput::Type(_) | EditInput::Backspace => {}
        }
    }

    fn edit_view(&self) -> Element {
        self.indicator(self.pending.unwrap_or(false)).focused(true)
    }

    fn commit(&mut self) -> Result<CellValue, String> {
        self.pending
            .map(CellValue::Bool)
            .ok_or_else(|| String::from("No edit in progress"))
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn destroy(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let renderer = CheckboxRenderer::new();
        assert_eq!(renderer.render(&true.into()).text_content(), "■");
        assert_eq!(renderer.render(&false.into()).text_content(), "□");
        assert_eq!(renderer.render(&CellValue::Null).attr("checked"), Some("false"));
        assert_eq!(renderer.render(&"TRUE".into()).attr("checked"), Some("true"));
    }

    #[test]
    fn test_toggle_and_commit() {
        let mut renderer = CheckboxRenderer::new().with_chars('x', ' ');
        renderer.enter_edit(&false.into());
        renderer.input(EditInput::Toggle);
        assert_eq!(renderer.edit_view().text_content(), "x");
        assert_eq!(renderer.commit(), Ok(CellValue::Bool(true)));
    }

    #[test]
    fn test_set_text() {
        let mut renderer = CheckboxRenderer::new();
        renderer.enter_edit(&CellValue::Null);
        renderer.input(EditInput::SetText("True".into()));
        assert_eq!(renderer.commit(), Ok(CellValue::Bool(true)));
        renderer.input(EditInput::SetText("maybe".into()));
        assert_eq!(renderer.commit(), Ok(CellValue::Bool(true)));
    }
}
