//! Plain text renderer and the shared edit buffer.

use datagrid_core::CellValue;

use super::{CellRenderer, EditInput, RendererTag};
use crate::element::{Element, ElementKind};

/// Text being typed into an editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
}

impl EditBuffer {
    /// Creates a buffer holding `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Seeds a buffer from a cell value. Null becomes empty text.
    pub fn from_value(value: &CellValue) -> Self {
        Self::new(value.to_string())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Applies a text input. Returns `false` for inputs that are not text edits.
    pub fn apply(&mut self, input: &EditInput) -> bool {
        match input {
            EditInput::SetText(text) => self.text.clone_from(text),
            EditInput::Type(c) => self.text.push(*c),
            EditInput::Backspace => {
                self.text.pop();
            }
            EditInput::Toggle | EditInput::Select(_) => return false,
        }
        true
    }

    /// Draws the buffer as an input control.
    pub fn view(&self) -> Element {
        Element::new(ElementKind::Input)
            .content(self.text.as_str())
            .data("value", &self.text)
            .focused(true)
    }
}

/// Renders values as text and edits them in a text input.
#[derive(Debug, Default)]
pub struct TextRenderer {
    buffer: Option<EditBuffer>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CellRenderer for TextRenderer {
    fn tag(&self) -> RendererTag {
        RendererTag::Text
    }

    fn render(&self, value: &CellValue) -> Element {
        Element::text(value.to_string())
    }

    fn enter_edit(&mut self, value: &CellValue) {
        self.buffer = Some(EditBuffer::from_value(value));
    }

    fn input(&mut self, input: EditInput) {
        if let Some(buffer) = &mut self.buffer {
            buffer.apply(&input);
        }
    }

    fn edit_view(&self) -> Element {
        self.buffer.clone().unwrap_or_default().view()
    }

    fn commit(&mut self) -> Result<CellValue, String> {
        match &self.buffer {
            Some(buffer) => Ok(CellValue::from(buffer.text())),
            None => Err(String::from("No edit in progress")),
        }
    }

    fn cancel(&mut self) {
        self.buffer = None;
    }

    fn destroy(&mut self) {
        self.buffer = None;
    }
}
