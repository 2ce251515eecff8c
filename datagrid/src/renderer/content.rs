//! Per-cell edit lifecycle.
//!
//! ```text
//! Display -> EditRequested -> Editing -> Display   (commit accepted)
//!                                    \-> Editing   (commit rejected, message shown)
//!                                    \-> Display   (cancel, prior value kept)
//! ```

use datagrid_core::CellValue;
use log::debug;

use super::{CellRenderer, EditInput, RendererTag};
use crate::element::Element;

/// Where a cell is in its edit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellState {
    /// Showing the value.
    Display,
    /// A user gesture asked to edit; the editor is not open yet.
    EditRequested,
    /// The editor is open. `error` holds the last rejected commit's message.
    Editing { error: Option<String> },
}

/// A rendered cell: its renderer, the value it shows and its edit state.
pub struct CellContent {
    renderer: Box<dyn CellRenderer>,
    value: CellValue,
    state: CellState,
}

impl std::fmt::Debug for CellContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellContent")
            .field("renderer", &self.renderer.tag())
            .field("value", &self.value)
            .field("state", &self.state)
            .finish()
    }
}

impl CellContent {
    pub fn new(renderer: Box<dyn CellRenderer>, value: CellValue) -> Self {
        Self {
            renderer,
            value,
            state: CellState::Display,
        }
    }

    pub fn state(&self) -> &CellState {
        &self.state
    }

    /// Value currently displayed. Unchanged while editing.
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn tag(&self) -> RendererTag {
        self.renderer.tag()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, CellState::Editing { .. })
    }

    /// Message of the last rejected commit, if the editor is still open.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CellState::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Draws the cell content for its current state.
    pub fn view(&self) -> Element {
        match &self.state {
            CellState::Display | CellState::EditRequested => self.renderer.render(&self.value),
            CellState::Editing { error } => {
                let view = self.renderer.edit_view().data("editing", true);
                match error {
                    Some(message) => view.data("error", message),
                    None => view,
                }
            }
        }
    }

    /// Handles an edit gesture. Returns `false` if the renderer cannot edit.
    pub fn request_edit(&mut self) -> bool {
        if !self.renderer.supports_editing() {
            return false;
        }
        if self.state == CellState::Display {
            self.state = CellState::EditRequested;
        }
        true
    }

    /// Opens the editor, seeded with the current value.
    pub fn begin_edit(&mut self) -> bool {
        if self.state != CellState::EditRequested {
            return self.is_editing();
        }
        self.renderer.enter_edit(&self.value);
        self.state = CellState::Editing { error: None };
        debug!("Editor opened ({})", self.renderer.tag());
        true
    }

    /// Applies one input to the open editor. Clears a shown error.
    pub fn input(&mut self, input: EditInput) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.renderer.input(input);
        self.state = CellState::Editing { error: None };
        true
    }

    /// Asks the renderer for the value to commit.
    pub fn pending_value(&mut self) -> Option<Result<CellValue, String>> {
        self.is_editing().then(|| self.renderer.commit())
    }

    /// Keeps the editor open and shows why the commit failed.
    pub fn reject(&mut self, message: impl Into<String>) {
        if self.is_editing() {
            self.state = CellState::Editing {
                error: Some(message.into()),
            };
        }
    }

    /// Closes the editor after the value was written to the table.
    pub fn complete_commit(&mut self, value: CellValue) {
        self.renderer.cancel();
        self.value = value;
        self.state = CellState::Display;
    }

    /// Closes the editor, discarding the pending value.
    pub fn cancel(&mut self) {
        if self.state != CellState::Display {
            self.renderer.cancel();
            self.state = CellState::Display;
            debug!("Edit cancelled ({})", self.renderer.tag());
        }
    }

    /// Shows a new value from the table. An open editor keeps its text.
    pub fn update_value(&mut self, value: CellValue) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Swaps in a renderer built by a newly registered factory.
    ///
    /// An open editor is closed first.
    pub fn replace_renderer(&mut self, renderer: Box<dyn CellRenderer>) {
        self.cancel();
        self.renderer.destroy();
        self.renderer = renderer;
    }

    /// Destroys the renderer.
    pub fn release(mut self) {
        self.renderer.cancel();
        self.renderer.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{SparklineRenderer, TextRenderer};

    fn text(value: &str) -> CellContent {
        CellContent::new(Box::new(TextRenderer::new()), CellValue::from(value))
    }

    #[test]
    fn test_escape_keeps_value() {
        let mut cell = text("abc");
        assert!(cell.request_edit());
        assert_eq!(cell.state(), &CellState::EditRequested);
        assert!(cell.begin_edit());
        cell.input(EditInput::Type('d'));
        assert_eq!(cell.view().attr("value"), Some("abcd"));

        cell.cancel();
        assert_eq!(cell.state(), &CellState::Display);
        assert_eq!(cell.view().text_content(), "abc");
    }

    #[test]
    fn test_commit_flow() {
        let mut cell = text("abc");
        cell.request_edit();
        cell.begin_edit();
        cell.input(EditInput::SetText("abcd".into()));
        let value = cell.pending_value().unwrap().unwrap();
        cell.complete_commit(value);
        assert_eq!(cell.value(), &CellValue::from("abcd"));
        assert_eq!(cell.view().text_content(), "abcd");
    }

    #[test]
    fn test_reject_keeps_editor_open() {
        let mut cell = text("abc");
        cell.request_edit();
        cell.begin_edit();
        cell.reject("Bad value");
        assert_eq!(cell.error(), Some("Bad value"));
        assert_eq!(cell.view().attr("error"), Some("Bad value"));

        // Typing clears the message
        cell.input(EditInput::Type('x'));
        assert_eq!(cell.error(), None);
        assert!(cell.is_editing());
    }

    #[test]
    fn test_begin_requires_request() {
        let mut cell = text("abc");
        assert!(!cell.begin_edit());
        assert!(!cell.input(EditInput::Type('x')));
        assert!(cell.pending_value().is_none());
    }

    #[test]
    fn test_read_only_renderer() {
        let mut cell = CellContent::new(Box::new(SparklineRenderer::new()), "1,2".into());
        assert!(!cell.request_edit());
        assert_eq!(cell.state(), &CellState::Display);
    }

    #[test]
    fn test_replace_renderer_closes_editor() {
        let mut cell = text("abc");
        cell.request_edit();
        cell.begin_edit();
        cell.replace_renderer(Box::new(SparklineRenderer::new()));
        assert_eq!(cell.state(), &CellState::Display);
        assert_eq!(cell.tag(), RendererTag::Sparkline);
    }
}
