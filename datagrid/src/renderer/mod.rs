//! Cell renderers.
//!
//! A column's renderer tag selects a factory in the
//! [`CellRendererRegistry`]. The factory builds one [`CellRenderer`] per
//! rendered cell; the renderer draws the cell's value and, for editable
//! columns, runs the interactive control while the cell is being edited.
//!
//! Hosts add their own renderers by registering a factory under a new tag.
//!
//! # Example
//!
//! ```
//! use datagrid::element::Element;
//! use datagrid::renderer::{CellRenderer, CellRendererRegistry, RendererTag};
//! use datagrid_core::CellValue;
//!
//! struct Stars;
//!
//! impl CellRenderer for Stars {
//!     fn tag(&self) -> RendererTag {
//!         RendererTag::custom("stars")
//!     }
//!
//!     fn render(&self, value: &CellValue) -> Element {
//!         let n = value.as_number().unwrap_or(0.0).clamp(0.0, 5.0) as usize;
//!         Element::text("*".repeat(n))
//!     }
//!
//!     fn supports_editing(&self) -> bool {
//!         false
//!     }
//! }
//!
//! let mut registry = CellRendererRegistry::with_builtins();
//! registry
//!     .register("stars", |_ctx| Box::new(Stars), false)
//!     .unwrap();
//! assert!(registry.contains(&RendererTag::custom("stars")));
//! ```

mod checkbox;
mod content;
mod input;
mod registry;
mod select;
mod sparkline;
mod text;

pub use checkbox::CheckboxRenderer;
pub use content::{CellContent, CellState};
pub use input::{DateInputRenderer, DateKind, NumberInputRenderer};
pub use registry::{CellRendererRegistry, RendererFactory, factory};
pub use select::SelectRenderer;
pub use sparkline::SparklineRenderer;
pub use text::{EditBuffer, TextRenderer};

use std::fmt;
use std::str::FromStr;

use datagrid_core::{CellValue, ColumnType};
use serde::Deserialize;
use serde::Serialize;

use crate::element::Element;

// =============================================================================
// Tags
// =============================================================================

/// Identifies a renderer factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RendererTag {
    Text,
    Checkbox,
    Select,
    DateInput,
    DateTimeInput,
    TimeInput,
    NumberInput,
    Sparkline,
    /// A host-registered tag.
    Custom(String),
}

impl RendererTag {
    /// Creates a tag from any string, mapping built-in names to their variants.
    pub fn custom(tag: impl Into<String>) -> Self {
        Self::from(tag.into())
    }

    /// Returns the tag's string form.
    pub fn as_str(&self) -> &str {
        match self {
            RendererTag::Text => "text",
            RendererTag::Checkbox => "checkbox",
            RendererTag::Select => "select",
            RendererTag::DateInput => "date-input",
            RendererTag::DateTimeInput => "datetime-input",
            RendererTag::TimeInput => "time-input",
            RendererTag::NumberInput => "number-input",
            RendererTag::Sparkline => "sparkline",
            RendererTag::Custom(tag) => tag,
        }
    }

    /// Picks a tag for a column type.
    pub fn infer(kind: ColumnType) -> Self {
        match kind {
            ColumnType::Boolean => RendererTag::Checkbox,
            ColumnType::Number => RendererTag::NumberInput,
            ColumnType::String | ColumnType::Any => RendererTag::Text,
        }
    }

    /// Returns `true` for tags the grid ships with.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, RendererTag::Custom(_))
    }
}

impl From<String> for RendererTag {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => RendererTag::Text,
            "checkbox" => RendererTag::Checkbox,
            "select" => RendererTag::Select,
            "date-input" => RendererTag::DateInput,
            "datetime-input" => RendererTag::DateTimeInput,
            "time-input" => RendererTag::TimeInput,
            "number-input" => RendererTag::NumberInput,
            "sparkline" => RendererTag::Sparkline,
            _ => RendererTag::Custom(tag),
        }
    }
}

impl From<&str> for RendererTag {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<RendererTag> for String {
    fn from(tag: RendererTag) -> Self {
        match tag {
            RendererTag::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for RendererTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for RendererTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Renderer contract
// =============================================================================

/// What a factory knows about the column it builds a renderer for.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererContext {
    /// Column field name.
    pub field: String,
    /// Declared type of the column in the table.
    pub kind: ColumnType,
    /// Choices configured for the column.
    pub choices: Vec<String>,
}

impl RendererContext {
    pub fn new(field: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            field: field.into(),
            kind,
            choices: Vec::new(),
        }
    }

    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }
}

/// One user input applied to an open editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditInput {
    /// Replaces the editor text.
    SetText(String),
    /// Types one character at the end.
    Type(char),
    /// Removes the last character.
    Backspace,
    /// Flips a boolean control.
    Toggle,
    /// Chooses an option by index.
    Select(usize),
}

/// The per-cell renderer capability set.
///
/// Only `tag` and `render` are required. Editable renderers override the
/// editing hooks; the defaults describe a read-only renderer.
pub trait CellRenderer: Send + Sync {
    /// Tag this renderer was registered under.
    fn tag(&self) -> RendererTag;

    /// Draws a value for display.
    fn render(&self, value: &CellValue) -> Element;

    /// Whether the renderer can edit values.
    fn supports_editing(&self) -> bool {
        true
    }

    /// Seeds the editor with the current value.
    fn enter_edit(&mut self, _value: &CellValue) {}

    /// Applies one input to the editor.
    fn input(&mut self, _input: EditInput) {}

    /// Draws the open editor.
    fn edit_view(&self) -> Element {
        Element::text("")
    }

    /// Produces the value to write, or a message explaining why it cannot.
    fn commit(&mut self) -> Result<CellValue, String> {
        Err(String::from("This cell cannot be edited"))
    }

    /// Discards the editor's pending value.
    fn cancel(&mut self) {}

    /// Releases whatever the renderer holds before it is dropped.
    fn destroy(&mut self) {}
}
