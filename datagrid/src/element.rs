//! Visual element tree produced by the grid.
//!
//! The grid does not draw anything itself. Every render pass produces an
//! [`Element`] tree that a host maps onto its own widgets (DOM nodes, terminal
//! cells, ...). Rows carry stable ids from a recycling pool so the host can
//! reuse the same native node when a row scrolls out and another scrolls in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// What an element represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Grid root.
    Grid,
    /// Header row.
    Header,
    /// One header cell.
    HeaderCell,
    /// Scrollable body holding the rendered rows.
    Body,
    /// One data row.
    Row,
    /// One data cell.
    Cell,
    /// Static text.
    Text,
    /// Checkbox indicator.
    Checkbox,
    /// Drop-down control.
    Select,
    /// Text-like input control.
    Input,
    /// Inline chart.
    Sparkline,
    /// Pagination footer.
    Pagination,
    /// Notification banner.
    Notification,
    /// Host-defined kind, used by custom renderers.
    Custom(String),
}

/// Element content.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    #[default]
    None,
    Text(String),
    Children(Vec<Element>),
}

/// A node in the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    pub content: Content,
    /// Free-form attributes (`width`, `sort`, `error`, ...).
    pub data: HashMap<String, String>,
    pub focused: bool,
    pub disabled: bool,
}

impl Element {
    fn with_kind(kind: ElementKind, prefix: &str) -> Self {
        Self {
            id: generate_id(prefix),
            kind,
            content: Content::None,
            data: HashMap::new(),
            focused: false,
            disabled: false,
        }
    }

    pub fn new(kind: ElementKind) -> Self {
        Self::with_kind(kind, "el")
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::with_kind(ElementKind::Text, "text").content(content)
    }

    pub fn cell() -> Self {
        Self::with_kind(ElementKind::Cell, "cell")
    }

    pub fn row() -> Self {
        Self::with_kind(ElementKind::Row, "row")
    }

    pub fn custom(kind: impl Into<String>) -> Self {
        Self::with_kind(ElementKind::Custom(kind.into()), "custom")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    // Content
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }

    // Attributes
    pub fn data(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.data.insert(key.into(), value.to_string());
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Returns an attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Returns the child elements, if any.
    pub fn child_elements(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children,
            _ => &[],
        }
    }

    /// Concatenates all text in this subtree, depth first.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.content {
            Content::None => {}
            Content::Text(text) => out.push_str(text),
            Content::Children(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &root.content {
        for child in children {
            if let Some(found) = find_element(child, id) {
                return Some(found);
            }
        }
    }

    None
}
