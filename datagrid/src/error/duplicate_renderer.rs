//! Renderer registration errors

/// A renderer tag was registered twice without asking to overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("A renderer is already registered for '{tag}'")]
pub struct DuplicateRendererError {
    /// The tag that was already taken.
    pub tag: String,
}

impl DuplicateRendererError {
    /// Creates a new duplicate renderer error.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}
