//! Tag to factory mapping.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use super::{
    CellRenderer, CheckboxRenderer, DateInputRenderer, DateKind, NumberInputRenderer,
    RendererContext, RendererTag, SelectRenderer, SparklineRenderer, TextRenderer,
};
use crate::error::DuplicateRendererError;

/// Builds one renderer per rendered cell.
pub type RendererFactory = Arc<dyn Fn(&RendererContext) -> Box<dyn CellRenderer> + Send + Sync>;

/// Wraps a closure as a [`RendererFactory`].
pub fn factory<F>(f: F) -> RendererFactory
where
    F: Fn(&RendererContext) -> Box<dyn CellRenderer> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Maps renderer tags to factories.
///
/// Tags are never reassigned silently: registering a taken tag fails unless
/// the caller asks to overwrite it.
#[derive(Clone, Default)]
pub struct CellRendererRegistry {
    factories: HashMap<RendererTag, RendererFactory>,
}

impl fmt::Debug for CellRendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellRendererRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

impl CellRendererRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in renderers.
    pub fn with_builtins() -> Self {
        let mut factories: HashMap<RendererTag, RendererFactory> = HashMap::new();
        factories.insert(RendererTag::Text, factory(|_| Box::new(TextRenderer::new())));
        factories.insert(
            RendererTag::Checkbox,
            factory(|_| Box::new(CheckboxRenderer::new())),
        );
        factories.insert(
            RendererTag::Select,
            factory(|ctx| Box::new(SelectRenderer::new(ctx.choices.clone()))),
        );
        factories.insert(
            RendererTag::NumberInput,
            factory(|_| Box::new(NumberInputRenderer::new())),
        );
        factories.insert(
            RendererTag::DateInput,
            factory(|ctx| Box::new(DateInputRenderer::new(DateKind::Date, ctx.kind))),
        );
        factories.insert(
            RendererTag::DateTimeInput,
            factory(|ctx| Box::new(DateInputRenderer::new(DateKind::DateTime, ctx.kind))),
        );
        factories.insert(
            RendererTag::TimeInput,
            factory(|ctx| Box::new(DateInputRenderer::new(DateKind::Time, ctx.kind))),
        );
        factories.insert(
            RendererTag::Sparkline,
            factory(|_| Box::new(SparklineRenderer::new())),
        );
        Self { factories }
    }

    /// Registers a factory closure under a tag.
    ///
    /// Fails with [`DuplicateRendererError`] if the tag is taken and
    /// `overwrite` is `false`.
    pub fn register<F>(
        &mut self,
        tag: impl Into<RendererTag>,
        build: F,
        overwrite: bool,
    ) -> Result<(), DuplicateRendererError>
    where
        F: Fn(&RendererContext) -> Box<dyn CellRenderer> + Send + Sync + 'static,
    {
        self.register_factory(tag, factory(build), overwrite)
    }

    /// Registers a shared factory under a tag.
    pub fn register_factory(
        &mut self,
        tag: impl Into<RendererTag>,
        factory: RendererFactory,
        overwrite: bool,
    ) -> Result<(), DuplicateRendererError> {
        let tag = tag.into();
        if !overwrite && self.factories.contains_key(&tag) {
            return Err(DuplicateRendererError::new(tag.as_str()));
        }
        debug!("Registered renderer '{}' (overwrite: {})", tag, overwrite);
        self.factories.insert(tag, factory);
        Ok(())
    }

    /// Returns `true` if the tag has a factory.
    pub fn contains(&self, tag: &RendererTag) -> bool {
        self.factories.contains_key(tag)
    }

    /// Returns every registered tag, sorted by name.
    pub fn tags(&self) -> Vec<RendererTag> {
        let mut tags: Vec<RendererTag> = self.factories.keys().cloned().collect();
        tags.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        tags
    }

    /// Builds a renderer for a tag.
    ///
    /// Unknown tags fall back to the text renderer.
    pub fn create(&self, tag: &RendererTag, ctx: &RendererContext) -> Box<dyn CellRenderer> {
        if let Some(factory) = self.factories.get(tag) {
            return factory(ctx);
        }

        warn!("No renderer registered for '{}', using text", tag);
        match self.factories.get(&RendererTag::Text) {
            Some(factory) => factory(ctx),
            None => Box::new(TextRenderer::new()),
        }
    }
}
