//! Grid configuration.
//!
//! Options deserialize from camelCase JSON with every field optional, and can
//! also be built in code with the `with_*` methods.
//!
//! # Example
//!
//! ```
//! use datagrid::options::GridOptions;
//! use datagrid::resizing::ResizingMode;
//!
//! let options = GridOptions::from_json(
//!     r#"{
//!         "resizing": "distributed",
//!         "pagination": { "enabled": true, "pageSize": 20 },
//!         "columns": [{ "field": "name", "editable": true }]
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(options.resizing, ResizingMode::Distributed);
//! assert_eq!(options.pagination.page_size, 20);
//! assert_eq!(options.rendering.row_height, 36);
//! ```

use serde::Deserialize;
use serde::Serialize;

use crate::renderer::RendererTag;
use crate::resizing::ResizingMode;
use crate::validation::ValidationRule;

/// Top-level grid options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Column list. Empty means one column per table field, in table order.
    pub columns: Vec<ColumnOptions>,
    /// Defaults applied to columns that leave a setting unset.
    pub column_defaults: ColumnDefaults,
    /// Column resizing strategy.
    pub resizing: ResizingMode,
    pub pagination: PaginationOptions,
    pub rendering: RenderingOptions,
    pub editing: EditingOptions,
}

impl GridOptions {
    /// Creates options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Adds a column.
    pub fn with_column(mut self, column: ColumnOptions) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the column defaults.
    pub fn with_column_defaults(mut self, defaults: ColumnDefaults) -> Self {
        self.column_defaults = defaults;
        self
    }

    /// Sets the resizing mode.
    pub fn with_resizing(mut self, mode: ResizingMode) -> Self {
        self.resizing = mode;
        self
    }

    /// Enables pagination with a page size.
    pub fn with_pagination(mut self, page_size: usize) -> Self {
        self.pagination.enabled = true;
        self.pagination.page_size = page_size;
        self
    }

    /// Sets the rendering options.
    pub fn with_rendering(mut self, rendering: RenderingOptions) -> Self {
        self.rendering = rendering;
        self
    }

    /// Enables inline editing.
    pub fn with_editing(mut self, enabled: bool) -> Self {
        self.editing.enabled = enabled;
        self
    }

    /// Sets what happens when an editing cell loses focus.
    pub fn with_blur(mut self, blur: BlurBehavior) -> Self {
        self.editing.blur = blur;
        self
    }
}

/// Settings for one column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnOptions {
    /// Table field the column shows.
    pub field: String,
    /// Header label. Defaults to the field name.
    pub header: Option<String>,
    pub width: Option<u32>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    pub sortable: Option<bool>,
    pub editable: Option<bool>,
    pub resizable: Option<bool>,
    /// Renderer tag. Inferred from the column type when unset.
    pub renderer_type: Option<RendererTag>,
    /// Choices for `select` columns.
    pub options: Vec<String>,
    /// Validation rules applied on edit commit.
    pub validation: Vec<ValidationRule>,
}

impl ColumnOptions {
    /// Creates options for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_width = Some(min);
        self.max_width = Some(max);
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn with_renderer(mut self, tag: impl Into<RendererTag>) -> Self {
        self.renderer_type = Some(tag.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }
}

/// Column settings used when a column leaves them unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnDefaults {
    pub width: Option<u32>,
    pub min_width: u32,
    pub max_width: Option<u32>,
    pub sortable: bool,
    pub editable: bool,
    pub resizable: bool,
}

impl Default for ColumnDefaults {
    fn default() -> Self {
        Self {
            width: None,
            min_width: 20,
            max_width: None,
            sortable: true,
            editable: false,
            resizable: true,
        }
    }
}

/// Pagination settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationOptions {
    pub enabled: bool,
    pub page_size: usize,
    /// Initial zero-based page.
    pub page: usize,
    /// Sizes offered to the user.
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            page_size: 10,
            page: 0,
            page_size_options: vec![10, 20, 50, 100],
        }
    }
}

/// Rendering and virtualization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderingOptions {
    /// Row height in pixels.
    pub row_height: u32,
    /// Visible body height in pixels.
    pub viewport_height: u32,
    /// Available width. Columns without a width share it evenly.
    pub container_width: Option<u32>,
    pub virtualization: bool,
    /// Pages with at most this many rows are rendered in full.
    pub virtualization_threshold: usize,
    /// Extra rows rendered above and below the viewport.
    pub buffer_size: usize,
}

impl Default for RenderingOptions {
    fn default() -> Self {
        Self {
            row_height: 36,
            viewport_height: 400,
            container_width: None,
            virtualization: true,
            virtualization_threshold: 50,
            buffer_size: 10,
        }
    }
}

impl RenderingOptions {
    pub fn with_row_height(mut self, row_height: u32) -> Self {
        self.row_height = row_height;
        self
    }

    pub fn with_viewport_height(mut self, viewport_height: u32) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    pub fn with_container_width(mut self, width: u32) -> Self {
        self.container_width = Some(width);
        self
    }

    pub fn with_virtualization(mut self, enabled: bool) -> Self {
        self.virtualization = enabled;
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.virtualization_threshold = threshold;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

/// What a blur does to an open editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurBehavior {
    #[default]
    Commit,
    Cancel,
}

/// Inline editing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditingOptions {
    pub enabled: bool,
    pub blur: BlurBehavior,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GridOptions::from_json("{}").unwrap();
        assert_eq!(options.resizing, ResizingMode::Adjacent);
        assert!(!options.pagination.enabled);
        assert_eq!(options.pagination.page_size, 10);
        assert_eq!(options.pagination.page_size_options, vec![10, 20, 50, 100]);
        assert_eq!(options.rendering, RenderingOptions::default());
        assert_eq!(options.column_defaults.min_width, 20);
        assert!(options.column_defaults.sortable);
        assert!(!options.editing.enabled);
        assert_eq!(options.editing.blur, BlurBehavior::Commit);
    }

    #[test]
    fn test_column_options_from_json() {
        let options = GridOptions::from_json(
            r#"{
                "columns": [
                    { "field": "status", "rendererType": "select", "options": ["open", "closed"] },
                    { "field": "chart", "rendererType": "sparkline", "minWidth": 80 },
                    { "field": "rating", "rendererType": "stars" }
                ],
                "editing": { "enabled": true, "blur": "cancel" }
            }"#,
        )
        .unwrap();

        assert_eq!(options.columns[0].renderer_type, Some(RendererTag::Select));
        assert_eq!(options.columns[0].options, vec!["open", "closed"]);
        assert_eq!(options.columns[1].min_width, Some(80));
        assert_eq!(
            options.columns[2].renderer_type,
            Some(RendererTag::Custom("stars".to_string()))
        );
        assert_eq!(options.editing.blur, BlurBehavior::Cancel);
    }

    #[test]
    fn test_builders() {
        let options = GridOptions::new()
            .with_pagination(25)
            .with_editing(true)
            .with_column(ColumnOptions::new("a").with_width(120).with_editable(true));
        assert!(options.pagination.enabled);
        assert_eq!(options.pagination.page_size, 25);
        assert_eq!(options.columns[0].width, Some(120));
    }
}
