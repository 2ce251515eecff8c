//! Columns: one table field plus its display state.

use datagrid_core::modifier::Direction;
use datagrid_core::{ColumnType, DataTable};

use crate::error::GridError;
use crate::options::{ColumnDefaults, ColumnOptions, GridOptions};
use crate::renderer::{RendererContext, RendererTag};
use crate::resizing::WidthSpec;
use crate::validation::ColumnValidator;

/// Width used when neither the column nor the container says otherwise.
pub const DEFAULT_WIDTH: u32 = 100;

/// A displayed column.
#[derive(Debug, Clone)]
pub struct Column {
    field: String,
    header: String,
    kind: ColumnType,
    width: u32,
    min_width: u32,
    max_width: Option<u32>,
    sortable: bool,
    editable: bool,
    resizable: bool,
    renderer: RendererTag,
    choices: Vec<String>,
    validator: ColumnValidator,
    sort: Option<Direction>,
}

impl Column {
    /// Builds a column from its options, falling back to `defaults`.
    ///
    /// `share` is the width used when neither the column nor the defaults
    /// set one.
    pub fn from_options(
        options: &ColumnOptions,
        defaults: &ColumnDefaults,
        kind: ColumnType,
        share: u32,
    ) -> Result<Self, GridError> {
        let min_width = options.min_width.unwrap_or(defaults.min_width);
        let max_width = options.max_width.or(defaults.max_width);
        let mut column = Self {
            field: options.field.clone(),
            header: options
                .header
                .clone()
                .unwrap_or_else(|| options.field.clone()),
            kind,
            width: 0,
            min_width,
            max_width,
            sortable: options.sortable.unwrap_or(defaults.sortable),
            editable: options.editable.unwrap_or(defaults.editable),
            resizable: options.resizable.unwrap_or(defaults.resizable),
            renderer: options
                .renderer_type
                .clone()
                .unwrap_or_else(|| RendererTag::infer(kind)),
            choices: options.options.clone(),
            validator: ColumnValidator::new(&options.validation)?,
            sort: None,
        };
        column.set_width(options.width.or(defaults.width).unwrap_or(share));
        Ok(column)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Declared type of the underlying table column.
    pub fn kind(&self) -> ColumnType {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    pub fn max_width(&self) -> Option<u32> {
        self.max_width
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn renderer(&self) -> &RendererTag {
        &self.renderer
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn validator(&self) -> &ColumnValidator {
        &self.validator
    }

    pub fn sort(&self) -> Option<Direction> {
        self.sort
    }

    pub(crate) fn set_sort(&mut self, sort: Option<Direction>) {
        self.sort = sort;
    }

    /// Sets the width, clamped to the column's bounds.
    pub fn set_width(&mut self, width: u32) {
        self.width = self.width_spec().clamp(i64::from(width));
    }

    /// Sets a width computed by a resize strategy or restored from a snapshot.
    pub(crate) fn apply_width(&mut self, width: u32) {
        self.width = width;
    }

    /// Width and bounds for the resizing strategies.
    pub fn width_spec(&self) -> WidthSpec {
        let spec = WidthSpec::new(
            self.width,
            self.min_width,
            self.max_width.unwrap_or(u32::MAX),
        );
        if self.resizable { spec } else { spec.fixed() }
    }

    /// What a renderer factory is told about this column.
    pub fn renderer_context(&self) -> RendererContext {
        RendererContext::new(self.field.as_str(), self.kind).with_choices(self.choices.clone())
    }
}

/// Sort state after a header click: none, ascending, descending, none.
pub fn next_sort(current: Option<Direction>) -> Option<Direction> {
    match current {
        None => Some(Direction::Asc),
        Some(Direction::Asc) => Some(Direction::Desc),
        Some(Direction::Desc) => None,
    }
}

/// Builds the grid's columns for a table.
///
/// With no configured columns, every table field gets a column in table
/// order. Columns without a width share `containerWidth` evenly, or get
/// [`DEFAULT_WIDTH`].
pub fn build_columns(table: &DataTable, options: &GridOptions) -> Result<Vec<Column>, GridError> {
    let configured: Vec<ColumnOptions> = if options.columns.is_empty() {
        table.column_names().into_iter().map(ColumnOptions::new).collect()
    } else {
        options.columns.clone()
    };

    let share = match options.rendering.container_width {
        Some(width) if !configured.is_empty() => {
            let fixed: u32 = configured.iter().filter_map(|c| c.width).sum();
            let flexible = configured.iter().filter(|c| c.width.is_none()).count() as u32;
            width.saturating_sub(fixed) / flexible.max(1)
        }
        _ => DEFAULT_WIDTH,
    };

    configured
        .iter()
        .map(|column| {
            let kind = table.column_type(&column.field)?;
            Column::from_options(column, &options.column_defaults, kind, share)
        })
        .collect()
}
