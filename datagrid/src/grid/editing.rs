//! Inline editing.

use datagrid_core::{CellValue, RowId};
use log::debug;

use super::{Grid, GridEvent};
use crate::error::{GridError, ValidationError};
use crate::options::BlurBehavior;
use crate::renderer::EditInput;

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The value was written to the table.
    Committed(CellValue),
    /// The value was rejected; the editor stays open showing the message.
    Invalid(ValidationError),
}

impl Grid {
    /// Cell currently being edited, as row id and column field.
    pub fn editing(&self) -> Option<(RowId, &str)> {
        let (row, index) = self.editing?;
        self.columns.get(index).map(|c| (row, c.field()))
    }

    /// Opens the editor on a rendered cell.
    ///
    /// An edit already open on another cell is cancelled first.
    pub fn begin_edit(&mut self, row: RowId, field: &str) -> Result<(), GridError> {
        let index = self.column_index(field)?;
        if !self.options.editing.enabled || !self.columns[index].is_editable() {
            return Err(GridError::not_editable(field));
        }
        if self.editing == Some((row, index)) {
            return Ok(());
        }
        if self.editing.is_some() {
            self.cancel_edit()?;
        }

        let cell = self
            .surface
            .cell_mut(row, index)
            .ok_or_else(|| GridError::not_rendered(row, field))?;
        if !cell.request_edit() {
            return Err(GridError::not_editable(field));
        }
        cell.begin_edit();

        debug!("Editing {} '{}'", row, field);
        self.editing = Some((row, index));
        Ok(())
    }

    /// Sends one input to the open editor.
    pub fn edit_input(&mut self, input: EditInput) -> Result<(), GridError> {
        let (row, index) = self.editing.ok_or(GridError::NoActiveEdit)?;
        let cell = self
            .surface
            .cell_mut(row, index)
            .ok_or(GridError::NoActiveEdit)?;
        if !cell.input(input) {
            return Err(GridError::NoActiveEdit);
        }
        Ok(())
    }

    /// Validates the editor's value and writes it to the table.
    ///
    /// Rejected values keep the editor open with the message shown in the
    /// cell; they are reported as [`EditOutcome::Invalid`], not as errors.
    pub fn commit_edit(&mut self) -> Result<EditOutcome, GridError> {
        let (row, index) = self.editing.ok_or(GridError::NoActiveEdit)?;
        let field = self.field_name(index);

        let Some(pending) = self
            .surface
            .cell_mut(row, index)
            .and_then(|cell| cell.pending_value())
        else {
            self.editing = None;
            return Err(GridError::NoActiveEdit);
        };

        let checked = pending.and_then(|value| self.check_value(row, &field, index, value));
        let value = match checked {
            Ok(value) => value,
            Err(message) => {
                if let Some(cell) = self.surface.cell_mut(row, index) {
                    cell.reject(message.as_str());
                }
                let error = ValidationError::new(field.as_str(), row, message);
                debug!("{}", error);
                self.events.push_back(GridEvent::ValidationFailed(error.clone()));
                return Ok(EditOutcome::Invalid(error));
            }
        };

        let old = self.table.get_cell(row, &field)?;
        self.table.set_cell(row, &field, value.clone())?;
        if let Some(cell) = self.surface.cell_mut(row, index) {
            cell.complete_commit(value.clone());
        }
        self.editing = None;

        self.events.push_back(GridEvent::CellEdited {
            row,
            column: field,
            old,
            new: value.clone(),
        });
        self.tick()?;
        Ok(EditOutcome::Committed(value))
    }

    /// Coerces a pending value to the column type and runs the column's rules.
    fn check_value(
        &self,
        row: RowId,
        field: &str,
        index: usize,
        value: CellValue,
    ) -> Result<CellValue, String> {
        let kind = self.table.column_type(field).map_err(|e| e.to_string())?;
        let value = kind.coerce(field, value).map_err(|e| e.to_string())?;

        let Some(validator) = self.columns.get(index).map(|c| c.validator()) else {
            return Ok(value);
        };
        let others = if validator.needs_column_values() {
            self.table
                .row_ids()
                .iter()
                .filter(|id| **id != row)
                .filter_map(|id| self.table.get_cell(*id, field).ok())
                .collect()
        } else {
            Vec::new()
        };
        validator.validate(&value, &others)?;
        Ok(value)
    }

    /// Closes the editor without writing. The cell shows its prior value.
    pub fn cancel_edit(&mut self) -> Result<(), GridError> {
        let (row, index) = self.editing.take().ok_or(GridError::NoActiveEdit)?;
        if let Some(cell) = self.surface.cell_mut(row, index) {
            cell.cancel();
        }
        self.events.push_back(GridEvent::EditCancelled {
            row,
            column: self.field_name(index),
        });
        Ok(())
    }

    /// Handles the editor losing focus, as configured by `editing.blur`.
    ///
    /// Returns `None` when the edit was cancelled.
    pub fn blur_edit(&mut self) -> Result<Option<EditOutcome>, GridError> {
        match self.options.editing.blur {
            BlurBehavior::Commit => self.commit_edit().map(Some),
            BlurBehavior::Cancel => self.cancel_edit().map(|_| None),
        }
    }
}

#[cfg(test)]
mod tests {
    use datagrid_core::DataTable;

    use super::*;
    use crate::options::{ColumnOptions, GridOptions};
    use crate::renderer::CellState;
    use crate::validation::ValidationRule;

    fn grid(options: GridOptions) -> Grid {
        let table = DataTable::from_columns([
            ("name", vec![CellValue::from("abc"), CellValue::from("xyz")]),
            ("qty", vec![CellValue::from(1.0), CellValue::from(2.0)]),
        ])
        .unwrap();
        Grid::new(table, options).unwrap()
    }

    fn editable() -> GridOptions {
        GridOptions::new()
            .with_editing(true)
            .with_column(
                ColumnOptions::new("name")
                    .with_editable(true)
                    .with_rule(ValidationRule::unique()),
            )
            .with_column(ColumnOptions::new("qty").with_editable(true))
    }

    #[test]
    fn test_editing_disabled() {
        let mut grid = grid(GridOptions::new());
        let row = grid.table().row_ids()[0];
        assert_eq!(grid.begin_edit(row, "name"), Err(GridError::not_editable("name")));
        assert_eq!(grid.commit_edit(), Err(GridError::NoActiveEdit));
    }

    #[test]
    fn test_type_mismatch_is_inline() {
        let options = GridOptions::new()
            .with_editing(true)
            .with_column(ColumnOptions::new("qty").with_editable(true).with_renderer("text"));
        let mut grid = grid(options);
        let row = grid.table().row_ids()[0];
        grid.begin_edit(row, "qty").unwrap();
        grid.edit_input(EditInput::SetText("lots".into())).unwrap();

        let EditOutcome::Invalid(error) = grid.commit_edit().unwrap() else {
            panic!("expected a rejected commit");
        };
        assert!(error.message.contains("expects number"));
        assert_eq!(grid.editing(), Some((row, "qty")));
        assert_eq!(grid.get_cell(row, "qty").unwrap(), CellValue::from(1.0));
    }

    #[test]
    fn test_unique_rule() {
        let mut grid = grid(editable());
        let row = grid.table().row_ids()[0];
        grid.begin_edit(row, "name").unwrap();
        grid.edit_input(EditInput::SetText("xyz".into())).unwrap();
        let outcome = grid.commit_edit().unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Invalid(ValidationError::new("name", row, "Value must be unique"))
        );
        let state = grid.surface().cell(row, 0).map(|c| c.state().clone());
        assert_eq!(
            state,
            Some(CellState::Editing {
                error: Some("Value must be unique".into())
            })
        );

        // Unchanged value is not a duplicate of itself
        grid.edit_input(EditInput::SetText("abc".into())).unwrap();
        assert_eq!(
            grid.commit_edit().unwrap(),
            EditOutcome::Committed(CellValue::from("abc"))
        );
    }

    #[test]
    fn test_number_commit_coerces() {
        let mut grid = grid(editable());
        let row = grid.table().row_ids()[1];
        grid.begin_edit(row, "qty").unwrap();
        grid.edit_input(EditInput::SetText("7".into())).unwrap();
        assert_eq!(grid.commit_edit().unwrap(), EditOutcome::Committed(CellValue::Number(7.0)));
        assert_eq!(grid.snapshot().rows[1][1], "7");
    }

    #[test]
    fn test_blur_behaviour() {
        let mut grid = grid(editable().with_blur(BlurBehavior::Cancel));
        let row = grid.table().row_ids()[0];
        grid.begin_edit(row, "name").unwrap();
        grid.edit_input(EditInput::Type('!')).unwrap();
        assert_eq!(grid.blur_edit().unwrap(), None);
        assert_eq!(grid.get_cell(row, "name").unwrap(), CellValue::from("abc"));

        let mut grid = self::grid(editable());
        let row = grid.table().row_ids()[0];
        grid.begin_edit(row, "name").unwrap();
        grid.edit_input(EditInput::Type('!')).unwrap();
        assert!(matches!(grid.blur_edit().unwrap(), Some(EditOutcome::Committed(_))));
    }

    #[test]
    fn test_switching_cells_cancels_previous() {
        let mut grid = grid(editable());
        let ids = grid.table().row_ids().to_vec();
        grid.begin_edit(ids[0], "name").unwrap();
        grid.edit_input(EditInput::Type('!')).unwrap();
        grid.begin_edit(ids[1], "name").unwrap();

        assert_eq!(grid.editing(), Some((ids[1], "name")));
        assert_eq!(grid.surface().cell(ids[0], 0).map(|c| c.is_editing()), Some(false));
        assert!(grid
            .drain_events()
            .iter()
            .any(|e| matches!(e, GridEvent::EditCancelled { row, .. } if *row == ids[0])));
    }

    #[test]
    fn test_whole_table_change_cancels_open_edit() {
        let mut grid = grid(editable());
        let row = grid.table().row_ids()[0];
        grid.begin_edit(row, "name").unwrap();
        grid.edit_input(EditInput::Type('!')).unwrap();

        grid.deferred().push(|table: &mut DataTable| {
            table.add_row([("name", CellValue::from("new")), ("qty", CellValue::from(3.0))])?;
            Ok(())
        });
        grid.tick().unwrap();

        assert_eq!(grid.editing(), None);
        assert_eq!(grid.surface().cell(row, 0).map(|c| c.state().clone()), Some(CellState::Display));
        assert_eq!(grid.edit_input(EditInput::Type('?')), Err(GridError::NoActiveEdit));
        assert_eq!(grid.commit_edit(), Err(GridError::NoActiveEdit));
        assert_eq!(grid.get_cell(row, "name").unwrap(), CellValue::from("abc"));
        assert!(grid.drain_events().contains(&GridEvent::EditCancelled {
            row,
            column: "name".into()
        }));
    }

    #[test]
    fn test_deleting_earlier_column_cancels_edit() {
        let mut grid = grid(editable());
        let row = grid.table().row_ids()[0];
        grid.begin_edit(row, "qty").unwrap();

        grid.deferred().push(|table: &mut DataTable| {
            table.delete_column("name")?;
            Ok(())
        });
        grid.tick().unwrap();

        assert_eq!(grid.editing(), None);
        assert_eq!(grid.columns().len(), 1);
        assert_eq!(grid.commit_edit(), Err(GridError::NoActiveEdit));
        assert_eq!(grid.get_cell(row, "qty").unwrap(), CellValue::from(1.0));
        assert!(grid.drain_events().contains(&GridEvent::EditCancelled {
            row,
            column: "qty".into()
        }));
    }
}
