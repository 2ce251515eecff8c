//! Number and date/time input renderers.
//!
//! Date-like renderers accept typed text in the usual HTML input formats.
//! A number column stores the result as epoch milliseconds (milliseconds
//! since midnight for times); any other column stores the canonical text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use datagrid_core::value::format_number;
use datagrid_core::{CellValue, ColumnType};

use super::{CellRenderer, EditBuffer, EditInput, RendererTag};
use crate::element::{Element, ElementKind};

// =============================================================================
// Numbers
// =============================================================================

/// Right-aligned number display with a numeric text input.
#[derive(Debug, Default)]
pub struct NumberInputRenderer {
    buffer: Option<EditBuffer>,
}

impl NumberInputRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CellRenderer for NumberInputRenderer {
    fn tag(&self) -> RendererTag {
        RendererTag::NumberInput
    }

    fn render(&self, value: &CellValue) -> Element {
        let text = match value.to_number_lossy() {
            Some(n) => format_number(n),
            None => value.to_string(),
        };
        Element::text(text).data("align", "right")
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
        self.buffer
            .clone()
            .unwrap_or_default()
            .view()
            .data("type", "number")
    }

    fn commit(&mut self) -> Result<CellValue, String> {
        let Some(buffer) = &self.buffer else {
            return Err(String::from("No edit in progress"));
        };
        let text = buffer.text().trim();
        if text.is_empty() {
            return Ok(CellValue::Null);
        }
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(CellValue::Number(n)),
            _ => Err(format!("'{}' is not a number", text)),
        }
    }

    fn cancel(&mut self) {
        self.buffer = None;
    }

    fn destroy(&mut self) {
        self.buffer = None;
    }
}

// =============================================================================
// Dates and times
// =============================================================================

/// Which part of a timestamp an input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    Date,
    DateTime,
    Time,
}

impl DateKind {
    fn tag(self) -> RendererTag {
        match self {
            DateKind::Date => RendererTag::DateInput,
            DateKind::DateTime => RendererTag::DateTimeInput,
            DateKind::Time => RendererTag::TimeInput,
        }
    }

    fn input_type(self) -> &'static str {
        match self {
            DateKind::Date => "date",
            DateKind::DateTime => "datetime-local",
            DateKind::Time => "time",
        }
    }

    /// Parses typed text into epoch milliseconds.
    fn parse_millis(self, text: &str) -> Option<i64> {
        match self {
            DateKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis()),
            DateKind::DateTime => [
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%d %H:%M",
            ]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(|dt| dt.and_utc().timestamp_millis()),
            DateKind::Time => ["%H:%M:%S", "%H:%M"]
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
                .map(|t| {
                    i64::from(t.num_seconds_from_midnight()) * 1000
                        + i64::from(t.nanosecond() / 1_000_000)
                }),
        }
    }

    /// Formats epoch milliseconds in this kind's canonical form.
    fn format_millis(self, millis: i64) -> Option<String> {
        match self {
            DateKind::Date => {
                DateTime::from_timestamp_millis(millis).map(|dt| dt.format("%Y-%m-%d").to_string())
            }
            DateKind::DateTime => DateTime::from_timestamp_millis(millis)
                .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string()),
            DateKind::Time => {
                let secs = u32::try_from(millis.div_euclid(1000).rem_euclid(86_400)).ok()?;
                NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
                    .map(|t| t.format("%H:%M").to_string())
            }
        }
    }
}

/// Date, date-time or time input.
#[derive(Debug)]
pub struct DateInputRenderer {
    kind: DateKind,
    storage: ColumnType,
    buffer: Option<EditBuffer>,
}

impl DateInputRenderer {
    /// Creates an input writing into a column of type `storage`.
    pub fn new(kind: DateKind, storage: ColumnType) -> Self {
        Self {
            kind,
            storage,
            buffer: None,
        }
    }

    pub fn kind(&self) -> DateKind {
        self.kind
    }

    /// Canonical text for a stored value, or `None` if it cannot be read.
    fn display_text(&self, value: &CellValue) -> Option<String> {
        match value {
            CellValue::Number(n) => self.kind.format_millis(n.trunc() as i64),
            CellValue::String(s) => {
                let millis = self.kind.parse_millis(s.trim())?;
                self.kind.format_millis(millis)
            }
            CellValue::Null | CellValue::Bool(_) => None,
        }
    }
}

impl CellRenderer for DateInputRenderer {
    fn tag(&self) -> RendererTag {
        self.kind.tag()
    }

    fn render(&self, value: &CellValue) -> Element {
        let text = self
            .display_text(value)
            .unwrap_or_else(|| value.to_string());
        Element::text(text)
    }

    fn enter_edit(&mut self, value: &CellValue) {
        let text = self.display_text(value).unwrap_or_default();
        self.buffer = Some(EditBuffer::new(text));
    }

    fn input(&mut self, input: EditInput) {
        if let Some(buffer) = &mut self.buffer {
            buffer.apply(&input);
        }
    }

    fn edit_view(&self) -> Element {
        self.buffer
            .clone()
            .unwrap_or_default()
            .view()
            .data("type", self.kind.input_type())
    }

    fn commit(&mut self) -> Result<CellValue, String> {
        let Some(buffer) = &self.buffer else {
            return Err(String::from("No edit in progress"));
        };
        let text = buffer.text().trim();
        if text.is_empty() {
            return Ok(CellValue::Null);
        }

        let millis = self
            .kind
            .parse_millis(text)
            .ok_or_else(|| format!("'{}' is not a valid {}", text, self.kind.input_type()))?;

        match self.storage {
            ColumnType::Number => Ok(CellValue::Number(millis as f64)),
            _ => self
                .kind
                .format_millis(millis)
                .map(CellValue::String)
                .ok_or_else(|| format!("'{}' is out of range", text)),
        }
    }

    fn cancel(&mut self) {
        self.buffer = None;
    }

    fn destroy(&mut self) {
        self.buffer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(renderer: &mut dyn CellRenderer, start: CellValue, text: &str) -> Result<CellValue, String> {
        renderer.enter_edit(&start);
        renderer.input(EditInput::SetText(text.to_string()));
        renderer.commit()
    }

    #[test]
    fn test_number_input() {
        let mut renderer = NumberInputRenderer::new();
        assert_eq!(renderer.render(&CellValue::from(3.0)).text_content(), "3");
        assert_eq!(commit(&mut renderer, 1.0.into(), " 2.5 "), Ok(CellValue::Number(2.5)));
        assert_eq!(commit(&mut renderer, 1.0.into(), ""), Ok(CellValue::Null));
        assert!(commit(&mut renderer, 1.0.into(), "abc").is_err());
    }

    #[test]
    fn test_date_into_number_column() {
        let mut renderer = DateInputRenderer::new(DateKind::Date, ColumnType::Number);
        let value = commit(&mut renderer, CellValue::Null, "1970-01-02").unwrap();
        assert_eq!(value, CellValue::Number(86_400_000.0));
        assert_eq!(renderer.render(&value).text_content(), "1970-01-02");
    }

    #[test]
    fn test_datetime_into_string_column() {
        let mut renderer = DateInputRenderer::new(DateKind::DateTime, ColumnType::String);
        let value = commit(&mut renderer, CellValue::Null, "2024-03-05 14:30:00").unwrap();
        assert_eq!(value, CellValue::from("2024-03-05T14:30"));
    }

    #[test]
    fn test_time_input() {
        let mut renderer = DateInputRenderer::new(DateKind::Time, ColumnType::Number);
        let value = commit(&mut renderer, CellValue::Null, "01:30").unwrap();
        assert_eq!(value, CellValue::Number(5_400_000.0));
        assert_eq!(renderer.render(&value).text_content(), "01:30");
    }

    #[test]
    fn test_invalid_date() {
        let mut renderer = DateInputRenderer::new(DateKind::Date, ColumnType::String);
        let err = commit(&mut renderer, CellValue::Null, "2024-02-30").unwrap_err();
        assert!(err.contains("not a valid date"));
    }

    #[test]
    fn test_seeded_from_stored_text() {
        let mut renderer = DateInputRenderer::new(DateKind::Date, ColumnType::String);
        renderer.enter_edit(&CellValue::from("2024-01-31"));
        assert_eq!(renderer.edit_view().attr("value"), Some("2024-01-31"));
        assert_eq!(renderer.render(&CellValue::from("soon")).text_content(), "soon");
    }
}
