//! Inline bar chart of a list of numbers.

use datagrid_core::CellValue;

use super::{CellRenderer, RendererTag};
use crate::element::{Element, ElementKind};

const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Reads the numbers in a cell.
///
/// Accepts a single number or text such as `"1, 2, 3"`, `"[1,2,3]"` or
/// `"1 2 3"`. Tokens that are not numbers are skipped.
pub fn parse_points(value: &CellValue) -> Vec<f64> {
    match value {
        CellValue::Number(n) => vec![*n],
        CellValue::String(s) => s
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(|token| token.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .collect(),
        CellValue::Null | CellValue::Bool(_) => Vec::new(),
    }
}

/// Draws points as block glyphs scaled between their minimum and maximum.
pub fn sparkline(points: &[f64]) -> String {
    let min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (GLYPHS.len() - 1) as f64;

    points
        .iter()
        .map(|p| {
            if span <= 0.0 {
                GLYPHS[GLYPHS.len() / 2]
            } else {
                GLYPHS[(((p - min) / span) * top).round() as usize]
            }
        })
        .collect()
}

/// Read-only sparkline renderer.
#[derive(Debug, Default)]
pub struct SparklineRenderer;

impl SparklineRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl CellRenderer for SparklineRenderer {
    fn tag(&self) -> RendererTag {
        RendererTag::Sparkline
    }

    fn render(&self, value: &CellValue) -> Element {
        let points = parse_points(value);
        Element::new(ElementKind::Sparkline)
            .content(sparkline(&points))
            .data("points", points.len())
    }

    fn supports_editing(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_points() {
        assert_eq!(parse_points(&"[1, 2,3]".into()), vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_points(&"4 x 5".into()), vec![4.0, 5.0]);
        assert_eq!(parse_points(&7.0.into()), vec![7.0]);
        assert!(parse_points(&CellValue::Null).is_empty());
    }

    #[test]
    fn test_scaling() {
        assert_eq!(sparkline(&[0.0, 7.0]), "▁█");
        assert_eq!(sparkline(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]), "▁▂▃▄▅▆▇█");
        assert_eq!(sparkline(&[3.0, 3.0]), "▅▅");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_not_editable() {
        let mut renderer = SparklineRenderer::new();
        assert!(!renderer.supports_editing());
        assert!(renderer.commit().is_err());
        assert_eq!(renderer.render(&"1,2".into()).attr("points"), Some("2"));
    }
}
