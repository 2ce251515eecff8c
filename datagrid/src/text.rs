//! Plain-text rendering of a [`GridSnapshot`].
//!
//! Column widths are converted from pixels to terminal cells at
//! [`PIXELS_PER_CELL`] pixels per cell. Cells that do not fit are truncated
//! with an ellipsis.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::GridSnapshot;

/// Pixels per terminal cell.
pub const PIXELS_PER_CELL: u32 = 8;

const SEPARATOR: &str = " │ ";

/// Converts a pixel width to terminal cells, at least one.
pub fn cells_for(pixels: u32) -> usize {
    (pixels / PIXELS_PER_CELL).max(1) as usize
}

/// Cuts `s` to `width` cells, ending in `…` when shortened.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let target = width - 1;
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > target {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Truncates or pads `s` to exactly `width` cells.
pub fn fit(s: &str, width: usize) -> String {
    let mut out = truncate(s, width);
    let pad = width.saturating_sub(out.width());
    out.extend(std::iter::repeat_n(' ', pad));
    out
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let parts: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| fit(cells.get(i).map(String::as_str).unwrap_or(""), *w))
        .collect();
    parts.join(SEPARATOR).trim_end().to_string()
}

/// Renders the header, a rule, the rows, then the footer and notification.
pub fn render_text(snapshot: &GridSnapshot) -> String {
    let widths: Vec<usize> = snapshot.widths.iter().map(|w| cells_for(*w)).collect();

    let mut lines = vec![line(&snapshot.headers, &widths)];
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    lines.push(rule.join("─┼─"));
    lines.extend(snapshot.rows.iter().map(|row| line(row, &widths)));

    if let Some(footer) = &snapshot.footer {
        lines.push(String::new());
        lines.push(footer.clone());
    }
    if let Some(message) = &snapshot.notification {
        lines.push(format!("! {}", message));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_and_fit() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
        assert_eq!(fit("ab", 4), "ab  ");
        // Wide characters take two cells
        assert_eq!(fit("日本語", 5), "日本…");
    }

    #[test]
    fn test_cells_for() {
        assert_eq!(cells_for(100), 12);
        assert_eq!(cells_for(3), 1);
    }

    #[test]
    fn test_render_text() {
        let snapshot = GridSnapshot {
            headers: vec!["name ▲".into(), "qty".into()],
            widths: vec![48, 32],
            rows: vec![
                vec!["apple".into(), "3".into()],
                vec!["a very long name".into(), "12".into()],
            ],
            footer: Some("Page 1 of 1 (2 rows)".into()),
            notification: None,
        };

        let text = render_text(&snapshot);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "name ▲ │ qty");
        assert_eq!(lines[1], "───────┼─────");
        assert_eq!(lines[2], "apple  │ 3");
        assert_eq!(lines[3], "a ver… │ 12");
        assert_eq!(lines[5], "Page 1 of 1 (2 rows)");
    }
}
