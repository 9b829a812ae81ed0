//! Fixed-width table rendering.
//!
//! Column widths are measured in terminal columns rather than chars: any code
//! point above 0x7F counts as two columns so that CJK text lines up.

use crate::grid::Row;

/// Placeholder printed for a grid without rows.
pub const EMPTY_SHEET: &str = "(empty sheet)";

/// Rendered width of `text`: ASCII counts 1, everything else counts 2.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if u32::from(c) <= 0x7F { 1 } else { 2 })
        .sum()
}

/// Per-column widths over a ragged set of rows.
#[must_use]
pub fn column_widths(rows: &[Row]) -> Vec<usize> {
    let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; max_cols];

    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            if let Some(value) = cell {
                *width = (*width).max(display_width(value));
            }
        }
    }

    widths
}

/// Render rows as a `+---+` bordered table. The first row is treated as a
/// header and gets its own separator underneath.
#[must_use]
pub fn render_table(rows: &[Row]) -> String {
    if rows.is_empty() {
        return format!("{EMPTY_SHEET}\n");
    }

    let widths = column_widths(rows);
    let separator = separator_line(&widths);

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');

    for (row_idx, row) in rows.iter().enumerate() {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(col_idx, &width)| {
                let value = row.get(col_idx).and_then(Option::as_deref).unwrap_or("");
                let padding = width.saturating_sub(display_width(value));
                format!(" {value}{} ", " ".repeat(padding))
            })
            .collect();

        out.push('|');
        out.push_str(&cells.join("|"));
        out.push_str("|\n");

        if row_idx == 0 {
            out.push_str(&separator);
            out.push('\n');
        }
    }

    out.push_str(&separator);
    out.push('\n');
    out
}

fn separator_line(widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[Option<&str>]) -> Row {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("月"), 2);
        assert_eq!(display_width("12月"), 4);
        assert_eq!(display_width("é"), 2);
    }

    #[test]
    fn test_wide_and_narrow_share_width() {
        assert_eq!(display_width("表"), display_width("ab"));
        let widths = column_widths(&[row(&[Some("表")]), row(&[Some("ab")])]);
        assert_eq!(widths, vec![2]);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_table(&[]), "(empty sheet)\n");
    }

    #[test]
    fn test_render_single_row_has_header_rule() {
        let rendered = render_table(&[row(&[Some("12月")])]);
        assert_eq!(rendered, "+------+\n| 12月 |\n+------+\n+------+\n");
    }

    #[test]
    fn test_render_ragged_rows() {
        let rows = vec![
            row(&[Some("name"), Some("city")]),
            row(&[Some("太郎")]),
            row(&[None, Some("NYC")]),
        ];
        let expected = "\
+------+------+
| name | city |
+------+------+
| 太郎 |      |
|      | NYC  |
+------+------+
";
        assert_eq!(render_table(&rows), expected);
    }

    #[test]
    fn test_render_column_of_absent_values() {
        let rendered = render_table(&[row(&[None, Some("x")])]);
        assert_eq!(rendered, "+--+---+\n|  | x |\n+--+---+\n+--+---+\n");
    }
}
