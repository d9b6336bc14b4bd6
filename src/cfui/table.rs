//! Column alignment for key/value and tabular output.
//!
//! Width math runs on the visible text (ANSI codes stripped, wide glyphs counted twice),
//! so styled cells line up with plain ones.

use console::strip_ansi_codes;
use unicode_width::UnicodeWidthStr;

/// Display width of a cell, ignoring ANSI escapes.
pub fn visible_width(cell: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi_codes(cell).as_ref())
}

/// Lays out `rows` as aligned lines. Each column is as wide as its widest cell plus
/// `padding` spaces; the last column is never padded. Rows may be ragged.
pub fn format_rows(prefix: &str, rows: &[Vec<String>], padding: usize) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(visible_width(cell));
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::from(prefix);
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i + 1 < row.len() {
                    let fill = widths[i] - visible_width(cell) + padding;
                    line.push_str(&" ".repeat(fill));
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn aligns_columns_with_padding() {
        let lines = format_rows(
            "",
            &[row(&["name:", "dora"]), row(&["requested state:", "started"])],
            3,
        );
        assert_eq!(lines[0], "name:              dora");
        assert_eq!(lines[1], "requested state:   started");
    }

    #[test]
    fn ignores_ansi_when_measuring() {
        let bold = "\x1b[1mname:\x1b[0m".to_string();
        let lines = format_rows("", &[vec![bold, "a".into()], row(&["routes:", "b"])], 1);
        assert!(lines[0].ends_with("name:\x1b[0m   a"));
        assert_eq!(lines[1], "routes: b");
    }

    #[test]
    fn handles_ragged_rows_and_prefix() {
        let lines = format_rows("  ", &[row(&["#0", "running", "details"]), row(&["#1"])], 2);
        assert_eq!(lines[0], "  #0  running  details");
        assert_eq!(lines[1], "  #1");
    }

    #[test]
    fn counts_wide_characters() {
        assert_eq!(visible_width("日本"), 4);
    }
}
