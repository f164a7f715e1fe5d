//! Markdown table extraction.
//!
//! A table is a header row, a separator row made of dashes and colons, and
//! at least one data row. Every row starts and ends with `|`:
//!
//! ```text
//! | Ratio | FY24 |
//! |-------|-----:|
//! | EV / EBITDA | 177x |
//! ```
//!
//! Everything around a table is kept verbatim as text.

use ad_protocol::report_models::ContentPart;

/// Split `text` into prose and tables, in order of appearance.
///
/// Text with no table comes back as a single [`ContentPart::Text`] holding
/// the whole input. Otherwise empty text between or around tables is
/// omitted.
pub fn split_tables(text: &str) -> Vec<ContentPart> {
    let lines = line_spans(text);
    let mut parts = Vec::new();
    let mut cursor = 0;
    let mut index = 0;

    while index < lines.len() {
        let Some((end, table)) = match_table(&lines, index) else {
            index += 1;
            continue;
        };

        push_text(&mut parts, &text[cursor..lines[index].start]);
        parts.push(table);

        let last = &lines[end - 1];
        cursor = last.start + last.raw.len();
        index = end;
    }

    if parts.is_empty() {
        return vec![ContentPart::text(text)];
    }
    push_text(&mut parts, &text[cursor..]);
    parts
}

struct Line<'a> {
    start: usize,
    /// Including the line terminator.
    raw: &'a str,
    /// Trimmed, without the terminator.
    content: &'a str,
}

fn line_spans(text: &str) -> Vec<Line<'_>> {
    let mut start = 0;
    text.split_inclusive('\n')
        .map(|raw| {
            let line = Line {
                start,
                raw,
                content: raw.trim(),
            };
            start += raw.len();
            line
        })
        .collect()
}

/// Try to match a table whose header is `lines[index]`.
///
/// Returns the index one past the last data row and the parsed table.
fn match_table(lines: &[Line<'_>], index: usize) -> Option<(usize, ContentPart)> {
    let header = lines.get(index)?;
    let separator = lines.get(index + 1)?;
    if !is_row(header.content) || is_separator(header.content) || !is_separator(separator.content) {
        return None;
    }

    let mut end = index + 2;
    while lines.get(end).is_some_and(|line| is_row(line.content)) {
        end += 1;
    }
    if end == index + 2 {
        return None;
    }

    let headers = cells(header.content);
    let rows = lines[index + 2..end]
        .iter()
        .map(|line| cells(line.content))
        .collect();

    Some((end, ContentPart::Table { headers, rows }))
}

fn is_row(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

fn is_separator(line: &str) -> bool {
    is_row(line)
        && line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

fn cells(row: &str) -> Vec<String> {
    row.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

fn push_text(parts: &mut Vec<ContentPart>, text: &str) {
    if !text.is_empty() {
        parts.push(ContentPart::text(text));
    }
}

/// Lay out a table as plain text: header, a rule, then one line per row.
///
/// Columns are padded to their widest cell and separated by `│`. Rows
/// shorter than the widest row are padded with empty cells.
pub fn align_table(headers: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in std::iter::once(headers).chain(rows.iter().map(Vec::as_slice)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{cell:<width$}")
            })
            .collect();
        padded.join(" │ ")
    };

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers));
    lines.push(rule.join("─┼─"));
    lines.extend(rows.iter().map(|row| format_row(row)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_table_pads_ragged_rows() {
        let lines = align_table(
            &["A".to_string(), "B".to_string()],
            &[
                vec!["1".to_string()],
                vec!["22".to_string(), "3".to_string(), "x".to_string()],
            ],
        );
        assert_eq!(lines[0], "A  │ B │  ");
        assert_eq!(lines[1], "───┼───┼──");
        assert_eq!(lines[2], "1  │   │  ");
        assert_eq!(lines[3], "22 │ 3 │ x");
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> ContentPart {
        ContentPart::Table {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_single_table_with_prefix_and_suffix() {
        let parts = split_tables("Intro\n|A|B|\n|-|-|\n|1|2|\nOutro");
        assert_eq!(
            parts,
            vec![
                ContentPart::text("Intro\n"),
                table(&["A", "B"], &[&["1", "2"]]),
                ContentPart::text("Outro"),
            ]
        );
    }

    #[test]
    fn test_table_only_has_no_text_parts() {
        let parts = split_tables("| A | B |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |");
        assert_eq!(parts, vec![table(&["A", "B"], &[&["1", "2"], &["3", "4"]])]);
    }

    #[test]
    fn test_no_table_returns_whole_input() {
        let text = "Debt rose.\nCoverage | fell\n\n- point";
        assert_eq!(split_tables(text), vec![ContentPart::text(text)]);
        assert_eq!(split_tables(""), vec![ContentPart::text("")]);
    }

    #[test]
    fn test_header_without_data_rows_is_text() {
        let text = "| A | B |\n|---|---|\nno rows here";
        assert_eq!(split_tables(text), vec![ContentPart::text(text)]);
    }

    #[test]
    fn test_multiple_tables_in_order() {
        let text = "one\n|A|\n|-|\n|1|\n\nmiddle\n|B|C|\n|---|---|\n|2|3|\n";
        let parts = split_tables(text);
        assert_eq!(
            parts,
            vec![
                ContentPart::text("one\n"),
                table(&["A"], &[&["1"]]),
                ContentPart::text("\nmiddle\n"),
                table(&["B", "C"], &[&["2", "3"]]),
            ]
        );
    }

    #[test]
    fn test_empty_cells_are_dropped() {
        let parts = split_tables("| Rule | | GMR |\n|---|---|---|\n| Coverage |  | 0.71x |");
        assert_eq!(
            parts,
            vec![table(&["Rule", "GMR"], &[&["Coverage", "0.71x"]])]
        );
    }

    #[test]
    fn test_crlf_and_indented_rows() {
        let parts = split_tables("x\r\n  | A | B |\r\n  |---|---|\r\n  | 1 | 2 |\r\ny");
        assert_eq!(
            parts,
            vec![
                ContentPart::text("x\r\n"),
                table(&["A", "B"], &[&["1", "2"]]),
                ContentPart::text("y"),
            ]
        );
    }

    #[test]
    fn test_rendering_text_again_is_stable() {
        let text = "plain prose without tables";
        let first = split_tables(text);
        let ContentPart::Text { content } = &first[0] else {
            panic!("expected text");
        };
        assert_eq!(split_tables(content), first);
    }
}
