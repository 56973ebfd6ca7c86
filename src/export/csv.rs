//! Delimited text export
//!
//! Every field is quoted and embedded quotes are doubled, so commas, quotes
//! and newlines inside values survive a re-import.

use tracing::debug;

use super::row::{ExportRow, COLUMNS};

/// Renders rows as comma-separated text
///
/// Produces the header line followed by one line per row, joined with `\n`
/// and without a trailing newline. An empty slice yields just the header.
pub fn render_delimited_text(rows: &[ExportRow]) -> Vec<u8> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(COLUMNS.join(","));

    for row in rows {
        let fields: Vec<String> = row.raw_cells().iter().map(|v| escape_field(v)).collect();
        lines.push(fields.join(","));
    }

    debug!("Rendered delimited text: {} data lines", rows.len());
    lines.join("\n").into_bytes()
}

/// Wraps a value in quotes, doubling any quote inside it
fn escape_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayLocale, TaskRecord};
    use proptest::prelude::*;

    /// Splits one record into fields, honouring quotes
    fn parse_record(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, in_quotes) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                ('"', _) => in_quotes = !in_quotes,
                (',', false) => fields.push(std::mem::take(&mut field)),
                _ => field.push(c),
            }
        }
        fields.push(field);
        fields
    }

    fn row(title: &str) -> ExportRow {
        ExportRow::from_task(&TaskRecord::new(title), &DisplayLocale::default())
    }

    #[test]
    fn empty_rows_yield_header_only() {
        let out = String::from_utf8(render_delimited_text(&[])).unwrap();
        assert_eq!(out, "Title,Subject,Priority,Status,Deadline");
    }

    #[test]
    fn every_field_is_quoted() {
        let task = TaskRecord::new("Plain").with_subject("Math");
        let rows = vec![ExportRow::from_task(&task, &DisplayLocale::default())];

        let out = String::from_utf8(render_delimited_text(&rows)).unwrap();
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], r#""Plain","Math","medium","pending","""#);
    }

    #[test]
    fn quotes_and_commas_round_trip() {
        let title = r#"Read "Chapter 1", pls"#;
        let out = String::from_utf8(render_delimited_text(&[row(title)])).unwrap();
        let line = out.lines().nth(1).unwrap();

        assert_eq!(line, r#""Read ""Chapter 1"", pls","","medium","pending","""#);
        assert_eq!(parse_record(line)[0], title);
    }

    #[test]
    fn missing_subject_is_empty_not_placeholder() {
        let out = String::from_utf8(render_delimited_text(&[row("x")])).unwrap();
        let fields = parse_record(out.lines().nth(1).unwrap());
        assert_eq!(fields[1], "");
        assert_eq!(fields[4], "");
    }

    #[test]
    fn no_trailing_newline() {
        let out = render_delimited_text(&[row("a"), row("b")]);
        assert_ne!(out.last(), Some(&b'\n'));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }

    proptest! {
        #[test]
        fn any_single_line_title_round_trips(title in "[^\r\n]*") {
            let out = String::from_utf8(render_delimited_text(&[row(&title)])).unwrap();
            let line = out.split('\n').nth(1).unwrap();
            let fields = parse_record(line);
            prop_assert_eq!(fields.len(), 5);
            prop_assert_eq!(&fields[0], &title);
        }
    }
}
