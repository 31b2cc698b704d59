//! Source-snippet rendering for lex and parse errors.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use flow_parse::ParseError;

/// Render `err` against `source` as an `ariadne` report, without colors.
///
/// `path` only labels the snippet; nothing is read from disk.
pub fn render_parse_error(path: &str, source: &str, err: &ParseError) -> String {
    let range = char_range(source, err.span.to_range());
    let mut out = Vec::new();

    let written = Report::build(ReportKind::Error, path, range.start)
        .with_config(Config::default().with_color(false))
        .with_message("syntax error")
        .with_label(Label::new((path, range)).with_message(&err.message))
        .finish()
        .write((path, Source::from(source.to_string())), &mut out);

    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        // Fall back to a bare message.
        Err(_) => format!("{path}:{}: {}\n", err.span, err.message),
    }
}

/// Convert a byte range into the char range `ariadne` indexes by.
fn char_range(source: &str, bytes: Range<usize>) -> Range<usize> {
    let to_char = |byte: usize| {
        let byte = byte.min(source.len());
        source
            .char_indices()
            .take_while(|(index, _)| *index < byte)
            .count()
    };
    let start = to_char(bytes.start);
    let end = to_char(bytes.end).max(start);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_ir::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_names_file_and_message() {
        let source = "let x = ;";
        let err = ParseError::new("expected expression, found `;`", Span::new(8, 9));
        let report = render_parse_error("main.flow", source, &err);

        assert!(report.contains("syntax error"), "{report}");
        assert!(report.contains("main.flow"), "{report}");
        assert!(report.contains("expected expression, found `;`"), "{report}");
        assert!(report.contains("let x = ;"), "{report}");
    }

    #[test]
    fn test_char_range_counts_chars() {
        let source = "\"é\" + x";
        // `x` starts at byte 7, char 6.
        assert_eq!(char_range(source, 7..8), 6..7);
    }

    #[test]
    fn test_char_range_clamps_past_end() {
        assert_eq!(char_range("abc", 3..10), 3..3);
        assert_eq!(char_range("abc", 5..2), 3..3);
    }
}
