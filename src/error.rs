//! Error types for parsing format strings

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A placeholder names an argument the source does not supply
    #[error("placeholder {{{index}}} at {span:?} refers to a missing argument ({count} supplied)")]
    ArgumentIndex {
        index: usize,
        count: usize,
        span: Span,
    },
}

impl ParseError {
    /// Create an argument index error
    pub fn argument_index(index: usize, count: usize, span: Span) -> Self {
        Self::ArgumentIndex { index, count, span }
    }

    /// Get the source span of the offending placeholder
    pub fn span(&self) -> &Span {
        match self {
            Self::ArgumentIndex { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// `source` must be the text that was scanned. When multiline adjustment
    /// is enabled that is the adjusted text, not the original literal.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::ArgumentIndex { index, count, span } => {
                let span = char_span(source, span);
                let hint = match count {
                    0 => "no arguments were supplied".to_string(),
                    1 => "only argument 0 exists".to_string(),
                    n => format!("valid indices are 0..={}", n - 1),
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(format!("argument index {} is out of range", index))
                    .with_label(
                        Label::new((filename, span))
                            .with_message(hint)
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// ariadne counts characters, spans count bytes
fn char_span(source: &str, span: &Span) -> Span {
    let clamp = |offset: usize| {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        source[..offset].chars().count()
    };
    clamp(span.start)..clamp(span.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_index_display() {
        let err = ParseError::argument_index(3, 1, 6..9);
        assert_eq!(
            err.to_string(),
            "placeholder {3} at 6..9 refers to a missing argument (1 supplied)"
        );
    }

    #[test]
    fn test_format_report_mentions_index() {
        let err = ParseError::argument_index(2, 2, 4..7);
        let report = err.format("abc {2}", "query");
        assert!(report.contains("argument index 2 is out of range"));
        assert!(report.contains("valid indices are 0..=1"));
        assert!(report.contains("query"));
    }

    #[test]
    fn test_char_span_counts_characters() {
        let source = "héllo {1}";
        let start = source.find('{').unwrap();
        assert_eq!(char_span(source, &(start..start + 3)), 6..9);
    }
}
