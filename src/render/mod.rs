//! Rendering of templates into final text
//!
//! Rendering walks the buffer's compiled segments, copies literal text,
//! collapses escaped braces and substitutes each placeholder with its
//! argument formatted by a [`FormatProvider`]. Binding walks the same
//! segments but substitutes a parameter name instead of the value.

mod format;

pub use format::{FormatError, FormatProvider, InvariantFormatter};

use thiserror::Error;

use crate::argument::Argument;
use crate::buffer::{Segment, TemplateBuffer};
use crate::error::Span;

/// Errors that can occur while rendering a template
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The buffer references an argument that does not exist, only possible
    /// after manual buffer edits
    #[error("placeholder {{{index}}} at {span:?} refers to a missing argument ({count} stored)")]
    MissingArgument {
        index: usize,
        count: usize,
        span: Span,
    },

    /// A brace that is neither doubled nor part of a placeholder
    #[error("unescaped '{brace}' at offset {offset}")]
    StrayBrace { brace: char, offset: usize },

    /// The provider could not format an argument
    #[error("cannot format argument {index}: {source}")]
    Format {
        index: usize,
        #[source]
        source: FormatError,
    },
}

/// Walk the buffer, handing each placeholder to `substitute`
fn walk(
    buffer: &TemplateBuffer,
    arguments: &[Argument],
    mut substitute: impl FnMut(usize, &Argument, Option<&str>, &mut String) -> Result<(), RenderError>,
) -> Result<String, RenderError> {
    let text = buffer.as_str();
    let mut out = String::with_capacity(text.len());

    for segment in buffer.segments() {
        match segment {
            Segment::Literal(range) => out.push_str(&text[range.clone()]),
            Segment::Placeholder {
                index,
                format,
                span,
            } => {
                let argument = arguments.get(*index).ok_or_else(|| RenderError::MissingArgument {
                    index: *index,
                    count: arguments.len(),
                    span: span.clone(),
                })?;
                let format = format.as_ref().map(|range| &text[range.clone()]);
                substitute(*index, argument, format, &mut out)?;
            }
            Segment::StrayBrace { brace, offset } => {
                return Err(RenderError::StrayBrace {
                    brace: *brace,
                    offset: *offset,
                })
            }
        }
    }
    Ok(out)
}

/// Substitute every placeholder with its formatted argument.
///
/// The argument's own format specifier wins; the placeholder's format body
/// is used only for arguments stored without one.
pub fn render(
    buffer: &TemplateBuffer,
    arguments: &[Argument],
    provider: &dyn FormatProvider,
) -> Result<String, RenderError> {
    walk(buffer, arguments, |index, argument, placeholder_format, out| {
        let spec = argument.format.as_deref().or(placeholder_format);
        let text = provider
            .format(&argument.value, spec)
            .map_err(|source| RenderError::Format { index, source })?;
        out.push_str(&text);
        Ok(())
    })
}

/// Replace every placeholder with `naming(index)`, e.g. `@p0`, and collapse
/// escaped braces.
pub fn bind(
    buffer: &TemplateBuffer,
    arguments: &[Argument],
    mut naming: impl FnMut(usize) -> String,
) -> Result<String, RenderError> {
    walk(buffer, arguments, |index, _, _, out| {
        out.push_str(&naming(index));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Value;
    use pretty_assertions::assert_eq;

    fn args(values: &[(Value, Option<&str>)]) -> Vec<Argument> {
        values
            .iter()
            .map(|(v, f)| Argument::new(v.clone(), *f))
            .collect()
    }

    #[test]
    fn test_render_substitutes_and_unescapes() {
        let buffer = TemplateBuffer::from_format("{{ {0} }} = {1}");
        let arguments = args(&[(Value::from("a"), None), (Value::from(2), None)]);
        let text = render(&buffer, &arguments, &InvariantFormatter::default()).unwrap();
        assert_eq!(text, "{ a } = 2");
    }

    #[test]
    fn test_render_out_of_order() {
        let buffer = TemplateBuffer::from_format("{1} {0}");
        let arguments = args(&[(Value::from("x"), None), (Value::from("y"), None)]);
        let text = render(&buffer, &arguments, &InvariantFormatter::default()).unwrap();
        assert_eq!(text, "y x");
    }

    #[test]
    fn test_argument_format_wins_over_placeholder() {
        let buffer = TemplateBuffer::from_format("{0} {0:D4} {1:D4}");
        let arguments = args(&[(Value::from(255), Some("X")), (Value::from(7), None)]);
        let text = render(&buffer, &arguments, &InvariantFormatter::default()).unwrap();
        assert_eq!(text, "FF FF 0007");
    }

    #[test]
    fn test_missing_argument() {
        let buffer = TemplateBuffer::from_format("ab{3}");
        let err = render(&buffer, &[], &InvariantFormatter::default()).unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingArgument {
                index: 3,
                count: 0,
                span: 2..5
            }
        );
    }

    #[test]
    fn test_stray_brace() {
        let buffer = TemplateBuffer::from_format("a } b");
        let err = render(&buffer, &[], &InvariantFormatter::default()).unwrap_err();
        assert_eq!(err, RenderError::StrayBrace { brace: '}', offset: 2 });
    }

    #[test]
    fn test_format_error_names_argument() {
        let buffer = TemplateBuffer::from_format("{0}");
        let arguments = args(&[(Value::from(1.5), Some("D2"))]);
        let err = render(&buffer, &arguments, &InvariantFormatter::default()).unwrap_err();
        assert!(matches!(err, RenderError::Format { index: 0, .. }));
        assert_eq!(
            err.to_string(),
            "cannot format argument 0: format specifier 'D2' is not supported for float values"
        );
    }

    #[test]
    fn test_bind() {
        let buffer = TemplateBuffer::from_format("a={0} AND b={1:N2} AND {{c}}");
        let arguments = args(&[(Value::from(1), None), (Value::from(2.0), Some("N2"))]);
        let sql = bind(&buffer, &arguments, |i| format!("@p{i}")).unwrap();
        assert_eq!(sql, "a=@p0 AND b=@p1 AND {c}");
    }
}
