//! Parser turning format strings and fragments into template content

pub mod multiline;
pub mod scanner;
pub mod shift;
mod source;

use std::borrow::Cow;

use tracing::trace;

pub use multiline::adjust_multiline;
pub use shift::{remap_placeholders, shift_format, shift_placeholders};
pub use source::{Arg, FormatSource, Fragment, TemplateSource};

use crate::error::ParseError;
use crate::template::Template;
use scanner::{scan, Piece};

/// Parse `source` and append it to `target`.
///
/// Literal runs are appended as literal text under `target`'s escaping
/// option. Escaped braces in the source are literal braces; stray braces and
/// malformed placeholders are literal text too. A placeholder naming a
/// missing argument is an error, and whatever was appended before it stays.
pub fn parse_append(source: &FormatSource, target: &mut Template) -> Result<(), ParseError> {
    let format = if target.options().auto_adjust_multiline {
        adjust_multiline(source.format())
    } else {
        Cow::Borrowed(source.format())
    };
    let args = source.args();

    for piece in scan(&format) {
        match piece {
            Piece::Literal(text) => {
                target.append_literal(text);
            }
            // without escaping, literals are appended raw and must stay doubled
            Piece::EscapedBrace(brace) if !target.options().auto_escape_curly_braces => {
                target.append_raw(if brace == '{' { "{{" } else { "}}" });
            }
            Piece::EscapedBrace(brace) | Piece::StrayBrace { brace, .. } => {
                target.append_literal(brace.encode_utf8(&mut [0; 4]));
            }
            Piece::Placeholder(p) => {
                let arg = args
                    .get(p.index)
                    .ok_or_else(|| ParseError::argument_index(p.index, args.len(), p.span.clone()))?;
                trace!(index = p.index, format = ?p.format, "placeholder");
                append_arg(target, arg.clone(), p.format)?;
            }
        }
    }
    Ok(())
}

/// Append one embedded value: merge templates, parse nested sources, record
/// plain values as arguments.
pub(crate) fn append_arg(
    target: &mut Template,
    arg: Arg,
    format: Option<&str>,
) -> Result<(), ParseError> {
    match arg {
        Arg::Template(template) => {
            target.append(template);
        }
        Arg::Source(nested) => {
            let mut scratch = Template::with_options(target.options().clone());
            parse_append(&nested, &mut scratch)?;
            target.append(scratch);
        }
        Arg::Value(value) => {
            target.append_argument(value, format);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Value;
    use crate::options::TemplateOptions;
    use pretty_assertions::assert_eq;

    fn parse(source: FormatSource) -> Template {
        let mut target = Template::with_options(TemplateOptions::default());
        parse_append(&source, &mut target).unwrap();
        target
    }

    #[test]
    fn test_literals_and_arguments() {
        let t = parse(FormatSource::new("Hello {0}!", vec![Arg::from("World")]));
        assert_eq!(t.format(), "Hello {0}!");
        assert_eq!(t.argument(0), Some(&Value::from("World")));
    }

    #[test]
    fn test_argument_reused_by_index_is_added_twice() {
        let t = parse(FormatSource::new("{0} {0}", vec![Arg::from(1)]));
        assert_eq!(t.format(), "{0} {1}");
        assert_eq!(t.argument_count(), 2);
    }

    #[test]
    fn test_out_of_order_source_is_renumbered_in_order_of_appearance() {
        let t = parse(FormatSource::new("{1} {0}", vec![Arg::from("a"), Arg::from("b")]));
        assert_eq!(t.format(), "{0} {1}");
        assert_eq!(t.argument(0), Some(&Value::from("b")));
    }

    #[test]
    fn test_format_specifier_is_kept() {
        let t = parse(FormatSource::new("{0:X4}", vec![Arg::from(255)]));
        assert_eq!(t.format(), "{0:X4}");
        assert_eq!(t.argument_format(0), Some("X4"));
    }

    #[test]
    fn test_braces_in_source_become_escaped_literals() {
        let t = parse(FormatSource::new("{{x}} {y} }", vec![]));
        assert_eq!(t.format(), "{{x}} {{y}} }}");
        assert_eq!(t.argument_count(), 0);
    }

    #[test]
    fn test_escaped_braces_survive_with_escaping_disabled() {
        let options = TemplateOptions::default().with_auto_escape_curly_braces(false);

        let mut t = Template::with_options(options.clone());
        parse_append(&FormatSource::new("a {{0}} b {0}", vec![Arg::from(1)]), &mut t).unwrap();
        assert_eq!(t.format(), "a {{0}} b {0}");
        assert_eq!(t.argument_count(), 1);
        assert_eq!(t.render().unwrap(), "a {0} b 1");

        let mut t = Template::with_options(options);
        parse_append(&FormatSource::new("{{x}}", vec![]), &mut t).unwrap();
        assert_eq!(t.format(), "{{x}}");
        assert_eq!(t.render().unwrap(), "{x}");
    }

    #[test]
    fn test_missing_argument_is_an_error() {
        let mut target = Template::with_options(TemplateOptions::default());
        let err = parse_append(&FormatSource::new("a {0} b {2}", vec![Arg::from(1)]), &mut target)
            .unwrap_err();
        assert_eq!(err, ParseError::argument_index(2, 1, 8..11));
    }

    #[test]
    fn test_raw_format_inlines_value() {
        let t = parse(FormatSource::new("ORDER BY {0:raw}", vec![Arg::from("name")]));
        assert_eq!(t.format(), "ORDER BY name");
        assert_eq!(t.argument_count(), 0);
    }

    #[test]
    fn test_nested_source_is_flattened() {
        let inner = FormatSource::new("b={0}", vec![Arg::from(2)]);
        let t = parse(FormatSource::new(
            "a={0} AND {1}",
            vec![Arg::from(1), Arg::from(inner)],
        ));
        assert_eq!(t.format(), "a={0} AND b={1}");
        assert_eq!(t.argument(1), Some(&Value::from(2)));
    }

    #[test]
    fn test_nested_template_is_merged() {
        let inner = parse(FormatSource::new("{0}-{1}", vec![Arg::from("x"), Arg::from("y")]));
        let t = parse(FormatSource::new("{0} [{1}]", vec![Arg::from(0), Arg::from(inner)]));
        assert_eq!(t.format(), "{0} [{1}-{2}]");
        assert_eq!(t.argument_count(), 3);
    }

    #[test]
    fn test_fragments_skip_scanning() {
        let mut t = Template::with_options(TemplateOptions::default());
        vec![
            Fragment::literal("x = {"),
            Fragment::argument(7, Some("D3")),
            Fragment::literal("}"),
        ]
        .append_to(&mut t)
        .unwrap();
        assert_eq!(t.format(), "x = {{{0:D3}}}");
    }

    #[test]
    fn test_multiline_adjustment_when_enabled() {
        let options = TemplateOptions::default().with_auto_adjust_multiline(true);
        let mut t = Template::with_options(options);
        let source = FormatSource::new("\n    SELECT {0}\n    FROM t", vec![Arg::from(1)]);
        parse_append(&source, &mut t).unwrap();
        assert_eq!(t.format(), "SELECT {0}\nFROM t");
    }
}
