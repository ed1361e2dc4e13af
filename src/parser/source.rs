//! Inputs the parser accepts

use crate::argument::Value;
use crate::error::ParseError;
use crate::template::Template;

/// Something that can be appended to a [`Template`]
///
/// [`FormatSource`] goes through the placeholder scanner; a `Vec<Fragment>`
/// is already split into literals and arguments and skips scanning.
pub trait TemplateSource {
    /// Append the parsed content to `target`.
    ///
    /// On error `target` may hold part of the content.
    /// [`Template::append_source`] parses into a scratch template first and
    /// never leaves partial content behind.
    fn append_to(self, target: &mut Template) -> Result<(), ParseError>;
}

/// A value embedded in a format string
///
/// Plain values become arguments. Templates and nested sources are
/// flattened into the outer template in place of their placeholder.
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    Template(Template),
    Source(FormatSource),
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<Template> for Arg {
    fn from(t: Template) -> Self {
        Arg::Template(t)
    }
}

impl From<FormatSource> for Arg {
    fn from(s: FormatSource) -> Self {
        Arg::Source(s)
    }
}

macro_rules! arg_from_value {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Arg {
                fn from(v: $source) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )+
    };
}

arg_from_value!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String, &str,
    &String, Box<str>
);

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Arg::Value(v.into())
    }
}

/// A composite format string with its positional arguments, not yet parsed
///
/// The format uses `{N}` / `{N:format}` placeholders and `{{` / `}}` for
/// literal braces. Build one with [`FormatSource::new`] or
/// [`format_source!`](crate::format_source).
#[derive(Debug, Clone)]
pub struct FormatSource {
    format: String,
    args: Vec<Arg>,
}

impl FormatSource {
    pub fn new(format: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            format: format.into(),
            args,
        }
    }

    /// Add another positional argument
    pub fn with_arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

impl TemplateSource for FormatSource {
    fn append_to(self, target: &mut Template) -> Result<(), ParseError> {
        super::parse_append(&self, target)
    }
}

/// A pre-split piece of a template
#[derive(Debug, Clone)]
pub enum Fragment {
    /// Literal text, escaped on append
    Literal(String),
    /// An embedded value and its optional format specifier
    Argument { value: Arg, format: Option<String> },
}

impl Fragment {
    pub fn literal(text: impl Into<String>) -> Self {
        Fragment::Literal(text.into())
    }

    pub fn argument(value: impl Into<Arg>, format: Option<&str>) -> Self {
        Fragment::Argument {
            value: value.into(),
            format: format.map(str::to_string),
        }
    }
}

impl TemplateSource for Vec<Fragment> {
    fn append_to(self, target: &mut Template) -> Result<(), ParseError> {
        for fragment in self {
            match fragment {
                Fragment::Literal(text) => {
                    target.append_literal(&text);
                }
                Fragment::Argument { value, format } => {
                    super::append_arg(target, value, format.as_deref())?;
                }
            }
        }
        Ok(())
    }
}

impl TemplateSource for Template {
    fn append_to(self, target: &mut Template) -> Result<(), ParseError> {
        target.append(self);
        Ok(())
    }
}

/// Build a [`FormatSource`] from a format string and positional arguments
///
/// ```rust
/// use interpolated_text::{format_source, Template};
///
/// let template = Template::parse(format_source!("id = {0} AND name = {1}", 42, "ann")).unwrap();
/// assert_eq!(template.format(), "id = {0} AND name = {1}");
/// assert_eq!(template.argument_count(), 2);
/// ```
#[macro_export]
macro_rules! format_source {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::FormatSource::new($format, vec![$($crate::Arg::from($arg)),*])
    };
}
