//! Interpolated Text - Deferred, composable text templates
//!
//! A [`Template`] keeps literal text and positional arguments apart until it
//! is rendered. Templates can be built from format strings with `{N}` /
//! `{N:format}` placeholders, from pre-split fragments, or call by call, and
//! merged into one another with placeholders renumbered automatically. The
//! arguments stay available separately, e.g. to bind them as SQL parameters.
//!
//! # Example
//!
//! ```rust
//! use interpolated_text::{format_source, Template};
//!
//! let filter = Template::parse(format_source!("age > {0}", 30)).unwrap();
//! let query = Template::parse(format_source!(
//!     "SELECT name FROM users WHERE {0} AND city = {1}",
//!     filter,
//!     "Oslo"
//! ))
//! .unwrap();
//!
//! assert_eq!(query.format(), "SELECT name FROM users WHERE age > {0} AND city = {1}");
//! assert_eq!(query.render().unwrap(), "SELECT name FROM users WHERE age > 30 AND city = Oslo");
//! ```

pub mod argument;
pub mod buffer;
pub mod error;
pub mod options;
pub mod parser;
pub mod render;
pub mod template;

pub use argument::{Argument, ArgumentComparer, CustomValue, DefaultComparer, Value};
pub use buffer::{BoundsError, TemplateBuffer};
pub use error::ParseError;
pub use options::{OptionsError, TemplateOptions};
pub use parser::{Arg, FormatSource, Fragment, TemplateSource};
pub use render::{FormatError, FormatProvider, InvariantFormatter, RenderError};
pub use template::{Template, RAW_FORMAT};

use thiserror::Error;

/// Any error produced by this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Error while parsing a format string
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Offset outside the template text
    #[error("bounds error: {0}")]
    Bounds(#[from] BoundsError),

    /// Error while rendering
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Error loading options
    #[error("options error: {0}")]
    Options(#[from] OptionsError),
}

/// Parse and render a format source in one step with the default options
///
/// ```rust
/// use interpolated_text::{format_source, interpolate};
///
/// let text = interpolate(format_source!("{0} + {1} = {2:D3}", 1, 2, 3)).unwrap();
/// assert_eq!(text, "1 + 2 = 003");
/// ```
pub fn interpolate(source: impl TemplateSource) -> Result<String, Error> {
    let template = Template::parse(source)?;
    Ok(template.render()?)
}
