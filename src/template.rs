//! The template builder
//!
//! A [`Template`] pairs a [`TemplateBuffer`] with the [`ArgumentStore`] its
//! placeholders index into. Every mutating operation works in place and
//! returns `&mut Self`, so calls chain:
//!
//! ```rust
//! use interpolated_text::{format_source, Template};
//!
//! let mut query = Template::new();
//! query
//!     .append_literal("SELECT * FROM users WHERE ")
//!     .append_source(format_source!("id = {0}", 7))
//!     .unwrap()
//!     .append_source_if(true, format_source!(" AND name = {0}", "ann"))
//!     .unwrap();
//!
//! assert_eq!(query.format(), "SELECT * FROM users WHERE id = {0} AND name = {1}");
//! assert_eq!(query.render().unwrap(), "SELECT * FROM users WHERE id = 7 AND name = ann");
//! ```
//!
//! Merging another template renumbers its placeholders so they keep pointing
//! at the same values. With [`reuse_identical_arguments`] enabled, merged
//! arguments that equal an existing one share its slot.
//!
//! [`reuse_identical_arguments`]: TemplateOptions::reuse_identical_arguments

use std::ops::AddAssign;

use tracing::debug;

use crate::argument::{Argument, ArgumentStore, Value};
use crate::buffer::{BoundsError, TemplateBuffer};
use crate::error::ParseError;
use crate::options::TemplateOptions;
use crate::parser::scanner::placeholders;
use crate::parser::{remap_placeholders, shift_placeholders, TemplateSource};
use crate::render::{self, FormatProvider, InvariantFormatter, RenderError};

/// Format specifier that inlines a value's text instead of recording it
pub const RAW_FORMAT: &str = "raw";

/// Literal text with numbered placeholders and the arguments they reference
#[derive(Debug, Clone)]
pub struct Template {
    buffer: TemplateBuffer,
    arguments: ArgumentStore,
    options: TemplateOptions,
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

impl Template {
    /// Create an empty template using the process-wide default options
    pub fn new() -> Self {
        Self::with_options(TemplateOptions::process_default().clone())
    }

    /// Create an empty template with its own copy of `options`
    pub fn with_options(options: TemplateOptions) -> Self {
        Self {
            buffer: TemplateBuffer::new(),
            arguments: ArgumentStore::new(),
            options,
        }
    }

    /// Parse `source` into a new template with the default options
    pub fn parse(source: impl TemplateSource) -> Result<Self, ParseError> {
        Self::parse_with_options(source, TemplateOptions::process_default().clone())
    }

    /// Parse `source` into a new template with `options`
    pub fn parse_with_options(
        source: impl TemplateSource,
        options: TemplateOptions,
    ) -> Result<Self, ParseError> {
        let mut template = Self::with_options(options);
        source.append_to(&mut template)?;
        Ok(template)
    }

    /// Assemble a template from an existing format and its arguments.
    ///
    /// The format is taken as-is; every placeholder must name one of
    /// `arguments`.
    pub fn from_parts(
        format: impl Into<String>,
        arguments: Vec<Argument>,
        options: TemplateOptions,
    ) -> Result<Self, ParseError> {
        let format = format.into();
        if let Some(p) = placeholders(&format).find(|p| p.index >= arguments.len()) {
            return Err(ParseError::argument_index(p.index, arguments.len(), p.span));
        }

        let mut store = ArgumentStore::new();
        store.extend(arguments);
        Ok(Self {
            buffer: TemplateBuffer::from_format(format),
            arguments: store,
            options,
        })
    }

    /// The underlying format text
    pub fn format(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn buffer(&self) -> &TemplateBuffer {
        &self.buffer
    }

    pub fn arguments(&self) -> &[Argument] {
        self.arguments.as_slice()
    }

    /// Value of the argument at `index`
    pub fn argument(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index).map(|a| &a.value)
    }

    /// Format specifier the argument at `index` was added with
    pub fn argument_format(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).and_then(|a| a.format.as_deref())
    }

    /// Argument values in index order
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.arguments.iter().map(|a| &a.value)
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    /// Length of the format text in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.arguments.is_empty()
    }

    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }

    /// Split into format text and arguments
    pub fn into_parts(self) -> (String, Vec<Argument>) {
        (self.buffer.into_string(), self.arguments.into_vec())
    }

    /// Append literal text, escaping braces unless escaping is disabled
    pub fn append_literal(&mut self, text: &str) -> &mut Self {
        if self.options.auto_escape_curly_braces {
            self.buffer.append_literal(text);
        } else {
            self.buffer.append_raw(text);
        }
        self
    }

    /// Append text to the format unchanged
    pub fn append_raw(&mut self, text: &str) -> &mut Self {
        self.buffer.append_raw(text);
        self
    }

    /// Record `value` as an argument and append a placeholder for it.
    ///
    /// The format [`RAW_FORMAT`] appends the value's text directly instead.
    pub fn append_argument(&mut self, value: impl Into<Value>, format: Option<&str>) -> &mut Self {
        let value = value.into();
        if format == Some(RAW_FORMAT) {
            self.buffer.append_raw(&value.to_string());
            return self;
        }

        let index = self
            .arguments
            .add(Argument::new(value, format), self.options.comparer());
        let shown = format.filter(|f| self.options.preserve_argument_format && !f.is_empty());
        self.buffer.append_placeholder(index, shown);
        self
    }

    /// Move `other`'s arguments into this template and return its buffer
    /// renumbered to match.
    fn take_arguments(&mut self, other: Template) -> TemplateBuffer {
        let Template {
            mut buffer,
            arguments,
            ..
        } = other;
        let offset = self.arguments.len();

        match self.options.comparer() {
            None => {
                shift_placeholders(&mut buffer, offset);
                self.arguments.extend(arguments.into_vec());
            }
            Some(comparer) => {
                let map: Vec<usize> = arguments
                    .into_vec()
                    .into_iter()
                    .map(|argument| self.arguments.add(argument, Some(comparer)))
                    .collect();
                remap_placeholders(&mut buffer, |index| {
                    map.get(index).copied().unwrap_or(index + offset)
                });
                debug!(
                    merged = map.len(),
                    added = self.arguments.len() - offset,
                    "reused identical arguments"
                );
            }
        }
        buffer
    }

    /// Splice `other` in at byte offset `position`.
    ///
    /// `other`'s placeholders are renumbered to follow this template's
    /// arguments. A position inside a placeholder token is not rejected and
    /// corrupts that token.
    pub fn insert(&mut self, position: usize, other: Template) -> Result<&mut Self, BoundsError> {
        self.buffer.check_offset(position)?;
        debug!(position, arguments = other.argument_count(), "inserting template");
        let merged = self.take_arguments(other);
        self.buffer.insert(position, merged.as_str())?;
        Ok(self)
    }

    /// Append `other` at the end
    pub fn append(&mut self, other: Template) -> &mut Self {
        debug!(arguments = other.argument_count(), "appending template");
        let merged = self.take_arguments(other);
        self.buffer.append_raw(merged.as_str());
        self
    }

    /// Append `other` only when `condition` holds.
    ///
    /// `other` has already been built by the caller either way.
    pub fn append_if(&mut self, condition: bool, other: Template) -> &mut Self {
        if condition {
            self.append(other);
        }
        self
    }

    /// Parse `source` with this template's options into a fresh template
    fn parse_scratch(&self, source: impl TemplateSource) -> Result<Template, ParseError> {
        Template::parse_with_options(source, self.options.clone())
    }

    /// Parse `source` and append it. Nothing is appended on error.
    pub fn append_source(&mut self, source: impl TemplateSource) -> Result<&mut Self, ParseError> {
        let scratch = self.parse_scratch(source)?;
        Ok(self.append(scratch))
    }

    /// Parse and append `source` only when `condition` holds
    pub fn append_source_if(
        &mut self,
        condition: bool,
        source: impl TemplateSource,
    ) -> Result<&mut Self, ParseError> {
        if !condition {
            return Ok(self);
        }
        self.append_source(source)
    }

    /// Parse `source` and splice it in at `position`
    pub fn insert_source(
        &mut self,
        position: usize,
        source: impl TemplateSource,
    ) -> Result<&mut Self, crate::Error> {
        self.buffer.check_offset(position)?;
        let scratch = self.parse_scratch(source)?;
        Ok(self.insert(position, scratch)?)
    }

    /// Replace the first occurrence of `needle` in the format with `other`.
    ///
    /// Returns `false` and leaves the template unchanged when `needle` does
    /// not occur.
    pub fn replace(&mut self, needle: &str, other: Template) -> bool {
        let Ok(Some(at)) = self.buffer.index_of(needle, 0, false) else {
            return false;
        };
        debug!(needle, at, "replacing marker");
        let merged = self.take_arguments(other);
        self.buffer.splice(at, needle.len(), merged.as_str()).is_ok()
    }

    /// Replace the first occurrence of `needle` with parsed `source`.
    ///
    /// `source` is not parsed when `needle` does not occur.
    pub fn replace_source(
        &mut self,
        needle: &str,
        source: impl TemplateSource,
    ) -> Result<bool, ParseError> {
        if !matches!(self.buffer.index_of(needle, 0, false), Ok(Some(_))) {
            return Ok(false);
        }
        let scratch = self.parse_scratch(source)?;
        Ok(self.replace(needle, scratch))
    }

    /// Delete `length` bytes of format text starting at `start`.
    ///
    /// Arguments are not touched; removing part of a placeholder leaves a
    /// broken token behind.
    pub fn remove(&mut self, start: usize, length: usize) -> Result<&mut Self, BoundsError> {
        self.buffer.remove(start, length)?;
        Ok(self)
    }

    /// Byte offset of the first `needle` at or after `start`
    pub fn index_of(
        &self,
        needle: &str,
        start: usize,
        ignore_case: bool,
    ) -> Result<Option<usize>, BoundsError> {
        self.buffer.index_of(needle, start, ignore_case)
    }

    /// Render with [`InvariantFormatter`]
    pub fn render(&self) -> Result<String, RenderError> {
        self.render_with(&InvariantFormatter::default())
    }

    /// Render, formatting every argument through `provider`
    pub fn render_with(&self, provider: &dyn FormatProvider) -> Result<String, RenderError> {
        render::render(&self.buffer, self.arguments.as_slice(), provider)
    }

    /// The format with each placeholder replaced by `naming(index)`.
    ///
    /// ```rust
    /// use interpolated_text::{format_source, Template};
    ///
    /// let t = Template::parse(format_source!("a = {0} OR b = {1}", 1, 2)).unwrap();
    /// assert_eq!(t.bind_placeholders(|i| format!("@p{i}")).unwrap(), "a = @p0 OR b = @p1");
    /// ```
    pub fn bind_placeholders(
        &self,
        naming: impl FnMut(usize) -> String,
    ) -> Result<String, RenderError> {
        render::bind(&self.buffer, self.arguments.as_slice(), naming)
    }
}

impl AddAssign<Template> for Template {
    fn add_assign(&mut self, other: Template) {
        self.append(other);
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer && self.arguments() == other.arguments()
    }
}
