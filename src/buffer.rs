//! Literal text accumulator holding numbered placeholders
//!
//! A [`TemplateBuffer`] is the format half of a template: literal text with
//! doubled braces plus `{N}` / `{N:format}` placeholders. Offsets are byte
//! offsets into the UTF-8 text and must fall on character boundaries.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::OnceLock;

use thiserror::Error;

use crate::error::Span;
use crate::parser::scanner::{scan, Piece};

/// Errors for offsets outside the buffer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoundsError {
    #[error("offset {offset} is out of bounds for a buffer of length {len}")]
    OutOfRange { offset: usize, len: usize },

    #[error("range {start}..{end} is out of bounds for a buffer of length {len}")]
    RangeOutOfRange { start: usize, end: usize, len: usize },

    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// One element of a buffer's compiled layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim to the output. An escaped brace compiles to a
    /// one-byte range covering one of its two braces.
    Literal(Range<usize>),
    /// Reference to an argument
    Placeholder {
        index: usize,
        format: Option<Range<usize>>,
        span: Span,
    },
    /// Unpaired brace, an error at render time
    StrayBrace { brace: char, offset: usize },
}

/// Mutable format text with a memoized layout
#[derive(Debug, Clone, Default)]
pub struct TemplateBuffer {
    text: String,
    segments: OnceLock<Vec<Segment>>,
}

impl PartialEq for TemplateBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for TemplateBuffer {}

impl TemplateBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from format text, taken as-is
    pub fn from_format(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments: OnceLock::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Mutable access to the text; drops the memoized layout
    fn text_mut(&mut self) -> &mut String {
        self.segments.take();
        &mut self.text
    }

    /// Append `text` with every brace doubled
    pub fn append_literal(&mut self, text: &str) {
        let escaped = escape_braces(text);
        self.text_mut().push_str(&escaped);
    }

    /// Append `text` unchanged
    pub fn append_raw(&mut self, text: &str) {
        self.text_mut().push_str(text);
    }

    /// Append a `{index}` or `{index:format}` placeholder
    pub fn append_placeholder(&mut self, index: usize, format: Option<&str>) {
        let text = self.text_mut();
        text.push('{');
        text.push_str(&index.to_string());
        if let Some(format) = format {
            text.push(':');
            text.push_str(format);
        }
        text.push('}');
    }

    /// Splice `other` in at `index`.
    ///
    /// An index inside a placeholder token is accepted and corrupts that
    /// token; callers that need intact placeholders insert at boundaries.
    pub fn insert(&mut self, index: usize, other: &str) -> Result<(), BoundsError> {
        self.check_offset(index)?;
        self.text_mut().insert_str(index, other);
        Ok(())
    }

    /// Delete `length` bytes starting at `start`
    pub fn remove(&mut self, start: usize, length: usize) -> Result<(), BoundsError> {
        self.splice(start, length, "")
    }

    /// First occurrence of `needle` at or after `start`.
    ///
    /// Not finding the needle is `Ok(None)`; only a bad `start` is an error.
    pub fn index_of(
        &self,
        needle: &str,
        start: usize,
        ignore_case: bool,
    ) -> Result<Option<usize>, BoundsError> {
        self.check_offset(start)?;
        let haystack = &self.text[start..];
        if !ignore_case {
            return Ok(haystack.find(needle).map(|i| start + i));
        }

        let found = haystack
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(haystack.len()))
            .find(|&i| starts_with_ignore_case(&haystack[i..], needle));
        Ok(found.map(|i| start + i))
    }

    /// Replace `start..start + length` with `with`
    pub fn splice(&mut self, start: usize, length: usize, with: &str) -> Result<(), BoundsError> {
        let end = self.checked_end(start, length)?;
        self.text_mut().replace_range(start..end, with);
        Ok(())
    }

    /// Replace the whole text
    pub(crate) fn set(&mut self, text: String) {
        *self.text_mut() = text;
    }

    /// Compiled layout of the buffer, memoized until the next mutation
    pub fn segments(&self) -> &[Segment] {
        self.segments.get_or_init(|| compile(&self.text))
    }

    fn checked_end(&self, start: usize, length: usize) -> Result<usize, BoundsError> {
        let len = self.len();
        let end = start.checked_add(length).filter(|&end| end <= len).ok_or(
            BoundsError::RangeOutOfRange {
                start,
                end: start.saturating_add(length),
                len,
            },
        )?;
        self.check_offset(start)?;
        self.check_offset(end)?;
        Ok(end)
    }

    pub(crate) fn check_offset(&self, offset: usize) -> Result<(), BoundsError> {
        if offset > self.len() {
            return Err(BoundsError::OutOfRange {
                offset,
                len: self.len(),
            });
        }
        if !self.text.is_char_boundary(offset) {
            return Err(BoundsError::NotCharBoundary { offset });
        }
        Ok(())
    }
}

/// Double every `{` and `}` in `text`
pub fn escape_braces(text: &str) -> Cow<'_, str> {
    if !text.contains(&['{', '}'][..]) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if c == '{' || c == '}' {
            escaped.push(c);
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

fn starts_with_ignore_case(haystack: &str, needle: &str) -> bool {
    let mut hay = haystack.chars().flat_map(char::to_lowercase);
    needle
        .chars()
        .flat_map(char::to_lowercase)
        .all(|n| hay.next() == Some(n))
}

fn compile(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut offset = 0;
    for piece in scan(text) {
        let (segment, width) = match piece {
            Piece::Literal(s) => (Segment::Literal(offset..offset + s.len()), s.len()),
            Piece::EscapedBrace(_) => (Segment::Literal(offset..offset + 1), 2),
            Piece::StrayBrace { brace, offset: at } => {
                (Segment::StrayBrace { brace, offset: at }, 1)
            }
            Piece::Placeholder(p) => {
                let close = p.span.end - 1;
                let format = p.format.map(|f| close - f.len()..close);
                let width = p.span.len();
                (
                    Segment::Placeholder {
                        index: p.index,
                        format,
                        span: p.span,
                    },
                    width,
                )
            }
        };
        segments.push(segment);
        offset += width;
    }
    segments
}
