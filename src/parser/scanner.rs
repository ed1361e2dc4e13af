//! Single-pass scanner for placeholder-bearing format strings
//!
//! The scanner splits a format string into literal runs, escaped braces,
//! stray braces and placeholder tokens of the form `{N}` or `{N:format}`.
//! The parser, the placeholder shifter and the renderer all share it, so the
//! three agree on what is and is not a placeholder.

use crate::error::Span;

/// One piece of a format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Text containing no braces
    Literal(&'a str),
    /// `{{` or `}}`, standing for a single literal brace
    EscapedBrace(char),
    /// A brace that neither escapes nor opens a well-formed placeholder
    StrayBrace { brace: char, offset: usize },
    /// A `{N}` or `{N:format}` token
    Placeholder(Placeholder<'a>),
}

/// A placeholder token referencing an argument by index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Argument index
    pub index: usize,
    /// Everything between the first `:` and the closing brace
    pub format: Option<&'a str>,
    /// Byte range of the whole token, braces included
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InLiteral,
    InPlaceholderIndex,
    InPlaceholderFormat,
}

/// Iterator over the [`Piece`]s of a format string
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `source`
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Try to read a placeholder whose opening brace sits at `open`.
    ///
    /// Returns the placeholder and the offset just past its closing brace, or
    /// `None` when the grammar does not match (non-numeric index, missing
    /// closing brace, index too large for `usize`).
    fn placeholder_at(&self, open: usize) -> Option<(Placeholder<'a>, usize)> {
        let bytes = self.source.as_bytes();
        let index_start = open + 1;
        let mut index_end = index_start;
        let mut state = State::InPlaceholderIndex;
        let mut pos = index_start;

        while state != State::InLiteral {
            let b = *bytes.get(pos)?;
            match state {
                State::InPlaceholderIndex => match b {
                    b'0'..=b'9' => {
                        pos += 1;
                        index_end = pos;
                    }
                    b':' if index_end > index_start => {
                        state = State::InPlaceholderFormat;
                        pos += 1;
                    }
                    b'}' if index_end > index_start => state = State::InLiteral,
                    _ => return None,
                },
                State::InPlaceholderFormat => {
                    if b == b'}' {
                        state = State::InLiteral;
                    } else {
                        pos += 1;
                    }
                }
                State::InLiteral => {}
            }
        }

        let index = self.source[index_start..index_end].parse().ok()?;
        let format = (pos > index_end).then(|| &self.source[index_end + 1..pos]);
        let end = pos + 1;
        Some((
            Placeholder {
                index,
                format,
                span: open..end,
            },
            end,
        ))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.source.as_bytes();
        let start = self.pos;
        let first = *bytes.get(start)?;
        let doubled = bytes.get(start + 1) == Some(&first);

        let piece = match first {
            b'{' | b'}' if doubled => {
                self.pos += 2;
                Piece::EscapedBrace(first as char)
            }
            b'{' => match self.placeholder_at(start) {
                Some((placeholder, end)) => {
                    self.pos = end;
                    Piece::Placeholder(placeholder)
                }
                None => {
                    self.pos += 1;
                    Piece::StrayBrace {
                        brace: '{',
                        offset: start,
                    }
                }
            },
            b'}' => {
                self.pos += 1;
                Piece::StrayBrace {
                    brace: '}',
                    offset: start,
                }
            }
            _ => {
                let end = self.source[start..]
                    .find(&['{', '}'][..])
                    .map_or(self.source.len(), |i| start + i);
                self.pos = end;
                Piece::Literal(&self.source[start..end])
            }
        };
        Some(piece)
    }
}

/// Scan `source` into pieces
pub fn scan(source: &str) -> Scanner<'_> {
    Scanner::new(source)
}

/// Iterate over the placeholders of `source` only
pub fn placeholders(source: &str) -> impl Iterator<Item = Placeholder<'_>> {
    scan(source).filter_map(|piece| match piece {
        Piece::Placeholder(p) => Some(p),
        _ => None,
    })
}
