//! Placeholder renumbering for merges
//!
//! A template's placeholders are numbered from its own first argument. When
//! it is spliced into another template its arguments move to new positions,
//! so every `{N...}` token must be rewritten. Literal text, escaped braces,
//! stray braces and format bodies pass through untouched.

use std::fmt::Write;

use super::scanner::{scan, Piece};
use crate::buffer::TemplateBuffer;

/// Rewrite every placeholder index in `format` through `map`
pub fn remap_format(format: &str, mut map: impl FnMut(usize) -> usize) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    for piece in scan(format) {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::EscapedBrace(brace) => {
                out.push(brace);
                out.push(brace);
            }
            Piece::StrayBrace { brace, .. } => out.push(brace),
            Piece::Placeholder(p) => {
                let _ = write!(out, "{{{}", map(p.index));
                if let Some(format) = p.format {
                    out.push(':');
                    out.push_str(format);
                }
                out.push('}');
            }
        }
    }
    out
}

/// Add `offset` to every placeholder index in `format`
pub fn shift_format(format: &str, offset: usize) -> String {
    if offset == 0 {
        return format.to_string();
    }
    remap_format(format, |index| index.saturating_add(offset))
}

/// Add `offset` to every placeholder index in `buffer`
pub fn shift_placeholders(buffer: &mut TemplateBuffer, offset: usize) {
    if offset == 0 {
        return;
    }
    let shifted = shift_format(buffer.as_str(), offset);
    buffer.set(shifted);
}

/// Rewrite every placeholder index in `buffer` through `map`
pub fn remap_placeholders(buffer: &mut TemplateBuffer, map: impl FnMut(usize) -> usize) {
    let remapped = remap_format(buffer.as_str(), map);
    buffer.set(remapped);
}
