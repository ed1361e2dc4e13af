//! Dedent for multi-line format strings
//!
//! Lets a multi-line literal be indented along with the surrounding source
//! without carrying that indentation into the output.

use std::borrow::Cow;

/// Split into `(line, line_break)` pairs; the last pair has an empty break
fn split_lines(block: &str) -> Vec<(&str, &str)> {
    let bytes = block.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        let width = match bytes[pos] {
            b'\r' if bytes.get(pos + 1) == Some(&b'\n') => 2,
            b'\r' | b'\n' => 1,
            _ => {
                pos += 1;
                continue;
            }
        };
        lines.push((&block[start..pos], &block[pos..pos + width]));
        pos += width;
        start = pos;
    }
    lines.push((&block[start..], ""));
    lines
}

fn is_blank(line: &str) -> bool {
    line.trim_end().is_empty()
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Drop the first `n` characters of `line`, or all of it when shorter
fn strip_chars(line: &str, n: usize) -> &str {
    line.char_indices().nth(n).map_or("", |(i, _)| &line[i..])
}

/// Remove the common indentation of a multi-line block.
///
/// Blocks without line breaks, or with fewer than two non-blank lines, are
/// returned unchanged. A leading line break is dropped. The indentation
/// width is the smallest count of leading whitespace characters over the
/// non-blank lines; that many characters are removed from every line.
/// `\n`, `\r\n` and `\r` are recognized and preserved.
pub fn adjust_multiline(block: &str) -> Cow<'_, str> {
    let lines = split_lines(block);
    if lines.len() <= 1 || lines.iter().filter(|(line, _)| !is_blank(line)).count() <= 1 {
        return Cow::Borrowed(block);
    }

    let lines = match lines.first() {
        Some((first, _)) if first.is_empty() => &lines[1..],
        _ => &lines[..],
    };
    let indent = lines
        .iter()
        .filter(|(line, _)| !is_blank(line))
        .map(|(line, _)| indent_width(line))
        .min()
        .unwrap_or(0);

    let mut out = String::with_capacity(block.len());
    for (line, line_break) in lines {
        out.push_str(strip_chars(line, indent));
        out.push_str(line_break);
    }
    Cow::Owned(out)
}
