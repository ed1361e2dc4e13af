//! Value formatting for rendering

use thiserror::Error;

use crate::argument::Value;

/// Largest precision accepted in a standard format specifier
const MAX_PRECISION: usize = 99;

/// Errors produced while formatting a single value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("format specifier '{spec}' is not supported for {type_name} values")]
    UnsupportedSpec {
        spec: String,
        type_name: &'static str,
    },

    #[error("precision in '{spec}' exceeds {max}")]
    InvalidPrecision { spec: String, max: usize },
}

impl FormatError {
    pub fn unsupported(spec: impl Into<String>, value: &Value) -> Self {
        Self::UnsupportedSpec {
            spec: spec.into(),
            type_name: value.type_name(),
        }
    }
}

/// Turns a value and an optional format specifier into text
///
/// This is the seam for locale-aware formatting; the crate ships only
/// [`InvariantFormatter`].
pub trait FormatProvider {
    fn format(&self, value: &Value, spec: Option<&str>) -> Result<String, FormatError>;
}

/// Culture-neutral formatter with configurable separators
///
/// Numeric specifiers (`X` vs `x` picks the hex digit case):
///
/// | spec | output |
/// |------|--------|
/// | `D[n]` | integer, zero-padded to `n` digits |
/// | `X[n]`, `x[n]` | hexadecimal, zero-padded to `n` digits |
/// | `F[n]` | fixed point with `n` decimals (2 by default) |
/// | `N[n]` | like `F` with group separators |
/// | `00.000` | zero pattern: minimum integer digits, exact decimals |
///
/// Strings, characters, booleans and null ignore the specifier.
///
/// Signed integers are stored as `i64` whatever their source type, so hex of
/// a negative value is always 64-bit two's complement: `-1i32` with `X`
/// gives `FFFFFFFFFFFFFFFF`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantFormatter {
    pub decimal_separator: char,
    pub group_separator: char,
}

impl Default for InvariantFormatter {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
        }
    }
}

/// A number split into its printable parts
struct Digits {
    negative: bool,
    integer: String,
    fraction: String,
}

enum Spec {
    Decimal(Option<usize>),
    Hex { upper: bool, width: Option<usize> },
    Fixed(Option<usize>),
    Number(Option<usize>),
    Pattern { min_integer: usize, decimals: usize },
}

impl InvariantFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decimal and group separators
    pub fn with_separators(mut self, decimal: char, group: char) -> Self {
        self.decimal_separator = decimal;
        self.group_separator = group;
        self
    }

    fn plain(&self, value: &Value) -> String {
        match value {
            Value::Float(x) if self.decimal_separator != '.' => x
                .to_string()
                .replace('.', self.decimal_separator.encode_utf8(&mut [0; 4])),
            _ => value.to_string(),
        }
    }

    fn assemble(&self, digits: Digits, grouped: bool) -> String {
        let mut out = String::new();
        if digits.negative {
            out.push('-');
        }
        let len = digits.integer.len();
        for (i, c) in digits.integer.chars().enumerate() {
            if grouped && i > 0 && (len - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(c);
        }
        if !digits.fraction.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(&digits.fraction);
        }
        out
    }

    fn format_number(&self, value: &Value, spec_text: &str) -> Result<String, FormatError> {
        let spec = parse_spec(spec_text)?.ok_or_else(|| FormatError::unsupported(spec_text, value))?;

        let text = match (spec, value) {
            (Spec::Decimal(width), Value::Int(n)) => {
                let digits = n.unsigned_abs().to_string();
                let sign = if *n < 0 { "-" } else { "" };
                format!("{sign}{digits:0>w$}", w = width.unwrap_or(0))
            }
            (Spec::Decimal(width), Value::UInt(n)) => format!("{n:0>w$}", w = width.unwrap_or(0)),
            // two's complement for negative integers
            (Spec::Hex { upper, width }, Value::Int(n)) => hex(*n as u64, upper, width),
            (Spec::Hex { upper, width }, Value::UInt(n)) => hex(*n, upper, width),
            (Spec::Fixed(decimals), _) => {
                let digits = fixed_digits(value, decimals.unwrap_or(2));
                self.assemble(digits, false)
            }
            (Spec::Number(decimals), _) => {
                let digits = fixed_digits(value, decimals.unwrap_or(2));
                self.assemble(digits, true)
            }
            (
                Spec::Pattern {
                    min_integer,
                    decimals,
                },
                _,
            ) => {
                let mut digits = fixed_digits(value, decimals);
                if min_integer == 0 && digits.integer == "0" {
                    digits.integer.clear();
                } else if digits.integer.len() < min_integer {
                    let pad = "0".repeat(min_integer - digits.integer.len());
                    digits.integer.insert_str(0, &pad);
                }
                self.assemble(digits, false)
            }
            _ => return Err(FormatError::unsupported(spec_text, value)),
        };
        Ok(text)
    }
}

impl FormatProvider for InvariantFormatter {
    fn format(&self, value: &Value, spec: Option<&str>) -> Result<String, FormatError> {
        if let Value::Custom(custom) = value {
            return custom.format(spec, self);
        }
        match (spec.filter(|s| !s.is_empty()), value) {
            (Some(spec), Value::Int(_) | Value::UInt(_)) => self.format_number(value, spec),
            (Some(spec), Value::Float(x)) if x.is_finite() => self.format_number(value, spec),
            _ => Ok(self.plain(value)),
        }
    }
}

fn hex(bits: u64, upper: bool, width: Option<usize>) -> String {
    let w = width.unwrap_or(0);
    if upper {
        format!("{bits:0w$X}")
    } else {
        format!("{bits:0w$x}")
    }
}

/// Parse a numeric specifier. `Ok(None)` means unrecognized.
fn parse_spec(spec: &str) -> Result<Option<Spec>, FormatError> {
    if !spec.is_empty() && spec.chars().all(|c| c == '0' || c == '.') {
        let mut parts = spec.split('.');
        let integer = parts.next().unwrap_or("");
        let fraction = parts.next().unwrap_or("");
        if parts.next().is_some() {
            return Ok(None);
        }
        return Ok(Some(Spec::Pattern {
            min_integer: integer.len(),
            decimals: fraction.len(),
        }));
    }

    let mut chars = spec.chars();
    let Some(kind) = chars.next() else {
        return Ok(None);
    };
    let rest = chars.as_str();
    let precision = if rest.is_empty() {
        None
    } else if rest.bytes().all(|b| b.is_ascii_digit()) {
        match rest.parse::<usize>() {
            Ok(p) if p <= MAX_PRECISION => Some(p),
            _ => {
                return Err(FormatError::InvalidPrecision {
                    spec: spec.to_string(),
                    max: MAX_PRECISION,
                })
            }
        }
    } else {
        return Ok(None);
    };

    Ok(match kind {
        'D' | 'd' => Some(Spec::Decimal(precision)),
        'X' | 'x' => Some(Spec::Hex {
            upper: kind == 'X',
            width: precision,
        }),
        'F' | 'f' => Some(Spec::Fixed(precision)),
        'N' | 'n' => Some(Spec::Number(precision)),
        _ => None,
    })
}

/// Render a numeric value with a fixed number of decimals, split into parts
fn fixed_digits(value: &Value, decimals: usize) -> Digits {
    let (negative, text) = match value {
        Value::Int(n) => (*n < 0, n.unsigned_abs().to_string()),
        Value::UInt(n) => (false, n.to_string()),
        Value::Float(x) => (x.is_sign_negative(), format!("{:.*}", decimals, x.abs())),
        _ => (false, value.to_string()),
    };
    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, "0".repeat(decimals)),
    };
    Digits {
        negative,
        integer,
        fraction,
    }
}
