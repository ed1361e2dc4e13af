//! Runtime values carried as template arguments

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::render::{FormatError, FormatProvider};

/// A value type defined outside this crate
///
/// Implementors supply the equality used for argument reuse and their own
/// formatting. Two custom values are only compared when their
/// [`type_name`](CustomValue::type_name)s match.
pub trait CustomValue: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Name identifying the runtime type of the value
    fn type_name(&self) -> &'static str;

    /// Value equality against another custom value of the same type name
    fn eq_value(&self, other: &dyn CustomValue) -> bool;

    /// Access to the concrete type, for `eq_value` implementations
    fn as_any(&self) -> &dyn Any;

    /// Format the value with an optional format specifier.
    ///
    /// The default ignores the specifier and uses `Display`.
    fn format(
        &self,
        spec: Option<&str>,
        provider: &dyn FormatProvider,
    ) -> Result<String, FormatError> {
        let _ = (spec, provider);
        Ok(self.to_string())
    }
}

/// A template argument value
///
/// The variant is the runtime type: `Int(5)` and `UInt(5)` are different
/// values as far as argument reuse is concerned.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// Wrap a custom value
    pub fn custom(value: impl CustomValue) -> Self {
        Value::Custom(Arc::new(value))
    }

    /// Name of the runtime type
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Custom(c) => c.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Same variant and equal payload. Floats compare with `==`, so `NaN` never
/// equals itself.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => {
                a.type_name() == b.type_name() && a.eq_value(b.as_ref())
            }
            _ => false,
        }
    }
}

/// Default text form, used by the raw escape. `Null` is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) => f.write_str(s),
            Value::Custom(c) => write!(f, "{c}"),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

impl_from!(Bool as bool: bool);
impl_from!(Int as i64: i8, i16, i32, i64);
impl_from!(UInt as u64: u8, u16, u32, u64);
impl_from!(Float as f64: f32, f64);
impl_from!(Char as char: char);
impl_from!(Str as String: String, &str, &String, Box<str>);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
