//! Template arguments: values, their format specifiers and their storage

mod store;
mod value;

pub use store::{ArgumentComparer, ArgumentStore, DefaultComparer};
pub use value::{CustomValue, Value};

/// A stored value together with the format specifier it was embedded with
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub value: Value,
    /// Text after the `:` of the original placeholder, if any
    pub format: Option<String>,
}

impl Argument {
    pub fn new(value: impl Into<Value>, format: Option<&str>) -> Self {
        Self {
            value: value.into(),
            format: format.map(str::to_string),
        }
    }
}
