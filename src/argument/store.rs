//! Ordered argument storage with optional reuse of identical arguments

use std::fmt;

use super::Argument;

/// Decides whether two arguments may share one slot
///
/// Only consulted when argument reuse is enabled. A panic inside `equals`
/// propagates to the caller of the operation that added the argument.
pub trait ArgumentComparer: fmt::Debug + Send + Sync {
    fn equals(&self, a: &Argument, b: &Argument) -> bool;
}

/// Formats must match exactly (two absent formats match) and values must be
/// of the same runtime type and equal, or both null.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultComparer;

impl ArgumentComparer for DefaultComparer {
    fn equals(&self, a: &Argument, b: &Argument) -> bool {
        a.format == b.format && a.value == b.value
    }
}

/// Arguments in placeholder-index order
#[derive(Debug, Clone, Default)]
pub struct ArgumentStore {
    entries: Vec<Argument>,
}

impl ArgumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument and return its index.
    ///
    /// With a comparer, the first existing entry equal to `argument` is
    /// reused. The scan is linear; argument lists are short.
    pub fn add(&mut self, argument: Argument, comparer: Option<&dyn ArgumentComparer>) -> usize {
        if let Some(comparer) = comparer {
            if let Some(index) = self
                .entries
                .iter()
                .position(|existing| comparer.equals(existing, &argument))
            {
                return index;
            }
        }

        self.entries.push(argument);
        self.entries.len() - 1
    }

    /// Append every argument without reuse
    pub fn extend(&mut self, arguments: impl IntoIterator<Item = Argument>) {
        self.entries.extend(arguments);
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Argument] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.entries.iter()
    }

    /// Take the entries out, leaving the store empty
    pub fn into_vec(self) -> Vec<Argument> {
        self.entries
    }
}
