//! Variable bindings produced by search.
//!
//! A `Binding` maps variable names to terms. The join executor extends one
//! binding per stage; each branch of the join works on its own copy.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::Term;

/// An assignment of terms to variables.
///
/// Iteration is ordered by variable name, so two equal bindings always print
/// the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binding {
    values: BTreeMap<String, Term>,
}

impl Binding {
    /// Create an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable, replacing any previous value.
    pub fn set(&mut self, variable: impl Into<String>, value: Term) {
        self.values.insert(variable.into(), value);
    }

    /// Builder form of `set`.
    #[must_use]
    pub fn with(mut self, variable: impl Into<String>, value: impl Into<Term>) -> Self {
        self.set(variable, value.into());
        self
    }

    /// Get the value bound to a variable.
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.values.get(variable)
    }

    /// Check whether a variable is bound.
    #[must_use]
    pub fn contains(&self, variable: &str) -> bool {
        self.values.contains_key(variable)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(variable, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "?{name}: {value}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<Term>> FromIterator<(K, V)> for Binding {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
