//! The quad value type.

use std::fmt;

use super::term::{Term, TermName};

/// A subject/predicate/object/graph tuple, the unit of storage.
///
/// Quads are plain values: equality is structural equality of all four terms.
/// An empty graph term means "no graph given"; the store replaces it with its
/// configured default graph before writing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Term,
}

impl Quad {
    /// Create a quad from four terms.
    #[must_use]
    pub fn new(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
        graph: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: graph.into(),
        }
    }

    /// Create a quad without a graph; it will land in the default graph.
    #[must_use]
    pub fn triple(
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        object: impl Into<Term>,
    ) -> Self {
        Self::new(subject, predicate, object, Term::default())
    }

    /// Get the term in a slot.
    #[must_use]
    pub const fn get(&self, name: TermName) -> &Term {
        match name {
            TermName::Subject => &self.subject,
            TermName::Predicate => &self.predicate,
            TermName::Object => &self.object,
            TermName::Graph => &self.graph,
        }
    }

    /// Return this quad with an empty graph replaced by `default_graph`.
    #[must_use]
    pub fn with_default_graph(mut self, default_graph: &Term) -> Self {
        if self.graph.is_empty() {
            self.graph = default_graph.clone();
        }
        self
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.subject, self.predicate, self.object, self.graph
        )
    }
}
