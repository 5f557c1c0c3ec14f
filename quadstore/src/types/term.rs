//! Terms and term slots.
//!
//! A `Term` is an opaque string identifier. The store never looks inside a
//! term: equality and ordering are byte-wise over its UTF-8 encoding, which is
//! exactly the order the key codec relies on.

use std::fmt;

/// An opaque term value stored in one of the four quad slots.
///
/// # Invariants
///
/// - Ordering is byte-wise lexicographic (the derived `Ord` on `String`).
/// - A term stored in the database never contains the configured separator
///   or boundary sequence (checked by the key codec, not here).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Term(String);

impl Term {
    /// Create a term from anything string-like.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the term's string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the term is the empty string.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the term and return its string value.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One of the four slots of a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TermName {
    Subject,
    Predicate,
    Object,
    Graph,
}

impl TermName {
    /// All four slots in canonical (S, P, O, G) order.
    pub const ALL: [Self; 4] = [Self::Subject, Self::Predicate, Self::Object, Self::Graph];

    /// Position of the slot in canonical order.
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Subject => 0,
            Self::Predicate => 1,
            Self::Object => 2,
            Self::Graph => 3,
        }
    }

    /// Upper-case initial used to build index names.
    #[must_use]
    pub const fn initial(self) -> char {
        match self {
            Self::Subject => 'S',
            Self::Predicate => 'P',
            Self::Object => 'O',
            Self::Graph => 'G',
        }
    }

    /// Parse a slot from its initial (case-insensitive).
    #[must_use]
    pub const fn from_initial(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'S' => Some(Self::Subject),
            'P' => Some(Self::Predicate),
            'O' => Some(Self::Object),
            'G' => Some(Self::Graph),
            _ => None,
        }
    }

    /// Lower-case slot name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Predicate => "predicate",
            Self::Object => "object",
            Self::Graph => "graph",
        }
    }
}

impl fmt::Display for TermName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of slots, stored as a 4-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TermNameSet(u8);

impl TermNameSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add a slot to the set.
    pub const fn insert(&mut self, name: TermName) {
        self.0 |= 1 << name.position();
    }

    /// Check whether a slot is in the set.
    #[must_use]
    pub const fn contains(self, name: TermName) -> bool {
        self.0 & (1 << name.position()) != 0
    }

    /// Number of slots in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<TermName> for TermNameSet {
    fn from_iter<I: IntoIterator<Item = TermName>>(iter: I) -> Self {
        let mut set = Self::empty();
        for name in iter {
            set.insert(name);
        }
        set
    }
}
