//! Index registry.
//!
//! An index is a named permutation of the four quad slots. Storing every quad
//! once per index gives the store several total orders over the same data, so
//! that any combination of bound slots has some index where those slots form
//! a contiguous key prefix.
//!
//! # Invariants
//!
//! - Every index's `terms` holds each of the four slots exactly once.
//! - Index names are unique within a registry.
//! - The registry is fixed once the store is opened.

use std::fmt;

use crate::codec::{EncodingError, KeyCodec};
use crate::types::{Quad, TermName, TermNameSet};

/// The six default slot orders.
///
/// Together they give a contiguous prefix for every combination of one to
/// three bound slots.
pub const DEFAULT_INDEXES: [[TermName; 4]; 6] = {
    use crate::types::TermName::{Graph as G, Object as O, Predicate as P, Subject as S};
    [
        [S, P, O, G],
        [O, G, S, P],
        [G, S, P, O],
        [O, S, P, G],
        [P, O, G, S],
        [G, P, O, S],
    ]
};

/// A named total ordering of the quad set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    name: String,
    terms: [TermName; 4],
}

impl Index {
    /// Build an index from a slot order, validating that it is a permutation.
    pub fn new(terms: &[TermName]) -> Result<Self, IndexError> {
        let order: [TermName; 4] = terms
            .try_into()
            .map_err(|_| IndexError::NotAPermutation(terms.to_vec()))?;
        let distinct: TermNameSet = order.iter().copied().collect();
        if distinct.len() != 4 {
            return Err(IndexError::NotAPermutation(terms.to_vec()));
        }
        Ok(Self {
            name: order.iter().map(|name| name.initial()).collect(),
            terms: order,
        })
    }

    /// Parse an index from its name, e.g. `"SPOG"`.
    pub fn from_name(name: &str) -> Result<Self, IndexError> {
        let terms = name
            .chars()
            .map(TermName::from_initial)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| IndexError::UnknownName(name.to_owned()))?;
        Self::new(&terms)
    }

    /// The index name: the initials of its slot order.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The slot order.
    #[must_use]
    pub const fn terms(&self) -> &[TermName; 4] {
        &self.terms
    }

    /// The stored key of `quad` in this index.
    pub fn key(&self, codec: &KeyCodec, quad: &Quad) -> Result<String, EncodingError> {
        codec.encode_full_key(&self.name, &self.terms, quad)
    }

    /// Number of leading slots of this index's order that are in `bound`.
    ///
    /// Counting stops at the first slot not in `bound`: a bound slot that is
    /// not part of a contiguous prefix cannot narrow a scan of this index.
    #[must_use]
    pub fn usable_prefix_len(&self, bound: TermNameSet) -> usize {
        self.terms
            .iter()
            .take_while(|&&name| bound.contains(name))
            .count()
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The ordered set of indexes of a store.
///
/// Registration order is significant: it is the planner's final tie-break.
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    indexes: Vec<Index>,
}

impl IndexRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            indexes: Vec::new(),
        }
    }

    /// Create a registry holding the six default indexes.
    #[must_use]
    pub fn with_default_indexes() -> Self {
        Self {
            indexes: DEFAULT_INDEXES
                .iter()
                .map(|terms| Index {
                    name: terms.iter().map(|name| name.initial()).collect(),
                    terms: *terms,
                })
                .collect(),
        }
    }

    /// Register a new index.
    pub fn add_index(&mut self, terms: &[TermName]) -> Result<&Index, IndexError> {
        let index = Index::new(terms)?;
        if self.indexes.iter().any(|existing| existing.name == index.name) {
            return Err(IndexError::Duplicate(index.name));
        }
        self.indexes.push(index);
        Ok(&self.indexes[self.indexes.len() - 1])
    }

    /// All indexes in registration order.
    #[must_use]
    pub fn all_indexes(&self) -> &[Index] {
        &self.indexes
    }

    /// Look up an index by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|index| index.name == name)
    }

    /// Usable prefix length of `index` for a set of bound slots.
    #[must_use]
    pub fn can_serve(&self, index: &Index, bound: TermNameSet) -> usize {
        index.usable_prefix_len(bound)
    }

    /// Number of registered indexes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Check whether no index is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

/// Errors that can occur when registering an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The slot order is not a permutation of the four slots.
    NotAPermutation(Vec<TermName>),
    /// The index name contains a character that is not a slot initial.
    UnknownName(String),
    /// An index with the same slot order is already registered.
    Duplicate(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAPermutation(terms) => {
                write!(f, "index terms {terms:?} are not a permutation of the four slots")
            }
            Self::UnknownName(name) => write!(f, "unknown index name {name:?}"),
            Self::Duplicate(name) => write!(f, "index {name} is already registered"),
        }
    }
}

impl std::error::Error for IndexError {}
