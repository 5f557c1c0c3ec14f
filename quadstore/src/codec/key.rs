//! Composite key encoding.
//!
//! Every key has the shape `NAME SEP v1 SEP v2 SEP ... SEP`: the index name,
//! then each term value in the index's slot order, every component followed
//! by the separator. Because the separator sorts below every character a term
//! may contain and the boundary sorts above every one, byte order over keys
//! equals slot-by-slot term order, and `prefix + BOUNDARY` fences off every
//! key that starts with `prefix`.
//!
//! # Invariants
//!
//! - Terms never contain the separator or the boundary.
//! - Every character of a term sorts strictly after the separator's first
//!   character and strictly before the boundary's first character.
//! - `separator < boundary`, byte-wise.

use std::fmt;

use crate::types::{Quad, Term, TermName};

/// Default separator: a single NUL character.
pub const DEFAULT_SEPARATOR: &str = "\u{0}";

/// Default boundary: the highest Unicode scalar value. Its UTF-8 encoding
/// (`F4 8F BF BF`) sorts after the encoding of every other scalar value.
pub const DEFAULT_BOUNDARY: &str = "\u{10FFFF}";

/// Encodes terms and quads into index keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodec {
    separator: String,
    boundary: String,
}

impl Default for KeyCodec {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_owned(),
            boundary: DEFAULT_BOUNDARY.to_owned(),
        }
    }
}

impl KeyCodec {
    /// Create a codec with custom sentinels.
    ///
    /// The caller is responsible for the sentinel invariants; `StoreConfig`
    /// validates them before a store is opened.
    #[must_use]
    pub fn new(separator: impl Into<String>, boundary: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            boundary: boundary.into(),
        }
    }

    /// The separator appended after every key component.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The boundary used as an upper range fence.
    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Reject a term that cannot be encoded in key order.
    ///
    /// A term may not contain either sentinel, and each of its characters
    /// must sort strictly between the first characters of the separator and
    /// the boundary. Otherwise byte order over keys would diverge from term
    /// order.
    pub fn validate_term(&self, slot: TermName, term: &Term) -> Result<(), EncodingError> {
        let value = term.as_str();
        let violation = if value.contains(self.separator.as_str()) {
            Some(Violation::Separator)
        } else if value.contains(self.boundary.as_str()) {
            Some(Violation::Boundary)
        } else {
            value
                .chars()
                .find(|&c| !self.admits(c))
                .map(Violation::OutOfOrder)
        };
        if let Some(violation) = violation {
            return Err(EncodingError {
                slot,
                term: value.to_owned(),
                violation,
            });
        }
        Ok(())
    }

    /// Check whether a term character sorts strictly between the sentinels.
    fn admits(&self, c: char) -> bool {
        let above_separator = self.separator.chars().next().is_none_or(|sep| c > sep);
        let below_boundary = self.boundary.chars().next().is_none_or(|bound| c < bound);
        above_separator && below_boundary
    }

    /// Reject a quad with any term containing a reserved sequence.
    pub fn validate_quad(&self, quad: &Quad) -> Result<(), EncodingError> {
        for name in TermName::ALL {
            self.validate_term(name, quad.get(name))?;
        }
        Ok(())
    }

    /// Encode an index name followed by zero or more term values.
    ///
    /// Each `(slot, term)` is validated before it is appended; the slot is
    /// only used for error reporting.
    pub fn encode_key<'a, I>(&self, index_name: &str, values: I) -> Result<String, EncodingError>
    where
        I: IntoIterator<Item = (TermName, &'a Term)>,
    {
        let mut key = String::with_capacity(index_name.len() + 64);
        key.push_str(index_name);
        key.push_str(&self.separator);
        for (slot, term) in values {
            self.validate_term(slot, term)?;
            key.push_str(term.as_str());
            key.push_str(&self.separator);
        }
        Ok(key)
    }

    /// Encode the stored key of `quad` for an index with the given slot order.
    pub fn encode_full_key(
        &self,
        index_name: &str,
        terms: &[TermName; 4],
        quad: &Quad,
    ) -> Result<String, EncodingError> {
        self.encode_key(index_name, terms.iter().map(|&name| (name, quad.get(name))))
    }
}

/// Why a term cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The term contains the separator.
    Separator,
    /// The term contains the boundary.
    Boundary,
    /// The term contains a character that does not sort strictly between
    /// the separator and the boundary.
    OutOfOrder(char),
}

/// A term value cannot be encoded.
///
/// This is a caller data defect, never a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingError {
    pub slot: TermName,
    pub term: String,
    pub violation: Violation,
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, term) = (self.slot, &self.term);
        match self.violation {
            Violation::Separator => {
                write!(f, "{slot} term {term:?} contains the reserved separator sequence")
            }
            Violation::Boundary => {
                write!(f, "{slot} term {term:?} contains the reserved boundary sequence")
            }
            Violation::OutOfOrder(c) => write!(
                f,
                "{slot} term {term:?} contains {c:?}, which does not sort between \
                 the separator and the boundary"
            ),
        }
    }
}

impl std::error::Error for EncodingError {}
