//! Stored value format.
//!
//! The value written under every index key is the quad itself, so a quad can
//! be reconstructed without parsing (and unescaping) the key.
//!
//! # Format
//!
//! ```text
//! [len: u32 LE][subject bytes]
//! [len: u32 LE][predicate bytes]
//! [len: u32 LE][object bytes]
//! [len: u32 LE][graph bytes]
//! [crc32: u32 LE]   computed over everything before it
//! ```

#![allow(clippy::cast_possible_truncation)]

use std::fmt;

use crate::types::{Quad, Term, TermName};

/// Size of a length prefix.
const LEN_SIZE: usize = 4;
/// Size of the trailing checksum.
const CHECKSUM_SIZE: usize = 4;

/// Serialize a quad into its stored value.
#[must_use]
pub fn encode_value(quad: &Quad) -> Vec<u8> {
    let payload_len: usize = TermName::ALL
        .iter()
        .map(|&name| LEN_SIZE + quad.get(name).as_str().len())
        .sum();
    let mut bytes = Vec::with_capacity(payload_len + CHECKSUM_SIZE);

    for name in TermName::ALL {
        let term = quad.get(name).as_str().as_bytes();
        bytes.extend_from_slice(&(term.len() as u32).to_le_bytes());
        bytes.extend_from_slice(term);
    }

    let checksum = crc32fast::hash(&bytes);
    bytes.extend_from_slice(&checksum.to_le_bytes());
    bytes
}

/// Reconstruct a quad from its stored value.
pub fn decode_value(bytes: &[u8]) -> Result<Quad, ValueError> {
    if bytes.len() < 4 * LEN_SIZE + CHECKSUM_SIZE {
        return Err(ValueError::Truncated);
    }

    let body_len = bytes.len() - CHECKSUM_SIZE;
    let stored_checksum = u32::from_le_bytes([
        bytes[body_len],
        bytes[body_len + 1],
        bytes[body_len + 2],
        bytes[body_len + 3],
    ]);
    let computed_checksum = crc32fast::hash(&bytes[..body_len]);
    if stored_checksum != computed_checksum {
        return Err(ValueError::ChecksumMismatch {
            expected: stored_checksum,
            actual: computed_checksum,
        });
    }

    let body = &bytes[..body_len];
    let mut offset = 0;
    let mut terms: [Term; 4] = Default::default();
    for term in &mut terms {
        *term = read_term(body, &mut offset)?;
    }
    if offset != body.len() {
        return Err(ValueError::TrailingBytes(body.len() - offset));
    }

    let [subject, predicate, object, graph] = terms;
    Ok(Quad {
        subject,
        predicate,
        object,
        graph,
    })
}

fn read_term(body: &[u8], offset: &mut usize) -> Result<Term, ValueError> {
    let len_end = *offset + LEN_SIZE;
    if len_end > body.len() {
        return Err(ValueError::Truncated);
    }
    let len = u32::from_le_bytes([
        body[*offset],
        body[*offset + 1],
        body[*offset + 2],
        body[*offset + 3],
    ]) as usize;

    let end = len_end.checked_add(len).ok_or(ValueError::Truncated)?;
    if end > body.len() {
        return Err(ValueError::Truncated);
    }
    let value = std::str::from_utf8(&body[len_end..end]).map_err(|_| ValueError::InvalidUtf8)?;
    *offset = end;
    Ok(Term::from(value))
}

/// Errors that can occur while decoding a stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value ends before all four terms were read.
    Truncated,
    /// The checksum does not match the payload.
    ChecksumMismatch { expected: u32, actual: u32 },
    /// A term is not valid UTF-8.
    InvalidUtf8,
    /// Bytes remain after the fourth term.
    TrailingBytes(usize),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "stored value is truncated"),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "stored value checksum mismatch: expected {expected:#010x}, got {actual:#010x}"
            ),
            Self::InvalidUtf8 => write!(f, "stored term is not valid UTF-8"),
            Self::TrailingBytes(n) => write!(f, "stored value has {n} trailing bytes"),
        }
    }
}

impl std::error::Error for ValueError {}
