//! Top-level error type.

use crate::backend::BackendError;
use crate::codec::{EncodingError, ValueError};
use crate::config::ConfigError;

/// Errors returned by store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuadstoreError {
    /// Malformed pattern, stage or options. Rejected before backend access.
    Validation(String),
    /// A term contains the separator or boundary sequence.
    Encoding(EncodingError),
    /// Inconsistent stage list. Rejected before backend access.
    Plan(String),
    /// Failure reported by the backend, passed through unmodified.
    Backend(BackendError),
    /// A stored value could not be decoded.
    Value(ValueError),
    /// Invalid store configuration.
    Config(ConfigError),
    /// A typed term could not be converted.
    Term(String),
}

impl std::fmt::Display for QuadstoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Encoding(e) => write!(f, "encoding error: {e}"),
            Self::Plan(msg) => write!(f, "plan error: {msg}"),
            Self::Backend(e) => write!(f, "backend error: {e}"),
            Self::Value(e) => write!(f, "value error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Term(msg) => write!(f, "term error: {msg}"),
        }
    }
}

impl std::error::Error for QuadstoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encoding(e) => Some(e),
            Self::Backend(e) => Some(e),
            Self::Value(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Validation(_) | Self::Plan(_) | Self::Term(_) => None,
        }
    }
}

impl From<EncodingError> for QuadstoreError {
    fn from(e: EncodingError) -> Self {
        Self::Encoding(e)
    }
}

impl From<BackendError> for QuadstoreError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

impl From<ValueError> for QuadstoreError {
    fn from(e: ValueError) -> Self {
        Self::Value(e)
    }
}

impl From<ConfigError> for QuadstoreError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = QuadstoreError> = std::result::Result<T, E>;
