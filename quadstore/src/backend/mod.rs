//! Ordered key-value backend abstraction.
//!
//! The store never touches bytes on disk itself. Everything it needs from the
//! storage layer is captured by `KvBackend`:
//! - atomic multi-key batches
//! - lazy ordered range scans
//! - an optional approximate range size
//!
//! This allows the store to run on any ordered key-value engine, and on
//! `MemoryBackend` in tests.
//!
//! # Concurrency
//!
//! The store adds no locking of its own. Whether a range stream opened before
//! a concurrent batch observes that batch is backend-defined: `MemoryBackend`
//! gives a best-effort live view.

mod memory;

pub use memory::MemoryBackend;

use std::fmt;
use std::future::Future;
use std::ops::Bound;

use futures::stream::BoxStream;

/// A single write inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Del { key: Vec<u8> },
}

/// A key-value pair produced by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvPair {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// Parameters of a range scan.
///
/// `offset` and `limit` apply to raw keys, before any filtering done by the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeOptions {
    pub lower: Bound<Vec<u8>>,
    pub upper: Bound<Vec<u8>>,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl RangeOptions {
    /// A range with the given bounds and no offset or limit.
    #[must_use]
    pub const fn new(lower: Bound<Vec<u8>>, upper: Bound<Vec<u8>>) -> Self {
        Self {
            lower,
            upper,
            offset: 0,
            limit: None,
        }
    }
}

/// Check whether a pair of bounds admits no key.
#[must_use]
pub fn bounds_are_empty(lower: &Bound<Vec<u8>>, upper: &Bound<Vec<u8>>) -> bool {
    match (lower, upper) {
        (Bound::Unbounded, _) | (_, Bound::Unbounded) => false,
        (Bound::Included(l), Bound::Included(u)) => l > u,
        (Bound::Included(l) | Bound::Excluded(l), Bound::Excluded(u))
        | (Bound::Excluded(l), Bound::Included(u)) => l >= u,
    }
}

/// An ordered key-value store.
///
/// Keys compare byte-wise. Implementations must apply a batch atomically:
/// after `batch` returns, either every operation is visible or none is.
pub trait KvBackend: Send + Sync + 'static {
    /// Apply a batch of writes atomically.
    fn batch(&self, ops: Vec<BatchOp>) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Lazily stream the pairs inside a range, in key order.
    ///
    /// Dropping the stream releases whatever cursor backs it.
    fn range(&self, options: RangeOptions) -> BoxStream<'static, Result<KvPair, BackendError>>;

    /// Approximate number of keys in `[start, end)`.
    ///
    /// Returns `None` when the backend cannot estimate sizes.
    fn approximate_size(
        &self,
        start: &[u8],
        end: &[u8],
    ) -> impl Future<Output = Result<Option<u64>, BackendError>> + Send {
        let _ = (start, end);
        async { Ok(None) }
    }

    /// Release the backend. Later calls fail with `BackendError::Closed`.
    fn close(&self) -> impl Future<Output = Result<(), BackendError>> + Send {
        async { Ok(()) }
    }
}

/// Errors reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend has been closed.
    Closed,
    /// An I/O failure inside the backend.
    Io(String),
    /// Injected fault for testing.
    InjectedFault(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "backend is closed"),
            Self::Io(msg) => write!(f, "backend I/O error: {msg}"),
            Self::InjectedFault(msg) => write!(f, "injected fault: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
