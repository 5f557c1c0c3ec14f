//! In-memory ordered backend.
//!
//! Keys live in a `BTreeMap` behind an async `RwLock`:
//! - a batch is applied under a single write lock, so it is atomic
//! - a range stream re-acquires the read lock for every item, so a stream
//!   observes batches committed while it is being consumed (live view)
//! - `approximate_size` is an exact count

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::sync::RwLock;

use super::{BackendError, BatchOp, KvBackend, KvPair, RangeOptions, bounds_are_empty};

type Map = BTreeMap<Vec<u8>, Vec<u8>>;

/// An ordered key-value backend held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<Map>>,
    closed: Arc<AtomicBool>,
    /// Number of upcoming batches that fail with an injected fault.
    failing_batches: AtomicUsize,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` batches fail without applying any write.
    pub fn fail_next_batches(&self, count: usize) {
        self.failing_batches.store(count, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Check whether no key is stored.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Copy out every stored pair in key order.
    pub async fn entries(&self) -> Vec<KvPair> {
        self.data
            .read()
            .await
            .iter()
            .map(|(key, value)| KvPair {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    }

    fn check_open(&self) -> Result<(), BackendError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BackendError::Closed);
        }
        Ok(())
    }

    /// Consume one pending injected failure, if any.
    fn take_injected_failure(&self) -> bool {
        self.failing_batches
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl KvBackend for MemoryBackend {
    async fn batch(&self, ops: Vec<BatchOp>) -> Result<(), BackendError> {
        self.check_open()?;
        if self.take_injected_failure() {
            return Err(BackendError::InjectedFault(format!(
                "batch of {} operations rejected",
                ops.len()
            )));
        }

        let mut data = self.data.write().await;
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    data.insert(key, value);
                }
                BatchOp::Del { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn range(&self, options: RangeOptions) -> BoxStream<'static, Result<KvPair, BackendError>> {
        let cursor = RangeCursor {
            data: Arc::clone(&self.data),
            closed: Arc::clone(&self.closed),
            lower: options.lower,
            upper: options.upper,
            to_skip: options.offset,
            remaining: options.limit,
        };

        // The state becomes `None` after an error so the stream ends there.
        stream::unfold(Some(cursor), |state| async move {
            let mut cursor = state?;
            match cursor.advance().await {
                Ok(Some(pair)) => Some((Ok(pair), Some(cursor))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
        .boxed()
    }

    async fn approximate_size(
        &self,
        start: &[u8],
        end: &[u8],
    ) -> Result<Option<u64>, BackendError> {
        self.check_open()?;
        let lower = Bound::Included(start.to_vec());
        let upper = Bound::Excluded(end.to_vec());
        if bounds_are_empty(&lower, &upper) {
            return Ok(Some(0));
        }
        let data = self.data.read().await;
        let count = data.range::<[u8], _>((Bound::Included(start), Bound::Excluded(end))).count();
        Ok(Some(count as u64))
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

/// Position of a live range scan.
struct RangeCursor {
    data: Arc<RwLock<Map>>,
    closed: Arc<AtomicBool>,
    lower: Bound<Vec<u8>>,
    upper: Bound<Vec<u8>>,
    to_skip: usize,
    remaining: Option<usize>,
}

impl RangeCursor {
    /// Fetch the next pair after the cursor and move past it.
    async fn advance(&mut self) -> Result<Option<KvPair>, BackendError> {
        loop {
            if self.closed.load(Ordering::Acquire) {
                return Err(BackendError::Closed);
            }
            if self.remaining == Some(0) || bounds_are_empty(&self.lower, &self.upper) {
                return Ok(None);
            }

            let next = {
                let data = self.data.read().await;
                let lower = self.lower.as_ref().map(Vec::as_slice);
                let upper = self.upper.as_ref().map(Vec::as_slice);
                data.range::<[u8], _>((lower, upper))
                    .next()
                    .map(|(key, value)| (key.clone(), value.clone()))
            };
            let Some((key, value)) = next else {
                return Ok(None);
            };
            self.lower = Bound::Excluded(key.clone());

            if self.to_skip > 0 {
                self.to_skip -= 1;
                continue;
            }
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= 1;
            }
            return Ok(Some(KvPair { key, value }));
        }
    }
}
