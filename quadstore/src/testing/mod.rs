use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::BoxStream;
use tracing_subscriber::EnvFilter;

use crate::backend::{BackendError, BatchOp, KvBackend, KvPair, RangeOptions};

/// Install a test log subscriber once.
///
/// Respects `RUST_LOG`; defaults to warnings from this crate only.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quadstore=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A backend wrapper that counts the calls made through it.
///
/// Used to observe which scans the store actually opens.
#[derive(Debug, Default)]
pub struct RecordingBackend<B> {
    inner: B,
    ranges: AtomicUsize,
    batches: AtomicUsize,
}

impl<B> RecordingBackend<B> {
    pub const fn new(inner: B) -> Self {
        Self {
            inner,
            ranges: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
        }
    }

    /// Number of range scans opened so far.
    pub fn range_calls(&self) -> usize {
        self.ranges.load(Ordering::SeqCst)
    }

    /// Number of batches submitted so far, failed ones included.
    pub fn batch_calls(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.ranges.store(0, Ordering::SeqCst);
        self.batches.store(0, Ordering::SeqCst);
    }

    pub const fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: KvBackend> KvBackend for RecordingBackend<B> {
    fn batch(&self, ops: Vec<BatchOp>) -> impl Future<Output = Result<(), BackendError>> + Send {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.inner.batch(ops)
    }

    fn range(&self, options: RangeOptions) -> BoxStream<'static, Result<KvPair, BackendError>> {
        self.ranges.fetch_add(1, Ordering::SeqCst);
        self.inner.range(options)
    }

    fn approximate_size(
        &self,
        start: &[u8],
        end: &[u8],
    ) -> impl Future<Output = Result<Option<u64>, BackendError>> + Send {
        self.inner.approximate_size(start, end)
    }

    fn close(&self) -> impl Future<Output = Result<(), BackendError>> + Send {
        self.inner.close()
    }
}
