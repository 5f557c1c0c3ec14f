//! Scan execution.
//!
//! Turns a `ScanPlan` into a lazy stream of decoded quads. When the plan has
//! no residual filter, offset and limit are handed to the backend; otherwise
//! they are applied after filtering, since the backend's offset and limit
//! count raw keys.

use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt, future};

use super::estimate::ApproximateSize;
use super::planner::ScanPlan;
use crate::backend::{KvBackend, RangeOptions};
use crate::codec::decode_value;
use crate::error::Result;
use crate::types::Quad;

/// Offset and limit of a scan or search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl ScanOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A decoded quad together with the key it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub key: Vec<u8>,
    pub quad: Quad,
}

/// Stream the entries admitted by a plan, in index order.
pub fn scan_entries<B: KvBackend>(
    backend: &B,
    plan: &ScanPlan,
    options: ScanOptions,
) -> BoxStream<'static, Result<ScanEntry>> {
    let push_down = plan.residual.is_empty();
    let mut range = RangeOptions::new(plan.lower.clone(), plan.upper.clone());
    if push_down {
        range.offset = options.offset;
        range.limit = options.limit;
    }

    let residual = plan.residual.clone();
    let entries = backend
        .range(range)
        .map(|item| -> Result<ScanEntry> {
            let pair = item?;
            let quad = decode_value(&pair.value)?;
            Ok(ScanEntry { key: pair.key, quad })
        })
        .try_filter(move |entry| future::ready(residual.matches(&entry.quad)))
        .boxed();

    if push_down {
        paginate(entries, ScanOptions::new())
    } else {
        paginate(entries, options)
    }
}

/// Stream the quads admitted by a plan, in index order.
pub fn scan_quads<B: KvBackend>(
    backend: &B,
    plan: &ScanPlan,
    options: ScanOptions,
) -> BoxStream<'static, Result<Quad>> {
    scan_entries(backend, plan, options)
        .map_ok(|entry| entry.quad)
        .boxed()
}

/// Ask the backend how many keys a plan's range covers.
pub async fn approximate_size<B: KvBackend>(
    backend: &B,
    plan: &ScanPlan,
) -> Result<ApproximateSize> {
    let (start, end) = plan.size_range();
    let size = backend.approximate_size(start, end).await?;
    Ok(size.map_or(ApproximateSize::Unknown, ApproximateSize::Estimate))
}

/// Apply offset and limit to a fallible stream.
///
/// Errors are never skipped, and the stream ends right after the first one.
/// Once the limit is reached the source is not polled again.
pub(crate) fn paginate<T: Send + 'static>(
    source: BoxStream<'static, Result<T>>,
    options: ScanOptions,
) -> BoxStream<'static, Result<T>> {
    stream::unfold(
        (source, options.offset, options.limit),
        |(mut source, mut to_skip, remaining)| async move {
            if remaining == Some(0) {
                return None;
            }
            loop {
                match source.next().await? {
                    Err(e) => return Some((Err(e), (source, 0, Some(0)))),
                    Ok(_) if to_skip > 0 => to_skip -= 1,
                    Ok(item) => {
                        let remaining = remaining.map(|n| n - 1);
                        return Some((Ok(item), (source, to_skip, remaining)));
                    }
                }
            }
        },
    )
    .boxed()
}
