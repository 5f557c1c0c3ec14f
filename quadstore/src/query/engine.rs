//! Query engine.
//!
//! The `QueryEngine` owns the backend handle together with the immutable key
//! codec and index registry, and evaluates single-pattern lookups and
//! multi-stage searches against them. It never writes.

use std::sync::Arc;

use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt, future};
use tracing::trace;

use super::binding::Binding;
use super::estimate::ApproximateSize;
use super::planner::{RangePlanner, ScanPlan};
use super::scan::{self, ScanOptions, paginate};
use super::search::{CompiledSearch, Search};
use crate::backend::KvBackend;
use crate::codec::KeyCodec;
use crate::error::{QuadstoreError, Result};
use crate::index::IndexRegistry;
use crate::types::{Pattern, Quad, TermName};

/// A lazy sequence of quads, in the order of the index that serves it.
pub struct QuadStream {
    /// Slot order of the items.
    pub sorting: [TermName; 4],
    pub items: BoxStream<'static, Result<Quad>>,
}

/// A lazy sequence of bindings.
pub struct BindingStream {
    /// Variables of the first stage, in the order the items are sorted by.
    pub sorting: Vec<String>,
    pub items: BoxStream<'static, Result<Binding>>,
}

/// Read-side engine over a backend.
#[derive(Debug)]
pub struct QueryEngine<B> {
    backend: B,
    codec: KeyCodec,
    registry: IndexRegistry,
}

impl<B: KvBackend> QueryEngine<B> {
    #[must_use]
    pub const fn new(backend: B, codec: KeyCodec, registry: IndexRegistry) -> Self {
        Self {
            backend,
            codec,
            registry,
        }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    #[must_use]
    pub const fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    /// Plan a pattern without reading anything.
    pub fn plan(&self, pattern: &Pattern) -> Result<ScanPlan> {
        RangePlanner::new(&self.registry, &self.codec).plan(pattern)
    }

    /// Stream the quads matching a pattern.
    pub fn get_stream(&self, pattern: &Pattern, options: ScanOptions) -> Result<QuadStream> {
        let plan = self.plan(pattern)?;
        Ok(QuadStream {
            sorting: *plan.sorting(),
            items: scan::scan_quads(&self.backend, &plan, options),
        })
    }

    /// Estimate how many quads match a pattern.
    pub async fn approximate_size(&self, pattern: &Pattern) -> Result<ApproximateSize> {
        let plan = self.plan(pattern)?;
        scan::approximate_size(&self.backend, &plan).await
    }

    /// Stream the bindings of a multi-stage search.
    ///
    /// The search is compiled and its first stage planned before this
    /// returns, so ill-formed searches fail here without any backend access.
    pub fn search_stream(
        self: &Arc<Self>,
        search: &Search,
        options: ScanOptions,
    ) -> Result<BindingStream> {
        let compiled = CompiledSearch::compile(search, &self.codec)?;
        let first = compiled
            .first()
            .ok_or_else(|| QuadstoreError::Plan("search has no stages".to_string()))?;
        let first_plan = self.plan(&first.pattern(&Binding::new())?)?;
        let sorting = first.output_variables(first_plan.sorting());

        let items = run_stage(Arc::clone(self), Arc::new(compiled), 0, Binding::new());
        Ok(BindingStream {
            sorting,
            items: paginate(items, options),
        })
    }
}

/// Evaluate stage `depth` and everything after it for one partial binding.
///
/// A stage that yields no quads ends its branch: later stages are never
/// planned for it.
fn run_stage<B: KvBackend>(
    engine: Arc<QueryEngine<B>>,
    search: Arc<CompiledSearch>,
    depth: usize,
    binding: Binding,
) -> BoxStream<'static, Result<Binding>> {
    let Some(stage) = search.stage(depth) else {
        return stream::once(future::ready(Ok(binding))).boxed();
    };
    let plan = match stage.pattern(&binding).and_then(|pattern| engine.plan(&pattern)) {
        Ok(plan) => plan,
        Err(e) => return stream::once(future::ready(Err(e))).boxed(),
    };
    trace!(depth, binding = %binding, index = %plan.index, "expanding stage");

    let quads = scan::scan_quads(engine.backend(), &plan, ScanOptions::new());
    let stage_search = Arc::clone(&search);
    quads
        .try_filter_map(move |quad| {
            let extended = stage_search
                .stage(depth)
                .and_then(|stage| stage.extend(&binding, &quad));
            future::ready(Ok(extended))
        })
        .map_ok(move |extended| {
            run_stage(Arc::clone(&engine), Arc::clone(&search), depth + 1, extended)
        })
        .try_flatten()
        .boxed()
}
