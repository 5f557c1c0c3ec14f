//! The quad store handle.
//!
//! A `QuadStore` is an immutable handle: the backend, key codec, index
//! registry and configuration are fixed when it is opened. Cloning a store
//! shares all of them.
//!
//! - `mutation`: put, del and patch, each committed as one atomic batch
//! - `ingest`: draining quad streams into the store
//!
//! # Invariants
//!
//! - Every committed quad is present under every registered index, and its
//!   stored value decodes back to the quad.
//! - No write reaches the backend except through a single `batch` call per
//!   operation.

mod ingest;
mod mutation;

use std::fmt;
use std::sync::Arc;

use futures::TryStreamExt;
use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::info;

use crate::backend::KvBackend;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::index::IndexRegistry;
use crate::query::{
    ApproximateSize, Binding, BindingStream, QuadStream, QueryEngine, ScanOptions, Search,
};
use crate::types::{Pattern, Quad, TermName};

/// Length of a store id.
const STORE_ID_LENGTH: usize = 21;

/// Quads returned by `get`, in the order of the index that served them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetResult {
    pub items: Vec<Quad>,
    /// Slot order of `items`.
    pub sorting: [TermName; 4],
}

/// Bindings returned by `search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub items: Vec<Binding>,
    /// Variables `items` are sorted by.
    pub sorting: Vec<String>,
}

/// A quad store over an ordered key-value backend.
pub struct QuadStore<B> {
    id: Arc<str>,
    engine: Arc<QueryEngine<B>>,
    config: Arc<StoreConfig>,
}

impl<B> Clone for QuadStore<B> {
    fn clone(&self) -> Self {
        Self {
            id: Arc::clone(&self.id),
            engine: Arc::clone(&self.engine),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B: KvBackend> QuadStore<B> {
    /// Open a store over a backend.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the configuration does not validate.
    pub fn open(backend: B, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let registry = config.index_registry()?;
        let codec = config.key_codec();
        let id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(STORE_ID_LENGTH)
            .map(char::from)
            .collect();

        info!(
            store = %id,
            indexes = registry.len(),
            default_graph = %config.default_graph,
            "opened quad store"
        );

        Ok(Self {
            id: Arc::from(id),
            engine: Arc::new(QueryEngine::new(backend, codec, registry)),
            config: Arc::new(config),
        })
    }

    /// Open a store with the default configuration.
    pub fn with_defaults(backend: B) -> Result<Self> {
        Self::open(backend, StoreConfig::default())
    }

    /// Random identifier of this store handle.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &IndexRegistry {
        self.engine.registry()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        self.engine.backend()
    }

    /// Collect the quads matching a pattern.
    pub async fn get(&self, pattern: &Pattern, options: ScanOptions) -> Result<GetResult> {
        let stream = self.get_stream(pattern, options)?;
        let items = stream.items.try_collect().await?;
        Ok(GetResult {
            items,
            sorting: stream.sorting,
        })
    }

    /// Stream the quads matching a pattern.
    ///
    /// # Errors
    ///
    /// Planning errors are returned here; read errors end the stream.
    pub fn get_stream(&self, pattern: &Pattern, options: ScanOptions) -> Result<QuadStream> {
        self.engine.get_stream(pattern, options)
    }

    /// Collect the bindings of a search.
    pub async fn search(&self, search: &Search, options: ScanOptions) -> Result<SearchResult> {
        let stream = self.search_stream(search, options)?;
        let items = stream.items.try_collect().await?;
        Ok(SearchResult {
            items,
            sorting: stream.sorting,
        })
    }

    /// Stream the bindings of a search.
    ///
    /// # Errors
    ///
    /// `Plan` and `Validation` errors are returned before any backend access.
    pub fn search_stream(&self, search: &Search, options: ScanOptions) -> Result<BindingStream> {
        self.engine.search_stream(search, options)
    }

    /// Advisory number of quads matching a pattern.
    pub async fn get_approximate_size(&self, pattern: &Pattern) -> Result<ApproximateSize> {
        self.engine.approximate_size(pattern).await
    }

    /// Close the backend. Later operations fail with `BackendError::Closed`.
    pub async fn close(&self) -> Result<()> {
        self.engine.backend().close().await?;
        info!(store = %self.id, "closed quad store");
        Ok(())
    }
}

impl<B> fmt::Display for QuadStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuadStore::{}", self.id)
    }
}

impl<B> fmt::Debug for QuadStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadStore")
            .field("id", &self.id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
