//! Typed-term adapter.
//!
//! `TypedStore` wraps a `QuadStore` and translates structured terms to and
//! from the store's string terms through a `TermCodec`. The wrapped store is
//! unchanged; the adapter only converts at the edges.
//!
//! A typed quad without a graph lives in the store's default graph, and
//! reading the default graph back yields `graph: None`.

use std::fmt;
use std::pin::pin;
use std::sync::Arc;

use futures::stream::BoxStream;
use futures::{Stream, StreamExt, TryStreamExt};

use crate::backend::KvBackend;
use crate::error::{QuadstoreError, Result};
use crate::query::{ApproximateSize, ScanOptions};
use crate::store::QuadStore;
use crate::types::{Pattern, Quad, Term, TermName};

/// Converts typed terms to and from store terms.
///
/// Encoding must be injective and must never produce the key separator or
/// boundary.
pub trait TermCodec: Send + Sync + 'static {
    type Term: Clone + Send + 'static;
    type Error: fmt::Display;

    fn encode(&self, term: &Self::Term) -> std::result::Result<Term, Self::Error>;

    fn decode(&self, term: &Term) -> std::result::Result<Self::Term, Self::Error>;
}

/// A quad of typed terms. `graph: None` is the default graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedQuad<T> {
    pub subject: T,
    pub predicate: T,
    pub object: T,
    pub graph: Option<T>,
}

impl<T> TypedQuad<T> {
    pub const fn new(subject: T, predicate: T, object: T, graph: Option<T>) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }
}

/// A quad store speaking typed terms.
pub struct TypedStore<B, C> {
    store: QuadStore<B>,
    codec: Arc<C>,
}

impl<B, C> Clone for TypedStore<B, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<B: KvBackend, C: TermCodec> TypedStore<B, C> {
    #[must_use]
    pub fn new(store: QuadStore<B>, codec: C) -> Self {
        Self {
            store,
            codec: Arc::new(codec),
        }
    }

    /// The wrapped store.
    #[must_use]
    pub const fn store(&self) -> &QuadStore<B> {
        &self.store
    }

    pub async fn put(&self, quad: &TypedQuad<C::Term>) -> Result<()> {
        self.store.put(&self.encode_quad(quad)?).await
    }

    pub async fn del(&self, quad: &TypedQuad<C::Term>) -> Result<()> {
        self.store.del(&self.encode_quad(quad)?).await
    }

    pub async fn patch(&self, old: &TypedQuad<C::Term>, new: &TypedQuad<C::Term>) -> Result<()> {
        self.store
            .patch(&self.encode_quad(old)?, &self.encode_quad(new)?)
            .await
    }

    /// Stream the quads matching the given terms. `None` matches anything.
    pub fn match_quads(
        &self,
        subject: Option<&C::Term>,
        predicate: Option<&C::Term>,
        object: Option<&C::Term>,
        graph: Option<&C::Term>,
    ) -> Result<BoxStream<'static, Result<TypedQuad<C::Term>>>> {
        let pattern = self.pattern([subject, predicate, object, graph])?;
        let quads = self.store.get_stream(&pattern, ScanOptions::new())?.items;
        let codec = Arc::clone(&self.codec);
        let default_graph = self.store.config().default_graph.clone();
        Ok(quads
            .and_then(move |quad| {
                futures::future::ready(decode_quad(&*codec, &default_graph, &quad))
            })
            .boxed())
    }

    /// Store every quad of a stream. Returns the number of quads written.
    pub async fn import<S>(&self, source: S) -> Result<usize>
    where
        S: Stream<Item = TypedQuad<C::Term>> + Send,
    {
        self.drain(source, true).await
    }

    /// Delete every quad of a stream. Returns the number of quads processed.
    pub async fn remove<S>(&self, source: S) -> Result<usize>
    where
        S: Stream<Item = TypedQuad<C::Term>> + Send,
    {
        self.drain(source, false).await
    }

    /// Delete every quad matching the given terms.
    pub async fn remove_matches(
        &self,
        subject: Option<&C::Term>,
        predicate: Option<&C::Term>,
        object: Option<&C::Term>,
        graph: Option<&C::Term>,
    ) -> Result<usize> {
        let pattern = self.pattern([subject, predicate, object, graph])?;
        self.store.del_matches(&pattern).await
    }

    /// Delete every quad of a graph.
    pub async fn delete_graph(&self, graph: &C::Term) -> Result<usize> {
        self.remove_matches(None, None, None, Some(graph)).await
    }

    /// Advisory number of quads matching the given terms.
    pub async fn approximate_size(
        &self,
        subject: Option<&C::Term>,
        predicate: Option<&C::Term>,
        object: Option<&C::Term>,
        graph: Option<&C::Term>,
    ) -> Result<ApproximateSize> {
        let pattern = self.pattern([subject, predicate, object, graph])?;
        self.store.get_approximate_size(&pattern).await
    }

    async fn drain<S>(&self, source: S, put: bool) -> Result<usize>
    where
        S: Stream<Item = TypedQuad<C::Term>> + Send,
    {
        let batch_size = self.store.config().stream_batch_size;
        let mut chunks = pin!(source.chunks(batch_size));
        let mut count = 0;
        while let Some(chunk) = chunks.next().await {
            let quads = chunk
                .iter()
                .map(|quad| self.encode_quad(quad))
                .collect::<Result<Vec<_>>>()?;
            if put {
                self.store.multi_put(&quads).await?;
            } else {
                self.store.multi_del(&quads).await?;
            }
            count += quads.len();
        }
        Ok(count)
    }

    fn encode(&self, term: &C::Term) -> Result<Term> {
        self.codec
            .encode(term)
            .map_err(|e| QuadstoreError::Term(e.to_string()))
    }

    fn encode_quad(&self, quad: &TypedQuad<C::Term>) -> Result<Quad> {
        let graph = match &quad.graph {
            Some(graph) => self.encode(graph)?,
            None => self.store.config().default_graph.clone(),
        };
        Ok(Quad {
            subject: self.encode(&quad.subject)?,
            predicate: self.encode(&quad.predicate)?,
            object: self.encode(&quad.object)?,
            graph,
        })
    }

    fn pattern(&self, terms: [Option<&C::Term>; 4]) -> Result<Pattern> {
        let mut pattern = Pattern::new();
        for (name, term) in TermName::ALL.into_iter().zip(terms) {
            if let Some(term) = term {
                pattern = pattern.with(name, self.encode(term)?);
            }
        }
        Ok(pattern)
    }
}

fn decode_quad<C: TermCodec>(
    codec: &C,
    default_graph: &Term,
    quad: &Quad,
) -> Result<TypedQuad<C::Term>> {
    let decode = |term: &Term| {
        codec
            .decode(term)
            .map_err(|e| QuadstoreError::Term(e.to_string()))
    };
    let graph = if &quad.graph == default_graph {
        None
    } else {
        Some(decode(&quad.graph)?)
    };
    Ok(TypedQuad {
        subject: decode(&quad.subject)?,
        predicate: decode(&quad.predicate)?,
        object: decode(&quad.object)?,
        graph,
    })
}
