//! Mutations.
//!
//! Every operation fans each quad out to one write per registered index and
//! commits all of them, across all quads, in a single backend batch. Deletes
//! are placed before puts, so patching a quad onto itself leaves it stored.

use futures::TryStreamExt;
use tracing::{debug, warn};

use super::QuadStore;
use crate::backend::{BatchOp, KvBackend};
use crate::codec::encode_value;
use crate::error::Result;
use crate::query::ScanOptions;
use crate::types::{Pattern, Quad};

impl<B: KvBackend> QuadStore<B> {
    /// Store a quad under every index.
    pub async fn put(&self, quad: &Quad) -> Result<()> {
        self.multi_patch(&[], std::slice::from_ref(quad)).await
    }

    /// Store several quads in one batch.
    pub async fn multi_put(&self, quads: &[Quad]) -> Result<()> {
        self.multi_patch(&[], quads).await
    }

    /// Remove a quad from every index.
    pub async fn del(&self, quad: &Quad) -> Result<()> {
        self.multi_patch(std::slice::from_ref(quad), &[]).await
    }

    /// Remove several quads in one batch.
    pub async fn multi_del(&self, quads: &[Quad]) -> Result<()> {
        self.multi_patch(quads, &[]).await
    }

    /// Replace one quad with another in one batch.
    pub async fn patch(&self, old: &Quad, new: &Quad) -> Result<()> {
        self.multi_patch(std::slice::from_ref(old), std::slice::from_ref(new))
            .await
    }

    /// Delete `old` and store `new` in one batch.
    ///
    /// The two lists are independent: they need not have the same length.
    pub async fn multi_patch(&self, old: &[Quad], new: &[Quad]) -> Result<()> {
        let mut ops = Vec::with_capacity((old.len() + new.len()) * self.registry().len());
        for quad in old {
            self.push_dels(&mut ops, quad)?;
        }
        for quad in new {
            self.push_puts(&mut ops, quad)?;
        }
        self.commit(ops).await
    }

    /// Delete every quad matching a pattern, in one batch.
    ///
    /// Returns the number of quads deleted. The matches are read first; a
    /// write committed between the read and the batch is not seen.
    pub async fn del_matches(&self, pattern: &Pattern) -> Result<usize> {
        self.patch_matches(pattern, &[]).await
    }

    /// Delete every quad matching a pattern and store `new`, in one batch.
    ///
    /// Returns the number of quads deleted.
    pub async fn patch_matches(&self, pattern: &Pattern, new: &[Quad]) -> Result<usize> {
        let matches: Vec<Quad> = self
            .get_stream(pattern, ScanOptions::new())?
            .items
            .try_collect()
            .await?;
        self.multi_patch(&matches, new).await?;
        Ok(matches.len())
    }

    fn push_puts(&self, ops: &mut Vec<BatchOp>, quad: &Quad) -> Result<()> {
        let quad = self.with_default_graph(quad);
        let value = encode_value(&quad);
        for index in self.registry().all_indexes() {
            ops.push(BatchOp::Put {
                key: index.key(self.engine.codec(), &quad)?.into_bytes(),
                value: value.clone(),
            });
        }
        Ok(())
    }

    fn push_dels(&self, ops: &mut Vec<BatchOp>, quad: &Quad) -> Result<()> {
        let quad = self.with_default_graph(quad);
        for index in self.registry().all_indexes() {
            ops.push(BatchOp::Del {
                key: index.key(self.engine.codec(), &quad)?.into_bytes(),
            });
        }
        Ok(())
    }

    fn with_default_graph(&self, quad: &Quad) -> Quad {
        quad.clone().with_default_graph(&self.config.default_graph)
    }

    async fn commit(&self, ops: Vec<BatchOp>) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }
        let count = ops.len();
        match self.backend().batch(ops).await {
            Ok(()) => {
                debug!(store = %self.id, ops = count, "committed batch");
                Ok(())
            }
            Err(e) => {
                warn!(store = %self.id, ops = count, error = %e, "batch commit failed");
                Err(e.into())
            }
        }
    }
}
