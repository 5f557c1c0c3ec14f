//! Stream ingestion.
//!
//! A quad source is drained either one quad at a time (batch size 1) or in
//! chunks. In both modes the next item is pulled only after the previous
//! write was acknowledged, so a slow backend slows the source down.

use std::pin::pin;

use futures::{Stream, StreamExt};
use tracing::debug;

use super::QuadStore;
use crate::backend::KvBackend;
use crate::error::{QuadstoreError, Result};
use crate::types::Quad;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Put,
    Del,
}

impl<B: KvBackend> QuadStore<B> {
    /// Store every quad of a stream.
    ///
    /// `batch_size` defaults to the configured stream batch size. Returns the
    /// number of quads written.
    pub async fn put_stream<S>(&self, source: S, batch_size: Option<usize>) -> Result<usize>
    where
        S: Stream<Item = Quad> + Send,
    {
        self.drain(source, batch_size, Direction::Put).await
    }

    /// Delete every quad of a stream.
    ///
    /// `batch_size` defaults to the configured stream batch size. Returns the
    /// number of quads processed.
    pub async fn del_stream<S>(&self, source: S, batch_size: Option<usize>) -> Result<usize>
    where
        S: Stream<Item = Quad> + Send,
    {
        self.drain(source, batch_size, Direction::Del).await
    }

    async fn drain<S>(
        &self,
        source: S,
        batch_size: Option<usize>,
        direction: Direction,
    ) -> Result<usize>
    where
        S: Stream<Item = Quad> + Send,
    {
        let batch_size = batch_size.unwrap_or(self.config.stream_batch_size);
        if batch_size == 0 {
            return Err(QuadstoreError::Validation(
                "stream batch size must be at least 1".to_string(),
            ));
        }

        let mut count = 0;
        if batch_size == 1 {
            let mut source = pin!(source);
            while let Some(quad) = source.next().await {
                match direction {
                    Direction::Put => self.put(&quad).await?,
                    Direction::Del => self.del(&quad).await?,
                }
                count += 1;
            }
        } else {
            let mut chunks = pin!(source.chunks(batch_size));
            while let Some(chunk) = chunks.next().await {
                match direction {
                    Direction::Put => self.multi_put(&chunk).await?,
                    Direction::Del => self.multi_del(&chunk).await?,
                }
                count += chunk.len();
            }
        }

        debug!(store = %self.id, ?direction, quads = count, batch_size, "drained quad stream");
        Ok(count)
    }
}
