#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

// Life of a write:
// 1. Quads come in (default graph applied to graph-less quads)
// 2. Every term is checked against the key codec's sentinels
// 3. One key per registered index, all in a single backend batch
//
// Life of a read:
// 1. Pattern comes in
// 2. Range planner picks the index with the longest usable prefix
// 3. Scan executor streams the key range, decodes values, applies the residual
//    filter and offset/limit
//    For searches:
//     - Join executor binds each stage's variables and re-plans the next
//       stage per partial binding
//
// System components:
//  - Key codec + index registry
//  - Range planner / scan executor / join executor
//  - Mutation engine over an ordered key-value backend

pub mod adapter;
pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod query;
pub mod store;
pub mod types;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod testing;

pub use adapter::{TermCodec, TypedQuad, TypedStore};
pub use backend::{BackendError, KvBackend, MemoryBackend};
pub use config::StoreConfig;
pub use error::{QuadstoreError, Result};
pub use query::{
    ApproximateSize, Binding, FilterOp, ScanOptions, Search, SearchFilter, SearchStage, StageTerm,
};
pub use store::{GetResult, QuadStore, SearchResult};
pub use types::{Pattern, Quad, Term, TermMatch, TermName, TermRange};
