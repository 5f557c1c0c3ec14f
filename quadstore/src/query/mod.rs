//! Read path: planning, scanning, joining and estimating.
//!
//! - `planner`: pattern to index range plus residual filter
//! - `scan`: lazy decoded scans with offset and limit
//! - `search`: stages, filters and their compilation
//! - `engine`: the `QueryEngine` tying these to a backend
//! - `comparator`: canonical orders for callers that need one

mod binding;
mod comparator;
mod engine;
mod estimate;
mod planner;
mod scan;
mod search;

pub use binding::Binding;
pub use comparator::{binding_comparator, quad_comparator, term_comparator};
pub use engine::{BindingStream, QueryEngine, QuadStream};
pub use estimate::ApproximateSize;
pub use planner::{RangePlanner, ScanPlan};
pub use scan::{ScanEntry, ScanOptions, approximate_size, scan_entries, scan_quads};
pub use search::{FilterOp, Search, SearchFilter, SearchStage, StageTerm};
