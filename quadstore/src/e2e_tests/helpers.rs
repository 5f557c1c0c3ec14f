//! Common helpers for end-to-end tests.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::backend::MemoryBackend;
use crate::store::QuadStore;
use crate::testing::{RecordingBackend, init_tracing};
use crate::types::{Pattern, Quad};

pub type RecordingStore = QuadStore<RecordingBackend<MemoryBackend>>;

/// Open an empty store over a fresh in-memory backend.
#[must_use]
pub fn open_store() -> QuadStore<MemoryBackend> {
    init_tracing();
    QuadStore::with_defaults(MemoryBackend::new()).expect("Failed to open store")
}

/// Open an empty store whose backend counts range and batch calls.
#[must_use]
pub fn open_recording_store() -> RecordingStore {
    init_tracing();
    QuadStore::with_defaults(RecordingBackend::new(MemoryBackend::new()))
        .expect("Failed to open store")
}

/// Open a store holding the given quads.
pub async fn store_with(quads: &[Quad]) -> QuadStore<MemoryBackend> {
    let store = open_store();
    store.multi_put(quads).await.expect("Failed to put quads");
    store
}

/// Deterministic random generator for brute-force comparisons.
#[must_use]
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Pick a term from a small vocabulary so that random quads collide often.
pub fn random_term(rng: &mut StdRng, prefix: &str, vocabulary: usize) -> String {
    format!("{prefix}{}", rng.random_range(0..vocabulary))
}

/// Generate `n` random quads (duplicates collapse once stored).
pub fn random_quads(rng: &mut StdRng, n: usize) -> Vec<Quad> {
    (0..n)
        .map(|_| {
            Quad::new(
                random_term(rng, "s", 6),
                random_term(rng, "p", 4),
                random_term(rng, "o", 12),
                random_term(rng, "g", 3),
            )
        })
        .collect()
}

/// The quads a pattern should match, computed without any index.
#[must_use]
pub fn brute_force(quads: &[Quad], pattern: &Pattern) -> Vec<Quad> {
    let mut matching: Vec<Quad> = quads.iter().filter(|q| pattern.matches(q)).cloned().collect();
    matching.sort();
    matching.dedup();
    matching
}

/// Sort a result for order-insensitive comparison.
#[must_use]
pub fn sorted<T: Ord>(mut items: Vec<T>) -> Vec<T> {
    items.sort();
    items
}
