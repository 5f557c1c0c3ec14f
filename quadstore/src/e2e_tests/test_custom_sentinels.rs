//! Test: custom sentinels keep range lookups exact, or reject the term.

use super::helpers::{brute_force, sorted};
use crate::backend::MemoryBackend;
use crate::codec::Violation;
use crate::config::StoreConfig;
use crate::error::QuadstoreError;
use crate::query::{ScanOptions, quad_comparator};
use crate::store::QuadStore;
use crate::types::{Pattern, Quad, TermRange};

fn objects() -> Vec<Quad> {
    ["a", "ab", "\u{e9}", "b", "aa"]
        .iter()
        .map(|o| Quad::new("s", "p", *o, "g"))
        .collect()
}

#[tokio::test]
async fn test_range_lookup_with_custom_sentinels() {
    let config = StoreConfig::default().sentinels("\u{1}", "\u{10FFFE}");
    let store = QuadStore::open(MemoryBackend::new(), config).expect("open");
    let quads = objects();
    store.multi_put(&quads).await.expect("put");

    let everything = store.get(&Pattern::new(), ScanOptions::new()).await.expect("get");
    let compare = quad_comparator(&everything.sorting);
    assert!(everything.items.windows(2).all(|w| compare(&w[0], &w[1]).is_lt()));

    for range in [
        TermRange::new().gte("a"),
        TermRange::new().gt("a"),
        TermRange::new().lt("b"),
        TermRange::new().gte("aa").lte("b"),
    ] {
        let pattern = Pattern::new().object(range);
        let found = store.get(&pattern, ScanOptions::new()).await.expect("get");
        assert_eq!(sorted(found.items), brute_force(&quads, &pattern), "{pattern:?}");
    }
}

#[tokio::test]
async fn test_terms_outside_sentinels_are_rejected() {
    let config = StoreConfig::default().sentinels("|", "~").default_graph("}");
    let store = QuadStore::open(MemoryBackend::new(), config).expect("open");

    let err = store
        .put(&Quad::new("}", "}", "a", "}"))
        .await
        .expect_err("'a' sorts below the separator");
    assert!(matches!(
        err,
        QuadstoreError::Encoding(ref e) if e.violation == Violation::OutOfOrder('a')
    ));
    assert!(store.backend().is_empty().await);

    let pattern = Pattern::new().object(TermRange::new().gte("\u{e9}"));
    let err = store.get(&pattern, ScanOptions::new()).await.expect_err("above the boundary");
    assert!(matches!(err, QuadstoreError::Encoding(_)));

    store.put(&Quad::new("}", "}", "}}", "}")).await.expect("put");
    let found = store
        .get(&Pattern::new().object(TermRange::new().gte("}")), ScanOptions::new())
        .await
        .expect("get");
    assert_eq!(found.items, [Quad::new("}", "}", "}}", "}")]);
}
