//! Test: a predicate lookup is served by POGS and returns exactly its quads.

use super::helpers::{sorted, store_with};
use crate::query::{ApproximateSize, ScanOptions};
use crate::types::{Pattern, Quad, TermName};

fn sample() -> Vec<Quad> {
    vec![
        Quad::new("a", "b", "c", "G"),
        Quad::new("a", "d", "e", "G"),
        Quad::new("x", "b", "c", "G"),
    ]
}

#[tokio::test]
async fn test_get_by_predicate() {
    let store = store_with(&sample()).await;

    let result = store
        .get(&Pattern::new().predicate("b"), ScanOptions::new())
        .await
        .expect("get");

    assert_eq!(
        sorted(result.items),
        [Quad::new("a", "b", "c", "G"), Quad::new("x", "b", "c", "G")]
    );
    assert_eq!(
        result.sorting,
        [
            TermName::Predicate,
            TermName::Object,
            TermName::Graph,
            TermName::Subject
        ]
    );
}

#[tokio::test]
async fn test_predicate_size_covers_matches() {
    let store = store_with(&sample()).await;
    let size = store
        .get_approximate_size(&Pattern::new().predicate("b"))
        .await
        .expect("size");
    match size {
        ApproximateSize::Estimate(n) => assert!(n >= 2, "estimate {n} below match count"),
        ApproximateSize::Unknown => panic!("memory backend always estimates"),
    }
}

#[tokio::test]
async fn test_full_pattern_and_missing_quad() {
    let store = store_with(&sample()).await;

    let full = Pattern::new().subject("a").predicate("d").object("e").graph("G");
    let found = store.get(&full, ScanOptions::new()).await.expect("get");
    assert_eq!(found.items, [Quad::new("a", "d", "e", "G")]);

    let missing = Pattern::new().subject("a").predicate("d").object("c");
    let found = store.get(&missing, ScanOptions::new()).await.expect("get");
    assert!(found.items.is_empty());
}

#[tokio::test]
async fn test_empty_pattern_returns_everything() {
    let store = store_with(&sample()).await;
    let result = store.get(&Pattern::new(), ScanOptions::new()).await.expect("get");
    assert_eq!(sorted(result.items), sorted(sample()));
}
