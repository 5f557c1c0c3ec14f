//! Test: multi-stage searches return exactly the nested-loop join.

use rand::Rng;
use rand::rngs::StdRng;

use super::helpers::{seeded_rng, sorted, store_with};
use crate::query::{Binding, ScanOptions, Search, SearchStage, StageTerm};
use crate::types::Quad;

/// Random graph over a small node set with two predicates.
fn random_graph(rng: &mut StdRng, n: usize) -> Vec<Quad> {
    let mut quads: Vec<Quad> = (0..n)
        .map(|_| {
            let predicate = if rng.random_bool(0.6) { "knows" } else { "likes" };
            Quad::new(
                format!("n{}", rng.random_range(0..8)),
                predicate,
                format!("n{}", rng.random_range(0..8)),
                "g",
            )
        })
        .collect();
    quads.sort();
    quads.dedup();
    quads
}

#[tokio::test]
async fn test_two_stage_join_matches_nested_loop() {
    let mut rng = seeded_rng(42);
    let quads = random_graph(&mut rng, 60);
    let store = store_with(&quads).await;

    for start in 0..8 {
        let subject = format!("n{start}");
        let search = Search::new()
            .stage(
                SearchStage::new()
                    .subject(subject.as_str())
                    .predicate(StageTerm::var("p"))
                    .object(StageTerm::var("o")),
            )
            .stage(
                SearchStage::new()
                    .subject(StageTerm::var("o"))
                    .predicate("knows")
                    .object(StageTerm::var("x")),
            );
        let result = store.search(&search, ScanOptions::new()).await.expect("search");

        let mut expected = Vec::new();
        for first in quads.iter().filter(|q| q.subject.as_str() == subject) {
            for second in quads
                .iter()
                .filter(|q| q.subject == first.object && q.predicate.as_str() == "knows")
            {
                expected.push(
                    Binding::new()
                        .with("p", first.predicate.clone())
                        .with("o", first.object.clone())
                        .with("x", second.object.clone()),
                );
            }
        }

        assert_eq!(sorted(result.items), sorted(expected), "start {subject}");
        assert_eq!(result.sorting.len(), 2);
    }
}

#[tokio::test]
async fn test_repeated_variable_matches_self_loops() {
    let mut rng = seeded_rng(3);
    let mut quads = random_graph(&mut rng, 40);
    quads.push(Quad::new("n5", "knows", "n5", "g"));
    let store = store_with(&quads).await;

    let search = Search::new().stage(
        SearchStage::new()
            .subject(StageTerm::var("a"))
            .predicate("knows")
            .object(StageTerm::var("a")),
    );
    let result = store.search(&search, ScanOptions::new()).await.expect("search");

    let mut expected = sorted(
        quads
            .iter()
            .filter(|q| q.predicate.as_str() == "knows" && q.subject == q.object)
            .map(|q| Binding::new().with("a", q.subject.clone()))
            .collect(),
    );
    expected.dedup();
    assert!(!expected.is_empty());
    assert_eq!(sorted(result.items), expected);
}

#[tokio::test]
async fn test_three_stage_chain() {
    let quads = [
        Quad::new("alice", "knows", "bob", "g"),
        Quad::new("bob", "knows", "carol", "g"),
        Quad::new("carol", "knows", "dave", "g"),
        Quad::new("bob", "knows", "erin", "g"),
    ];
    let store = store_with(&quads).await;

    let hop = |from: &str, to: &str| {
        SearchStage::new()
            .subject(StageTerm::var(from))
            .predicate("knows")
            .object(StageTerm::var(to))
    };
    let search = Search::new()
        .stage(SearchStage::new().subject("alice").predicate("knows").object(StageTerm::var("b")))
        .stage(hop("b", "c"))
        .stage(hop("c", "d"));
    let result = store.search(&search, ScanOptions::new()).await.expect("search");

    assert_eq!(
        result.items,
        [Binding::new().with("b", "bob").with("c", "carol").with("d", "dave")]
    );
    assert_eq!(result.sorting, ["b"]);
}
