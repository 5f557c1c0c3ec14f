//! Test: random patterns return exactly what a linear filter returns.

use rand::Rng;
use rand::rngs::StdRng;

use super::helpers::{brute_force, random_quads, random_term, seeded_rng, sorted, store_with};
use crate::query::{ScanOptions, quad_comparator};
use crate::types::{Pattern, TermName, TermRange};

const ROUNDS: usize = 200;

fn slot_prefix(name: TermName) -> &'static str {
    match name {
        TermName::Subject => "s",
        TermName::Predicate => "p",
        TermName::Object => "o",
        TermName::Graph => "g",
    }
}

fn random_term_range(rng: &mut StdRng, prefix: &str) -> TermRange {
    let mut range = TermRange::new();
    match rng.random_range(0..3) {
        0 => range = range.gt(random_term(rng, prefix, 12)),
        1 => range = range.gte(random_term(rng, prefix, 12)),
        _ => {}
    }
    match rng.random_range(0..3) {
        0 => range = range.lt(random_term(rng, prefix, 12)),
        1 => range = range.lte(random_term(rng, prefix, 12)),
        _ => {}
    }
    range
}

/// A pattern with random exact slots and at most one ranged slot.
fn random_pattern(rng: &mut StdRng) -> Pattern {
    let ranged = rng
        .random_bool(0.5)
        .then(|| TermName::ALL[rng.random_range(0..4)]);
    let mut pattern = Pattern::new();
    for name in TermName::ALL {
        let prefix = slot_prefix(name);
        if Some(name) == ranged {
            pattern = pattern.with(name, random_term_range(rng, prefix));
        } else if rng.random_bool(0.4) {
            pattern = pattern.with(name, random_term(rng, prefix, 6));
        }
    }
    pattern
}

#[tokio::test]
async fn test_random_patterns_match_brute_force() {
    let mut rng = seeded_rng(7);
    let quads = random_quads(&mut rng, 150);
    let store = store_with(&quads).await;

    for round in 0..ROUNDS {
        let pattern = random_pattern(&mut rng);
        let result = store.get(&pattern, ScanOptions::new()).await.expect("get");

        let compare = quad_comparator(&result.sorting);
        assert!(
            result.items.windows(2).all(|w| compare(&w[0], &w[1]).is_lt()),
            "round {round}: {pattern:?} not in {:?} order",
            result.sorting
        );
        assert_eq!(
            sorted(result.items),
            brute_force(&quads, &pattern),
            "round {round}: {pattern:?}"
        );
    }
}

#[tokio::test]
async fn test_random_patterns_with_offset_and_limit() {
    let mut rng = seeded_rng(11);
    let quads = random_quads(&mut rng, 100);
    let store = store_with(&quads).await;

    for round in 0..ROUNDS / 4 {
        let pattern = random_pattern(&mut rng);
        let everything = store.get(&pattern, ScanOptions::new()).await.expect("get");
        let offset = rng.random_range(0..4);
        let limit = rng.random_range(1..5);

        let page = store
            .get(&pattern, ScanOptions::new().offset(offset).limit(limit))
            .await
            .expect("get page");
        let expected: Vec<_> = everything.items.into_iter().skip(offset).take(limit).collect();
        assert_eq!(page.items, expected, "round {round}: {pattern:?}");
    }
}
