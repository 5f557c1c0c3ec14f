//! Test: every stored quad is present under every index, and nothing else is.

use std::collections::BTreeMap;

use super::helpers::{random_quads, seeded_rng, sorted, store_with};
use crate::backend::MemoryBackend;
use crate::codec::decode_value;
use crate::store::QuadStore;
use crate::types::Quad;

async fn assert_consistent(store: &QuadStore<MemoryBackend>, expected: &[Quad]) {
    let codec = store.config().key_codec();
    let entries: BTreeMap<Vec<u8>, Vec<u8>> = store
        .backend()
        .entries()
        .await
        .into_iter()
        .map(|pair| (pair.key, pair.value))
        .collect();

    assert_eq!(entries.len(), expected.len() * store.registry().len());
    for quad in expected {
        for index in store.registry().all_indexes() {
            let key = index.key(&codec, quad).expect("key").into_bytes();
            let value = entries
                .get(&key)
                .unwrap_or_else(|| panic!("{quad:?} missing from {}", index.name()));
            assert_eq!(&decode_value(value).expect("decode"), quad);
        }
    }
}

#[tokio::test]
async fn test_every_index_holds_every_quad() {
    let mut rng = seeded_rng(5);
    let mut quads = random_quads(&mut rng, 80);
    let store = store_with(&quads).await;

    quads.sort();
    quads.dedup();
    assert_consistent(&store, &quads).await;
}

#[tokio::test]
async fn test_consistency_survives_deletes_and_patches() {
    let mut rng = seeded_rng(9);
    let quads = sorted(random_quads(&mut rng, 60));
    let store = store_with(&quads).await;

    let (removed, kept) = quads.split_at(quads.len() / 2);
    store.multi_del(removed).await.expect("del");
    let mut remaining: Vec<Quad> = kept.iter().filter(|q| !removed.contains(q)).cloned().collect();
    remaining.dedup();
    assert_consistent(&store, &remaining).await;

    let old = remaining[0].clone();
    let new = Quad::new("patched", "p", "o", "g");
    store.patch(&old, &new).await.expect("patch");
    remaining.remove(0);
    remaining.push(new);
    assert_consistent(&store, &remaining).await;
}
