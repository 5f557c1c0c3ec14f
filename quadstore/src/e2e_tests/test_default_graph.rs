//! Test: graph-less quads land in the configured default graph.

use super::helpers::open_store;
use crate::backend::MemoryBackend;
use crate::config::StoreConfig;
use crate::query::ScanOptions;
use crate::store::QuadStore;
use crate::types::{Pattern, Quad};

#[tokio::test]
async fn test_triple_is_stored_in_default_graph() {
    let store = open_store();
    store.put(&Quad::triple("s", "p", "o")).await.expect("put");

    let result = store
        .get(&Pattern::new().graph("DEFAULT_GRAPH"), ScanOptions::new())
        .await
        .expect("get");
    assert_eq!(result.items, [Quad::new("s", "p", "o", "DEFAULT_GRAPH")]);

    store.del(&Quad::triple("s", "p", "o")).await.expect("del");
    let result = store.get(&Pattern::new(), ScanOptions::new()).await.expect("get");
    assert!(result.items.is_empty());
}

#[tokio::test]
async fn test_custom_default_graph() {
    let config = StoreConfig::default().default_graph("urn:graph:main");
    let store = QuadStore::open(MemoryBackend::new(), config).expect("open");
    store
        .multi_put(&[Quad::triple("s", "p", "o"), Quad::new("s", "p", "o", "other")])
        .await
        .expect("put");

    let result = store
        .get(&Pattern::new().graph("urn:graph:main"), ScanOptions::new())
        .await
        .expect("get");
    assert_eq!(result.items, [Quad::new("s", "p", "o", "urn:graph:main")]);

    let deleted = store
        .del_matches(&Pattern::new().graph("other"))
        .await
        .expect("del matches");
    assert_eq!(deleted, 1);
    assert_eq!(store.backend().len().await, store.registry().len());
}
