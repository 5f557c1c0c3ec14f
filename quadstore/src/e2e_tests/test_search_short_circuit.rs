//! Test: a stage with no matches ends the search without scanning later stages.

use futures::StreamExt;

use super::helpers::open_recording_store;
use crate::query::{ScanOptions, Search, SearchStage, StageTerm};
use crate::types::{Quad, Term};

fn friends_of(subject: &str) -> Search {
    Search::new()
        .stage(
            SearchStage::new()
                .subject(subject)
                .predicate("knows")
                .object(StageTerm::var("friend")),
        )
        .stage(
            SearchStage::new()
                .subject(StageTerm::var("friend"))
                .predicate("name")
                .object(StageTerm::var("name")),
        )
}

#[tokio::test]
async fn test_empty_first_stage_scans_once() {
    let store = open_recording_store();
    store
        .put(&Quad::new("bob", "name", "Bob", "g"))
        .await
        .expect("put");

    let result = store
        .search(&friends_of("nobody"), ScanOptions::new())
        .await
        .expect("search");
    assert!(result.items.is_empty());
    assert_eq!(store.backend().range_calls(), 1);
}

#[tokio::test]
async fn test_second_stage_scanned_per_binding() {
    let store = open_recording_store();
    store
        .multi_put(&[
            Quad::new("alice", "knows", "bob", "g"),
            Quad::new("alice", "knows", "carol", "g"),
            Quad::new("bob", "name", "Bob", "g"),
        ])
        .await
        .expect("put");

    let result = store
        .search(&friends_of("alice"), ScanOptions::new())
        .await
        .expect("search");
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].get("name"), Some(&Term::from("Bob")));
    // One scan for the first stage, one per friend for the second.
    assert_eq!(store.backend().range_calls(), 3);
}

#[tokio::test]
async fn test_search_is_lazy() {
    let store = open_recording_store();
    store
        .multi_put(&[
            Quad::new("alice", "knows", "bob", "g"),
            Quad::new("alice", "knows", "carol", "g"),
            Quad::new("bob", "name", "Bob", "g"),
            Quad::new("carol", "name", "Carol", "g"),
        ])
        .await
        .expect("put");

    let mut stream = store
        .search_stream(&friends_of("alice"), ScanOptions::new())
        .expect("search")
        .items;
    // The first stage's scan is opened but nothing has been read yet.
    assert_eq!(store.backend().range_calls(), 1);

    let first = stream.next().await.expect("one binding").expect("ok");
    assert_eq!(first.get("friend"), Some(&Term::from("bob")));
    assert_eq!(store.backend().range_calls(), 2);
}
