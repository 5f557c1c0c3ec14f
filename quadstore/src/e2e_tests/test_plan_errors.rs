//! Test: ill-formed searches and patterns fail before any backend access.

use super::helpers::open_recording_store;
use crate::error::QuadstoreError;
use crate::query::{FilterOp, ScanOptions, Search, SearchFilter, SearchStage, StageTerm};
use crate::types::{Pattern, TermRange};

#[tokio::test]
async fn test_unbound_input_is_plan_error() {
    let store = open_recording_store();
    let search = Search::new()
        .stage(SearchStage::new().subject(StageTerm::var("a")))
        .stage(SearchStage::new().subject(StageTerm::input("b")));

    let err = store
        .search_stream(&search, ScanOptions::new())
        .err()
        .expect("plan error");
    assert!(matches!(err, QuadstoreError::Plan(_)));
    assert_eq!(store.backend().range_calls(), 0);
}

#[tokio::test]
async fn test_filter_on_unknown_variable_is_plan_error() {
    let store = open_recording_store();
    let search = Search::new()
        .stage(SearchStage::new().subject(StageTerm::var("a")))
        .filter(SearchFilter::new(FilterOp::Gt, "nope", "x"));

    let err = store.search(&search, ScanOptions::new()).await.expect_err("plan error");
    assert!(matches!(err, QuadstoreError::Plan(_)));
    assert_eq!(store.backend().range_calls(), 0);
}

#[tokio::test]
async fn test_empty_search_is_plan_error() {
    let store = open_recording_store();
    let err = store.search(&Search::new(), ScanOptions::new()).await.expect_err("plan error");
    assert!(matches!(err, QuadstoreError::Plan(_)));
    assert_eq!(store.backend().range_calls(), 0);
}

#[tokio::test]
async fn test_two_ranges_are_validation_errors() {
    let store = open_recording_store();
    let pattern = Pattern::new()
        .subject(TermRange::new().gte("a"))
        .object(TermRange::new().lt("z"));
    let err = store.get(&pattern, ScanOptions::new()).await.expect_err("validation");
    assert!(matches!(err, QuadstoreError::Validation(_)));

    let search = Search::new().stage(
        SearchStage::new()
            .subject(TermRange::new().gte("a"))
            .object(TermRange::new().lt("z")),
    );
    let err = store.search(&search, ScanOptions::new()).await.expect_err("validation");
    assert!(matches!(err, QuadstoreError::Validation(_)));
    assert_eq!(store.backend().range_calls(), 0);
}

#[tokio::test]
async fn test_reserved_sequence_is_encoding_error() {
    let store = open_recording_store();
    let pattern = Pattern::new().subject("a\u{10FFFF}");
    let err = store.get(&pattern, ScanOptions::new()).await.expect_err("encoding");
    assert!(matches!(err, QuadstoreError::Encoding(_)));
    assert_eq!(store.backend().range_calls(), 0);
}
