//! Tests for the sequence module

use super::*;
use crate::error::{ApiError, Error};
use futures::stream::{self, Stream};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_test::{assert_pending, assert_ready};

fn seq(items: impl IntoIterator<Item = i32>) -> impl Stream<Item = crate::Result<i32>> {
    stream::iter(items.into_iter().map(Ok).collect::<Vec<_>>())
}

fn boom() -> Error {
    Error::Server(ApiError::new(500, "boom"))
}

/// Yields `1, 2, <error>, 4, 5` so adapters that keep pulling after the
/// error would be caught.
fn seq_with_error() -> impl Stream<Item = crate::Result<i32>> {
    stream::iter(vec![Ok(1), Ok(2), Err(boom()), Ok(4), Ok(5)])
}

/// Counts how many items the consumer actually pulled.
fn counted(
    items: impl IntoIterator<Item = i32>,
    pulls: Arc<AtomicUsize>,
) -> impl Stream<Item = crate::Result<i32>> {
    seq(items).map_items(move |x| {
        pulls.fetch_add(1, Ordering::SeqCst);
        x
    })
}

fn is_boom(err: &Error) -> bool {
    matches!(err, Error::Server(api) if api.message == "boom")
}

// ============================================================================
// Collect Tests
// ============================================================================

#[tokio::test]
async fn test_collect_all_items() {
    let collected = collect(seq(1..=5)).await;
    assert!(collected.is_complete());
    assert_eq!(collected.items, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_collect_stops_on_error() {
    let collected = collect(seq_with_error()).await;
    assert!(!collected.is_complete());

    let (items, error) = collected.into_parts();
    assert_eq!(items, vec![1, 2]);
    assert!(is_boom(&error.unwrap()));
}

#[tokio::test]
async fn test_collect_empty_sequence() {
    let collected = collect(seq(Vec::new())).await;
    assert!(collected.items.is_empty());
    assert!(collected.into_result().unwrap().is_empty());
}

#[tokio::test]
async fn test_collected_into_result_discards_partial_items() {
    let result = collect(seq_with_error()).await.into_result();
    assert!(is_boom(&result.unwrap_err()));
}

// ============================================================================
// CollectN Tests
// ============================================================================

#[tokio::test]
async fn test_collect_n_never_pulls_past_n() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let collected = collect_n(counted(1..=5, pulls.clone()), 3).await;

    assert_eq!(collected.items, vec![1, 2, 3]);
    assert!(collected.is_complete());
    assert_eq!(pulls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_collect_n_fewer_than_n() {
    let collected = collect_n(seq(1..=2), 10).await;
    assert_eq!(collected.items, vec![1, 2]);
    assert!(collected.is_complete());
}

#[tokio::test]
async fn test_collect_n_stops_on_error_before_n() {
    let collected = collect_n(seq_with_error(), 4).await;
    assert_eq!(collected.items, vec![1, 2]);
    assert!(is_boom(collected.error.as_ref().unwrap()));
}

#[tokio::test]
async fn test_collect_n_zero_pulls_nothing() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let collected = collect_n(counted(1..=5, pulls.clone()), 0).await;

    assert!(collected.items.is_empty());
    assert_eq!(pulls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// First Tests
// ============================================================================

#[tokio::test]
async fn test_first_returns_first_item() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let item = first(counted(7..=9, pulls.clone())).await.unwrap();
    assert_eq!(item, 7);
    assert_eq!(pulls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_first_empty_sequence() {
    let err = first(seq(Vec::new())).await.unwrap_err();
    assert!(matches!(err, Error::EmptyIterator));
}

#[tokio::test]
async fn test_first_propagates_leading_error() {
    let source = stream::iter(vec![Err(boom()), Ok(1)]);
    let err = first(source).await.unwrap_err();
    assert!(is_boom(&err));
}

// ============================================================================
// Drive Tests
// ============================================================================

#[tokio::test]
async fn test_drive_stops_when_acceptor_declines() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let mut seen = Vec::new();

    drive(counted(1..=10, pulls.clone()), |item| {
        seen.push(item.unwrap());
        seen.len() < 2
    })
    .await;

    assert_eq!(seen, vec![1, 2]);
    assert_eq!(pulls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_drive_error_is_terminal() {
    let mut oks = Vec::new();
    let mut errors = 0;

    // The acceptor asks for more after the error; the drive must still end.
    drive(seq_with_error(), |item| {
        match item {
            Ok(v) => oks.push(v),
            Err(_) => errors += 1,
        }
        true
    })
    .await;

    assert_eq!(oks, vec![1, 2]);
    assert_eq!(errors, 1);
}

// ============================================================================
// Take Tests
// ============================================================================

#[tokio::test]
async fn test_take_n_items() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let collected = collect(take(counted(1..=5, pulls.clone()), 3)).await;
    assert_eq!(collected.items, vec![1, 2, 3]);
    assert_eq!(pulls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_take_all_if_fewer() {
    let collected = collect(take(seq(1..=2), 5)).await;
    assert_eq!(collected.items, vec![1, 2]);
    assert!(collected.is_complete());
}

#[tokio::test]
async fn test_take_propagates_error() {
    let collected = collect(take(seq_with_error(), 4)).await;
    assert_eq!(collected.items, vec![1, 2]);
    assert!(is_boom(collected.error.as_ref().unwrap()));
}

#[tokio::test]
async fn test_take_does_not_wait_for_trailing_error() {
    let collected = collect(take(seq_with_error(), 2)).await;
    assert_eq!(collected.items, vec![1, 2]);
    assert!(collected.is_complete());
}

#[test]
fn test_take_zero_never_polls_source() {
    let mut task = tokio_test::task::spawn(take(stream::pending::<crate::Result<i32>>(), 0));
    assert!(assert_ready!(task.poll_next()).is_none());

    let mut task = tokio_test::task::spawn(take(stream::pending::<crate::Result<i32>>(), 1));
    assert_pending!(task.poll_next());
}

#[tokio::test]
async fn test_take_is_terminated_after_error() {
    use futures::stream::{FusedStream, StreamExt};

    let mut taken = take(seq_with_error(), 10);
    assert!(!taken.is_terminated());
    while taken.next().await.is_some() {}
    assert!(taken.is_terminated());
}

// ============================================================================
// Filter Tests
// ============================================================================

#[tokio::test]
async fn test_filter_items() {
    let collected = collect(filter(seq(1..=10), |x| x % 3 == 0)).await;
    assert_eq!(collected.items, vec![3, 6, 9]);
}

#[tokio::test]
async fn test_filter_no_matches() {
    let collected = collect(filter(seq(1..=10), |x| *x > 100)).await;
    assert!(collected.items.is_empty());
    assert!(collected.is_complete());
}

#[tokio::test]
async fn test_filter_forwards_error_regardless_of_predicate() {
    let collected = collect(filter(seq_with_error(), |_| false)).await;
    assert!(collected.items.is_empty());
    assert!(is_boom(collected.error.as_ref().unwrap()));
}

#[tokio::test]
async fn test_filter_stops_after_error() {
    let collected = collect(filter(seq_with_error(), |_| true)).await;
    assert_eq!(collected.items, vec![1, 2]);
    assert!(collected.error.is_some());
}

// ============================================================================
// Map Tests
// ============================================================================

#[tokio::test]
async fn test_map_items() {
    let collected = collect(map(seq(1..=3), |x| x * 10)).await;
    assert_eq!(collected.items, vec![10, 20, 30]);
}

#[tokio::test]
async fn test_map_to_different_type() {
    let collected = collect(map(seq(1..=3), |x| format!("inc-{x}"))).await;
    assert_eq!(collected.items, vec!["inc-1", "inc-2", "inc-3"]);
}

#[tokio::test]
async fn test_map_carries_error_and_stops() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let collected = collect(map(seq_with_error(), move |x| {
        counter.fetch_add(1, Ordering::SeqCst);
        x.to_string()
    }))
    .await;

    assert_eq!(collected.items, vec!["1", "2"]);
    assert!(is_boom(collected.error.as_ref().unwrap()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Composition Tests
// ============================================================================

#[tokio::test]
async fn test_composition_take_map_filter() {
    let composed = take(map(filter(seq(1..=10), |x| x % 2 == 0), |x| x * 2), 3);
    let collected = collect(composed).await;
    assert_eq!(collected.items, vec![4, 8, 12]);
    assert!(collected.is_complete());
}

#[tokio::test]
async fn test_composition_method_syntax() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let composed = counted(1..=100, pulls.clone())
        .filter_items(|x| x % 2 == 0)
        .map_items(|x| x * 2)
        .take_items(3)
        .filter_items(|x| *x != 8)
        .boxed_seq();

    let collected = collect(composed).await;
    assert_eq!(collected.items, vec![4, 12]);
    // 6 is the last source item needed to produce three even numbers
    assert_eq!(pulls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_composition_error_reaches_consumer_once() {
    let composed = seq_with_error()
        .map_items(|x| x + 1)
        .filter_items(|_| true)
        .take_items(10);

    let mut errors = 0;
    let mut oks = Vec::new();
    drive(composed, |item| {
        match item {
            Ok(v) => oks.push(v),
            Err(_) => errors += 1,
        }
        true
    })
    .await;

    assert_eq!(oks, vec![2, 3]);
    assert_eq!(errors, 1);
}
