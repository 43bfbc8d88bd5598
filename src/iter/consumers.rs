//! Sequence consumers

use crate::error::{Error, Result};
use futures::stream::{Stream, StreamExt};
use std::pin::pin;

/// Upper bound on the capacity reserved up front by [`collect_n`]
const MAX_PREALLOCATE: usize = 1024;

/// Items gathered from a sequence, plus the error that ended it early
#[derive(Debug)]
pub struct Collected<T> {
    /// Items delivered before the sequence ended
    pub items: Vec<T>,
    /// Terminal error, if the sequence did not complete cleanly
    pub error: Option<Error>,
}

impl<T> Collected<T> {
    /// Check if the sequence ended without an error
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Split into the partial items and the terminal error
    pub fn into_parts(self) -> (Vec<T>, Option<Error>) {
        (self.items, self.error)
    }

    /// Convert into a `Result`, discarding partial items on error
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.items),
        }
    }
}

/// Drain the entire sequence.
///
/// Stops at the first error and returns it together with everything
/// collected before it.
pub async fn collect<T, S>(seq: S) -> Collected<T>
where
    S: Stream<Item = Result<T>>,
{
    gather(seq, None).await
}

/// Drain at most `n` items.
///
/// Stops as soon as `n` items are held, without pulling another one.
pub async fn collect_n<T, S>(seq: S, n: usize) -> Collected<T>
where
    S: Stream<Item = Result<T>>,
{
    gather(seq, Some(n)).await
}

async fn gather<T, S>(seq: S, limit: Option<usize>) -> Collected<T>
where
    S: Stream<Item = Result<T>>,
{
    let mut items = Vec::with_capacity(limit.map_or(0, |n| n.min(MAX_PREALLOCATE)));
    if limit == Some(0) {
        return Collected { items, error: None };
    }

    let mut seq = pin!(seq);
    while let Some(next) = seq.next().await {
        match next {
            Ok(item) => {
                items.push(item);
                if limit.is_some_and(|n| items.len() >= n) {
                    break;
                }
            }
            Err(err) => {
                return Collected {
                    items,
                    error: Some(err),
                }
            }
        }
    }

    Collected { items, error: None }
}

/// Return the first item.
///
/// An empty sequence yields [`Error::EmptyIterator`]; if the first pull is
/// itself an error, that error is returned instead.
pub async fn first<T, S>(seq: S) -> Result<T>
where
    S: Stream<Item = Result<T>>,
{
    let mut seq = pin!(seq);
    seq.next().await.unwrap_or(Err(Error::EmptyIterator))
}

/// Push every pair of `seq` into `accept` until it returns `false`.
///
/// An error is handed to `accept` once and always ends the drive,
/// whatever `accept` returns.
pub async fn drive<T, S, F>(seq: S, mut accept: F)
where
    S: Stream<Item = Result<T>>,
    F: FnMut(Result<T>) -> bool,
{
    let mut seq = pin!(seq);
    while let Some(next) = seq.next().await {
        let terminal = next.is_err();
        if !accept(next) || terminal {
            return;
        }
    }
}
