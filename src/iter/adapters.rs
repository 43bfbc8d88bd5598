//! Sequence adapters
//!
//! Each adapter owns its upstream sequence and is itself a sequence.
//! After forwarding an error (or reaching the end) an adapter is
//! terminated and never polls its upstream again.

use crate::error::Result;
use futures::ready;
use futures::stream::{FusedStream, Stream};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

// ============================================================================
// Take
// ============================================================================

pin_project! {
    /// Sequence returned by [`take`]
    #[derive(Debug)]
    #[must_use = "sequences do nothing unless polled"]
    pub struct Take<S> {
        #[pin]
        stream: S,
        remaining: usize,
        done: bool,
    }
}

/// Yield at most `n` items from `seq`.
///
/// The source is not polled again once `n` items were delivered, so an
/// error that would only arrive after the n-th item is never observed.
/// `take(seq, 0)` never polls the source at all.
pub fn take<T, S>(seq: S, n: usize) -> Take<S>
where
    S: Stream<Item = Result<T>>,
{
    Take {
        stream: seq,
        remaining: n,
        done: false,
    }
}

impl<T, S> Stream for Take<S>
where
    S: Stream<Item = Result<T>>,
{
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done || *this.remaining == 0 {
            return Poll::Ready(None);
        }

        match ready!(this.stream.poll_next(cx)) {
            Some(Ok(item)) => {
                *this.remaining -= 1;
                Poll::Ready(Some(Ok(item)))
            }
            Some(Err(err)) => {
                *this.done = true;
                Poll::Ready(Some(Err(err)))
            }
            None => {
                *this.done = true;
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done || self.remaining == 0 {
            return (0, Some(0));
        }
        let (lower, upper) = self.stream.size_hint();
        // One extra slot for a terminal error
        let cap = self.remaining.saturating_add(1);
        (
            lower.min(self.remaining),
            Some(upper.map_or(cap, |u| u.min(cap))),
        )
    }
}

impl<T, S> FusedStream for Take<S>
where
    S: Stream<Item = Result<T>>,
{
    fn is_terminated(&self) -> bool {
        self.done || self.remaining == 0
    }
}

// ============================================================================
// Filter
// ============================================================================

pin_project! {
    /// Sequence returned by [`filter`]
    #[must_use = "sequences do nothing unless polled"]
    pub struct Filter<S, F> {
        #[pin]
        stream: S,
        predicate: F,
        done: bool,
    }
}

/// Yield only the items of `seq` for which `predicate` returns true.
///
/// An upstream error is forwarded once, regardless of the predicate, and
/// ends the sequence.
pub fn filter<T, S, F>(seq: S, predicate: F) -> Filter<S, F>
where
    S: Stream<Item = Result<T>>,
    F: FnMut(&T) -> bool,
{
    Filter {
        stream: seq,
        predicate,
        done: false,
    }
}

impl<T, S, F> Stream for Filter<S, F>
where
    S: Stream<Item = Result<T>>,
    F: FnMut(&T) -> bool,
{
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }

        loop {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(Ok(item)) => {
                    if (this.predicate)(&item) {
                        return Poll::Ready(Some(Ok(item)));
                    }
                }
                Some(Err(err)) => {
                    *this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                None => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        (0, self.stream.size_hint().1)
    }
}

impl<T, S, F> FusedStream for Filter<S, F>
where
    S: Stream<Item = Result<T>>,
    F: FnMut(&T) -> bool,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl<S: std::fmt::Debug, F> std::fmt::Debug for Filter<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("stream", &self.stream)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Map
// ============================================================================

pin_project! {
    /// Sequence returned by [`map`]
    #[must_use = "sequences do nothing unless polled"]
    pub struct Map<S, F> {
        #[pin]
        stream: S,
        f: F,
        done: bool,
    }
}

/// Transform each item of `seq` with `f`.
///
/// Errors pass through untouched and end the sequence.
pub fn map<T, U, S, F>(seq: S, f: F) -> Map<S, F>
where
    S: Stream<Item = Result<T>>,
    F: FnMut(T) -> U,
{
    Map {
        stream: seq,
        f,
        done: false,
    }
}

impl<T, U, S, F> Stream for Map<S, F>
where
    S: Stream<Item = Result<T>>,
    F: FnMut(T) -> U,
{
    type Item = Result<U>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }

        match ready!(this.stream.poll_next(cx)) {
            Some(Ok(item)) => Poll::Ready(Some(Ok((this.f)(item)))),
            Some(Err(err)) => {
                *this.done = true;
                Poll::Ready(Some(Err(err)))
            }
            None => {
                *this.done = true;
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        self.stream.size_hint()
    }
}

impl<T, U, S, F> FusedStream for Map<S, F>
where
    S: Stream<Item = Result<T>>,
    F: FnMut(T) -> U,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

impl<S: std::fmt::Debug, F> std::fmt::Debug for Map<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("stream", &self.stream)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
