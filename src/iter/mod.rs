//! Lazy fallible sequences
//!
//! A sequence is a pull-driven [`Stream`] of `Result<T>` items. It yields
//! zero or more `Ok` items and may end with exactly one `Err`, after which
//! nothing else is produced. Dropping a sequence stops it: nothing upstream
//! runs again, so no further page is fetched.
//!
//! # Overview
//!
//! - [`Seq`] - boxed sequence type returned by searches
//! - [`collect`], [`collect_n`], [`first`], [`drive`] - consumers
//! - [`take`], [`filter`], [`map`] - adapters that are sequences themselves
//! - [`SeqExt`] - method syntax for the adapters
//!
//! Adapters nest freely and each one treats an upstream error as terminal,
//! even if the upstream would keep producing.
//!
//! ```rust,ignore
//! use xsoar_client::iter::{collect, SeqExt};
//!
//! let high = client
//!     .incidents()
//!     .search(&ctx, IncidentFilter::new(), &RequestOptions::new())
//!     .filter_items(|inc| inc.severity >= Severity::High)
//!     .map_items(|inc| inc.id)
//!     .take_items(10);
//! let ids = collect(high).await.into_result()?;
//! ```

mod adapters;
mod consumers;

pub use adapters::{filter, map, take, Filter, Map, Take};
pub use consumers::{collect, collect_n, drive, first, Collected};

use crate::error::Result;
use futures::stream::{BoxStream, Stream, StreamExt};

/// A boxed lazy fallible sequence
pub type Seq<'a, T> = BoxStream<'a, Result<T>>;

/// Adapter methods for any stream of `Result<T>`
pub trait SeqExt<T>: Stream<Item = Result<T>> + Sized {
    /// Yield at most `n` items, then stop pulling the source
    fn take_items(self, n: usize) -> Take<Self> {
        take(self, n)
    }

    /// Yield only the items matching `predicate`
    fn filter_items<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: FnMut(&T) -> bool,
    {
        filter(self, predicate)
    }

    /// Transform every item with `f`
    fn map_items<U, F>(self, f: F) -> Map<Self, F>
    where
        F: FnMut(T) -> U,
    {
        map(self, f)
    }

    /// Erase the concrete adapter type
    fn boxed_seq<'a>(self) -> Seq<'a, T>
    where
        Self: Send + 'a,
    {
        self.boxed()
    }
}

impl<T, S> SeqExt<T> for S where S: Stream<Item = Result<T>> {}

#[cfg(test)]
mod tests;
