//! Paginated search engine
//!
//! Turns a [`PageFetcher`] into a single lazy sequence over all pages.
//!
//! Each search moves through `Fetch -> Emit -> (Fetch | Done)`; a failed
//! fetch or a cancelled context jumps straight to `Done` after handing the
//! error to the consumer. Nothing happens between pulls: a page is only
//! requested when the consumer asks for an item past the end of the
//! current one.

use super::types::{normalize_limit, Page, PageRequest};
use crate::context::Context;
use crate::error::Result;
use crate::iter::Seq;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::debug;

/// Fetches a single page of results
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch the page described by `request`.
    ///
    /// A failure must not return a partially populated page.
    async fn fetch_page(&self, ctx: &Context, request: PageRequest) -> Result<Page<T>>;
}

/// Lazily iterate over every item the fetcher can produce.
///
/// `page_size` is normalized once (see [`PageRequest::normalized`]) and used
/// for every fetch. Pages are requested at offsets advanced by the number of
/// items actually received, so a short page never skips items.
pub fn paginate<'a, T, F>(fetcher: F, ctx: Context, page_size: i64) -> Seq<'a, T>
where
    T: Send + 'a,
    F: PageFetcher<T> + 'a,
{
    let search = Search {
        fetcher,
        ctx,
        limit: normalize_limit(page_size),
        phase: Phase::Fetch { offset: 0 },
    };

    stream::unfold(search, |mut search| async move {
        let next = search.advance().await?;
        Some((next, search))
    })
    .boxed()
}

enum Phase<T> {
    Fetch {
        offset: usize,
    },
    Emit {
        items: std::vec::IntoIter<T>,
        next_offset: Option<usize>,
    },
    Done,
}

struct Search<T, F> {
    fetcher: F,
    ctx: Context,
    limit: i64,
    phase: Phase<T>,
}

impl<T, F> Search<T, F>
where
    T: Send,
    F: PageFetcher<T>,
{
    /// Produce the next pair, or `None` once the search is over
    async fn advance(&mut self) -> Option<Result<T>> {
        loop {
            match &mut self.phase {
                Phase::Done => return None,

                Phase::Fetch { offset } => {
                    let request = PageRequest::new(*offset, self.limit);
                    if let Some(err) = self.ctx.err() {
                        self.phase = Phase::Done;
                        return Some(Err(err));
                    }

                    match self.fetcher.fetch_page(&self.ctx, request).await {
                        Ok(page) => self.phase = Self::emit(request, page),
                        Err(err) => {
                            self.phase = Phase::Done;
                            return Some(Err(err));
                        }
                    }
                }

                Phase::Emit { items, next_offset } => {
                    if let Some(item) = items.next() {
                        if let Some(err) = self.ctx.err() {
                            self.phase = Phase::Done;
                            return Some(Err(err));
                        }
                        return Some(Ok(item));
                    }

                    self.phase = match *next_offset {
                        Some(offset) => Phase::Fetch { offset },
                        None => Phase::Done,
                    };
                }
            }
        }
    }

    fn emit(request: PageRequest, page: Page<T>) -> Phase<T> {
        debug!(
            "Fetched page at offset {} (limit {}): {} items of {} total",
            request.offset,
            request.limit,
            page.len(),
            page.total
        );

        // The next fetch must start past the current one, or the search would
        // ask for the same slice again.
        let next_offset = match page.next_offset() {
            Some(next) if page.has_more() && next > request.offset => Some(next),
            next => {
                if page.has_more() || next.is_none() {
                    debug!(
                        "Page at offset {} does not advance (total {}), ending search",
                        page.offset, page.total
                    );
                }
                None
            }
        };

        Phase::Emit {
            items: page.items.into_iter(),
            next_offset,
        }
    }
}
