//! Pagination module
//!
//! Offset/limit pages and the engine that turns a page-fetch primitive into
//! one lazy sequence over every matching item.
//!
//! # Overview
//!
//! - [`Page`] / [`PageRequest`] - one slice of a result set and the request for it
//! - [`PageFetcher`] - the single-page fetch primitive
//! - [`paginate`] - fetches pages only as the consumer advances, checking the
//!   [`Context`](crate::Context) before every fetch and every item

mod engine;
mod types;

pub use engine::{paginate, PageFetcher};
pub use types::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
