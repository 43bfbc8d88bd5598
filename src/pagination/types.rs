//! Pagination types
//!
//! Defines the page shape shared by every paginated endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Page size used when none (or a non-positive one) is requested
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Largest page size the API accepts
pub const MAX_PAGE_SIZE: i64 = 1000;

/// One bounded slice of a larger result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Items on this page, in result order
    #[serde(rename = "data", default, deserialize_with = "null_as_empty")]
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    #[serde(default)]
    pub total: usize,
    /// Position of the first item of this page in the overall result set
    #[serde(rename = "fromIndex", default)]
    pub offset: usize,
    /// Page size reported by the server
    #[serde(rename = "size", default)]
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, total: usize, offset: usize) -> Self {
        let page_size = items.len();
        Self {
            items,
            total,
            offset,
            page_size,
        }
    }

    /// Check if more items follow this page.
    ///
    /// A page whose end position does not fit in `usize` has nothing after it.
    pub fn has_more(&self) -> bool {
        self.next_offset().is_some_and(|end| end < self.total)
    }

    /// Offset of the page following this one, `None` on overflow
    pub fn next_offset(&self) -> Option<usize> {
        self.offset.checked_add(self.items.len())
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if this page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 0, 0)
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// The server sends `"data": null` for empty result sets
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Offset and limit of a single page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Index of the first item to return
    #[serde(rename = "fromIndex")]
    pub offset: usize,
    /// Maximum number of items to return
    #[serde(rename = "size")]
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Create a page request
    pub fn new(offset: usize, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// Request the first page with the given size
    pub fn first(limit: i64) -> Self {
        Self::new(0, limit)
    }

    /// Copy of this request with the limit clamped into the accepted range
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            offset: self.offset,
            limit: normalize_limit(self.limit),
        }
    }
}

/// Clamp a requested page size: non-positive becomes the default,
/// anything above the maximum becomes the maximum
pub(crate) fn normalize_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        limit.min(MAX_PAGE_SIZE)
    }
}
