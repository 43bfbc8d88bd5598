// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # XSOAR Client
//!
//! A typed async client for the Cortex XSOAR incident API.
//!
//! ## Features
//!
//! - **Lazy Search**: incident searches are streams that fetch pages on demand
//! - **Sequence Combinators**: take, filter and map over fallible streams
//! - **Cancellation**: every call takes a [`Context`] with a cancel signal and
//!   an optional deadline
//! - **Typed Errors**: HTTP statuses map onto a single [`Error`] enum
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use xsoar_client::iter::SeqExt;
//! use xsoar_client::{Client, ClientConfig, Context, IncidentFilter, RequestOptions, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::new(
//!         ClientConfig::new()
//!             .base_url("https://api-tenant.xdr.us.paloaltonetworks.com")
//!             .api_key("12", "..."),
//!     )?;
//!
//!     let ctx = Context::new();
//!     let mut critical = client
//!         .incidents()
//!         .search(&ctx, IncidentFilter::new().query("severity:4"), &RequestOptions::new())
//!         .take_items(10);
//!
//!     while let Some(incident) = critical.next().await {
//!         println!("{}", incident?.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Client                                 │
//! │  incidents() → search / search_page / get / create / update ... │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │   Iter    │   Context   │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Key ID   │ GET/POST  │ Offset pages  │ Take      │ Cancel      │
//! │ API Key  │ Body limit│ Lazy fetch    │ Filter    │ Deadline    │
//! │          │ Errors    │ Early stop    │ Map       │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Cancellation and deadlines
pub mod context;

/// Client and request configuration
pub mod config;

/// API key authentication
pub mod auth;

/// HTTP transport
pub mod http;

/// Lazy fallible sequences
pub mod iter;

/// Offset pagination
pub mod pagination;

/// Incident models and operations
pub mod incidents;

/// Top-level client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::Client;
pub use config::{ClientConfig, RequestOptions};
pub use context::Context;
pub use error::{ApiError, Error, Result};
pub use incidents::{
    CloseIncidentRequest, CreateIncidentRequest, Incident, IncidentFilter, IncidentPage,
    IncidentStatus, Incidents, Label, Severity, UpdateIncidentRequest,
};
pub use iter::{Collected, Seq, SeqExt};
pub use pagination::{Page, PageRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
