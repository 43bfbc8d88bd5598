//! HTTP transport module
//!
//! Sends [`ApiRequest`]s to the XSOAR API and returns raw [`ApiResponse`]s.
//!
//! # Features
//!
//! - **Authentication**: API key headers from the auth module
//! - **Cancellation**: in-flight requests abort when their context is done
//! - **Body limit**: responses above [`DEFAULT_MAX_BODY_SIZE`] are rejected

mod client;

pub use client::{
    ApiRequest, ApiResponse, HttpClient, HttpClientConfig, HttpClientConfigBuilder,
    DEFAULT_MAX_BODY_SIZE,
};
