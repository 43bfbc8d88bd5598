//! HTTP transport for XSOAR API calls
//!
//! Handles:
//! - URL building from the base URL and percent-encoded path segments
//! - Default, authentication, and per-request headers
//! - Cancellation of in-flight requests through the [`Context`]
//! - Response body size limiting
//!
//! Status codes are returned as-is; mapping them to errors is the caller's
//! job (see [`Error::from_response`]).

use crate::auth::Credentials;
use crate::context::Context;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default limit on response body size (10 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Maximum accepted response body size in bytes
    pub max_body_size: usize,
    /// Default headers for all requests
    pub default_headers: BTreeMap<String, String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: format!("xsoar-client/{}", env!("CARGO_PKG_VERSION")),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            default_headers: BTreeMap::new(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the response body size limit
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config.max_body_size = bytes;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// A single API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path segments appended to the base URL (encoded when sent)
    pub segments: Vec<String>,
    /// JSON body
    pub body: Option<Value>,
    /// Request headers
    pub headers: BTreeMap<String, String>,
}

impl ApiRequest {
    /// Create a request for the given path segments
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
            headers: BTreeMap::new(),
        }
    }

    /// Create a GET request
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    /// Create a POST request
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add headers
    #[must_use]
    pub fn headers(mut self, headers: &BTreeMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Display form of the path, for logs
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// A raw API response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response body
    pub body: Vec<u8>,
    /// Response headers
    pub headers: HeaderMap,
}

impl ApiResponse {
    /// Check for a status of 400 or above
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    /// Convert an error status into a typed error
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_error() {
            return Err(Error::from_response(
                self.status.as_u16(),
                &self.body,
                &self.headers,
            ));
        }
        Ok(self)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// HTTP client bound to one XSOAR tenant
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    base_url: Url,
    credentials: Credentials,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig, credentials: Credentials) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::NoBaseUrl);
        }
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "base URL cannot have path segments: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            base_url,
            credentials,
        })
    }

    /// The parsed base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Send a request and read the whole response.
    ///
    /// Fails early with the context's error if it is already done, and
    /// aborts the request if the context finishes while it is in flight.
    pub async fn send(&self, ctx: &Context, request: ApiRequest) -> Result<ApiResponse> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let url = self.build_url(&request.segments)?;
        let mut req = self.client.request(request.method.clone(), url);

        // Add default headers
        let mut defaults = HeaderMap::new();
        defaults.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if request.body.is_some() {
            defaults.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        extend_headers(&mut defaults, &self.config.default_headers)?;
        req = req.headers(defaults);

        // Add body
        if let Some(ref body) = request.body {
            req = req.body(serde_json::to_vec(body)?);
        }

        // Apply authentication
        req = self.credentials.apply(req);

        // Add request-specific headers, replacing any defaults of the same name
        let mut overrides = HeaderMap::new();
        extend_headers(&mut overrides, &request.headers)?;
        req = req.headers(overrides);

        debug!("Sending {} {}", request.method, request.path());

        let response = tokio::select! {
            biased;
            () = ctx.done() => return Err(ctx.err().unwrap_or(Error::Cancelled)),
            result = self.read_response(req) => result?,
        };

        debug!(
            "{} {} -> {}",
            request.method,
            request.path(),
            response.status.as_u16()
        );
        Ok(response)
    }

    /// Send a request and decode a JSON body.
    ///
    /// The body is only decoded for statuses below 400 when it is non-empty;
    /// otherwise `None` is returned alongside the raw response.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: ApiRequest,
    ) -> Result<(ApiResponse, Option<T>)> {
        let response = self.send(ctx, request).await?;
        if response.is_error() || response.body.is_empty() {
            return Ok((response, None));
        }
        let value = response.json()?;
        Ok((response, Some(value)))
    }

    async fn read_response(&self, req: reqwest::RequestBuilder) -> Result<ApiResponse> {
        let mut response = req.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        let limit = self.config.max_body_size;
        if response
            .content_length()
            .is_some_and(|len| len > limit as u64)
        {
            return Err(Error::ResponseTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(Error::ResponseTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(ApiResponse {
            status,
            body,
            headers,
        })
    }

    /// Build full URL from path segments
    fn build_url(&self, segments: &[String]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config("base URL cannot have path segments"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Insert string headers, replacing existing values
fn extend_headers(map: &mut HeaderMap, headers: &BTreeMap<String, String>) -> Result<()> {
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::config(format!("Invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::config(format!("Invalid value for header '{key}': {e}")))?;
        map.insert(name, value);
    }
    Ok(())
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
