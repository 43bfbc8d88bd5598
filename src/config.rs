//! Client configuration
//!
//! [`ClientConfig`] can be built in code, read from the environment, or
//! loaded from a YAML file. Sources combine with [`ClientConfig::merge`],
//! where already-set fields win.
//!
//! ```yaml
//! base_url: https://api-tenant.xdr.us.paloaltonetworks.com
//! key_id: "12"
//! api_key: "..."
//! timeout_secs: 60
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable for the base URL
pub const ENV_BASE_URL: &str = "XSOAR_BASE_URL";
/// Environment variable for the API key ID
pub const ENV_KEY_ID: &str = "XSOAR_API_KEY_ID";
/// Environment variable for the API key
pub const ENV_API_KEY: &str = "XSOAR_API_KEY";
/// Environment variable for the timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "XSOAR_TIMEOUT_SECS";

// ============================================================================
// Client Config
// ============================================================================

/// Settings needed to build a [`Client`](crate::Client)
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// API base URL, e.g. `https://api-tenant.xdr.us.paloaltonetworks.com`
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key ID
    #[serde(default)]
    pub key_id: Option<String>,

    /// API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key credentials
    #[must_use]
    pub fn api_key(mut self, key_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Effective request timeout
    pub fn request_timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// Read the `XSOAR_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (used for env-like sources)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                Error::config(format!("{ENV_TIMEOUT_SECS} must be a number of seconds: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            base_url: get(ENV_BASE_URL),
            key_id: get(ENV_KEY_ID),
            api_key: get(ENV_API_KEY),
            timeout_secs,
            user_agent: None,
        })
    }

    /// Load a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a YAML config document
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Fill fields that are unset here from `other`
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            base_url: self.base_url.or(other.base_url),
            key_id: self.key_id.or(other.key_id),
            api_key: self.api_key.or(other.api_key),
            timeout_secs: self.timeout_secs.or(other.timeout_secs),
            user_agent: self.user_agent.or(other.user_agent),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

// ============================================================================
// Request Options
// ============================================================================

/// Header used to correlate a request with server logs
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Per-request settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Extra headers, applied after the client defaults
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Create empty request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add several headers
    #[must_use]
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the `X-Request-ID` header for tracing
    #[must_use]
    pub fn request_id(self, id: impl Into<String>) -> Self {
        self.header(REQUEST_ID_HEADER, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .base_url("https://xsoar.example.com")
            .api_key("12", "secret")
            .timeout(Duration::from_secs(90))
            .user_agent("test-agent/1.0");

        assert_eq!(config.base_url.as_deref(), Some("https://xsoar.example.com"));
        assert_eq!(config.key_id.as_deref(), Some("12"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout(), Duration::from_secs(90));
        assert_eq!(config.user_agent.as_deref(), Some("test-agent/1.0"));
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(ClientConfig::new().request_timeout(), DEFAULT_TIMEOUT);
        let config = ClientConfig {
            timeout_secs: Some(0),
            ..ClientConfig::default()
        };
        assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://env.example.com"),
            (ENV_KEY_ID, "3"),
            (ENV_API_KEY, "env-key"),
            (ENV_TIMEOUT_SECS, "45"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(config.key_id.as_deref(), Some("3"));
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.timeout_secs, Some(45));
    }

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "  ")])).unwrap();
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_from_lookup_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }

    #[test]
    fn test_from_yaml() {
        let config = ClientConfig::from_yaml(
            r#"
base_url: https://file.example.com
key_id: "9"
api_key: file-key
timeout_secs: 10
"#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("https://file.example.com"));
        assert_eq!(config.key_id.as_deref(), Some("9"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        let err = ClientConfig::from_yaml("base_uri: https://typo.example.com\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: https://tmp.example.com").unwrap();
        writeln!(file, "key_id: \"1\"").unwrap();
        writeln!(file, "api_key: tmp-key").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://tmp.example.com"));
        assert_eq!(config.api_key.as_deref(), Some("tmp-key"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ClientConfig::from_file("/nonexistent/xsoar.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_merge_prefers_self() {
        let flags = ClientConfig::new().base_url("https://flags.example.com");
        let file = ClientConfig::new()
            .base_url("https://file.example.com")
            .api_key("1", "file-key");

        let merged = flags.merge(file);
        assert_eq!(merged.base_url.as_deref(), Some("https://flags.example.com"));
        assert_eq!(merged.key_id.as_deref(), Some("1"));
        assert_eq!(merged.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", ClientConfig::new().api_key("1", "hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_request_options() {
        let opts = RequestOptions::new()
            .header("X-Custom", "value")
            .headers([("X-A", "1"), ("X-B", "2")])
            .request_id("req-1");

        assert_eq!(opts.headers.get("X-Custom").map(String::as_str), Some("value"));
        assert_eq!(opts.headers.get("X-A").map(String::as_str), Some("1"));
        assert_eq!(opts.headers.get("X-B").map(String::as_str), Some("2"));
        assert_eq!(
            opts.headers.get(REQUEST_ID_HEADER).map(String::as_str),
            Some("req-1")
        );
    }
}
