//! API key credentials

use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

/// Header carrying the API key ID
pub const AUTH_ID_HEADER: &str = "x-xdr-auth-id";

/// XSOAR API key credentials
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// API key ID
    pub key_id: String,
    /// API key value
    pub api_key: String,
}

impl Credentials {
    /// Create credentials from a key ID and key
    pub fn new(key_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Check that both the key ID and the key are set
    pub fn is_valid(&self) -> bool {
        !self.key_id.is_empty() && !self.api_key.is_empty()
    }

    /// Apply authentication headers to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(AUTH_ID_HEADER, self.key_id.as_str())
            .header(AUTHORIZATION, self.api_key.as_str())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
