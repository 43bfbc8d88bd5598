//! XSOAR API client
//!
//! [`Client`] validates a [`ClientConfig`], builds the shared HTTP transport
//! and hands out the resource services.

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::incidents::Incidents;
use std::sync::Arc;
use tracing::debug;

/// Client for one XSOAR tenant. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    incidents: Incidents,
}

impl Client {
    /// Create a client.
    ///
    /// Fails with [`Error::NoBaseUrl`] when no base URL is set and with
    /// [`Error::NoCredentials`] when the key ID or API key is missing.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or(Error::NoBaseUrl)?
            .to_string();

        let credentials = Credentials::new(
            config.key_id.clone().unwrap_or_default(),
            config.api_key.clone().unwrap_or_default(),
        );
        if !credentials.is_valid() {
            return Err(Error::NoCredentials);
        }

        let mut http_config = HttpClientConfig::builder()
            .base_url(base_url.as_str())
            .timeout(config.request_timeout());
        if let Some(agent) = &config.user_agent {
            http_config = http_config.user_agent(agent.as_str());
        }

        let http = HttpClient::new(http_config.build(), credentials)?;
        debug!("Created XSOAR client for {}", base_url);

        Ok(Self {
            base_url,
            incidents: Incidents::new(Arc::new(http)),
        })
    }

    /// Create a client from the `XSOAR_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Incident operations
    pub fn incidents(&self) -> &Incidents {
        &self.incidents
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
