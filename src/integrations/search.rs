//! Search-index client handle (Elasticsearch-compatible HTTP endpoint).
//!
//! Construction validates the endpoint and builds the HTTP client; it does
//! not touch the network.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::config::{keys, resolve_conditional, ConfigurationSet};
use crate::error::AppError;

use super::IntegrationError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle; `reqwest` clients are `Arc` internally so clones are cheap.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    base_url: Url,
}

impl SearchClient {
    pub fn new(endpoint: &str) -> Result<Self, IntegrationError> {
        let invalid = |reason: String| IntegrationError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let base_url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("scheme must be http or https, got '{}'", base_url.scheme())));
        }
        if base_url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("no host".into()));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IntegrationError::Client(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// `ELASTICSEARCH_URL` gate: `None` when unset or blank.
    pub fn from_settings(set: &ConfigurationSet) -> Result<Option<Self>, AppError> {
        resolve_conditional(set, keys::ELASTICSEARCH_URL, SearchClient::new)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Reachability probe. Any HTTP response counts as reachable; only
    /// transport failures are errors.
    pub fn ping(&self) -> Result<(), IntegrationError> {
        self.client
            .head(self.base_url.clone())
            .timeout(PING_TIMEOUT)
            .send()
            .map(|_| ())
            .map_err(|e| IntegrationError::Client(format!("unreachable: {e}")))
    }
}
