//! HTTP transport to the market data provider.
//!
//! One synchronous-per-call GET per operation. Transport failures are a
//! recovered condition: any network error or non-success status is logged
//! and collapsed into the absence value (`None`). There is no retry and no
//! backoff; the caller decides whether to re-attempt.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;

use crate::errors::MarketDataError;
use crate::query::QuerySpec;

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the provider's query-string API.
///
/// Holds the immutable credential and the HTTP client; cheap to clone and
/// shared read-only by all facades. The credential is injected at
/// construction rather than read from ambient state, so tests can supply
/// their own key and base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a client with the default endpoint and a 30 second timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder(api_key).build()
    }

    /// Start a builder to override the base URL or timeout.
    pub fn builder(api_key: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the credential from [`API_KEY_VAR`] once at startup.
    ///
    /// # Errors
    ///
    /// [`MarketDataError::MissingCredential`] if the variable is unset or
    /// empty.
    pub fn from_env() -> Result<Self, MarketDataError> {
        Self::from_env_var(API_KEY_VAR)
    }

    /// Read the credential from an arbitrary environment variable.
    pub fn from_env_var(var: &str) -> Result<Self, MarketDataError> {
        match std::env::var(var) {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            _ => Err(MarketDataError::MissingCredential {
                var: var.to_string(),
            }),
        }
    }

    /// The configured base endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Final request URL for a query. Pure; issues no I/O.
    pub fn url_for(&self, query: &QuerySpec) -> String {
        query.to_url(&self.base_url, &self.api_key)
    }

    /// Issue a single GET for the query.
    ///
    /// Returns the response body, or `None` on any transport failure
    /// (network error, timeout, non-success status). The failure is logged
    /// with the credential redacted.
    pub async fn get(&self, query: &QuerySpec) -> Option<String> {
        let url = self.url_for(query);
        debug!("request: {}", url.replace(&self.api_key, "***"));

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("transport failure for {}: {}", query.function(), e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} for {}", status, query.function());
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("failed to read body for {}: {}", query.function(), e);
                None
            }
        }
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ApiClientBuilder {
    /// Override the base endpoint (e.g. a local test server).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiClient {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        ApiClient {
            client,
            base_url: self.base_url,
            api_key: self.api_key,
        }
    }
}
