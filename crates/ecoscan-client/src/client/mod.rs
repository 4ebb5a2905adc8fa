//! HTTP client for the product catalog API.

mod alternatives;
mod history;
mod products;

use std::time::Duration;

use ecoscan_core::AppConfig;
use ecoscan_engine::Normalizer;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;

pub use alternatives::MAX_ALTERNATIVES;

/// Transport settings for a [`CatalogClient`].
#[derive(Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential back-off: `backoff_base_ms * 2^(n-1)` before the n-th retry.
    pub backoff_base_ms: u64,
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            api_token: config.api_token.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[redacted]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_ms", &self.backoff_base_ms)
            .finish()
    }
}

/// Client for the catalog's product, impact, nutrition, scan and scan history endpoints.
///
/// Handles rate limiting (429), not-found (404) and other non-2xx responses
/// as typed errors. GET requests are retried with exponential back-off on
/// transient failures; the scan POST is sent once.
///
/// Every response body is unwrapped with [`ecoscan_engine::unwrap_envelope`]
/// and product records are normalized with the configured [`Normalizer`].
pub struct CatalogClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
    pub(super) api_token: Option<String>,
    pub(super) max_retries: u32,
    pub(super) backoff_base_ms: u64,
    pub(super) normalizer: Normalizer,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with configured timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if `settings.base_url` cannot be
    ///   parsed or cannot carry path segments.
    /// - [`ClientError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: settings.base_url,
                reason: "URL cannot carry path segments".to_owned(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_token: settings.api_token,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
            normalizer: Normalizer::default(),
        })
    }

    /// Replaces the built-in normalizer, e.g. one with extended nutrient keywords.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Builds an endpoint URL under the base URL. Each segment is
    /// percent-encoded, so a barcode or id can never escape its path slot.
    pub(super) fn endpoint_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GETs `url` and parses the body as JSON, retrying transient failures.
    ///
    /// An empty body parses as `null`.
    pub(super) async fn get_json(&self, url: &Url, context: &str) -> Result<Value, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            tracing::debug!(url = %url, "catalog GET");
            let response = self
                .authorize(self.client.get(url.clone()))
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await?;
            let response = check_status(response)?;
            let body = response.text().await?;
            parse_body(&body, context)
        })
        .await
    }
}

/// Maps non-success statuses to typed errors.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    let url = response.url().to_string();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ClientError::RateLimited {
            url,
            retry_after_secs,
        });
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound { resource: url });
    }

    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    Ok(response)
}

fn parse_body(body: &str, context: &str) -> Result<Value, ClientError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ClientError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
