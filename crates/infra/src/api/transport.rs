//! reqwest-backed implementation of the core [`Transport`] port.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use invoicedesk_core::{ApiRequest, CredentialStore, HttpMethod, Transport};
use invoicedesk_domain::{ApiConfig, ApiEnvelope, DashboardError, Result};
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::errors::ApiError;
use crate::http::{HttpClient, RetryPolicy};

/// Sends [`ApiRequest`]s to the dashboard API over HTTP.
///
/// The bearer token is read from the credential store at send time, so a
/// request issued right after a refresh carries the new token.
pub struct HttpTransport {
    client: HttpClient,
    base_url: Url,
    store: Arc<dyn CredentialStore>,
}

impl HttpTransport {
    /// Build a transport from the API section of the configuration.
    ///
    /// # Errors
    /// Returns `DashboardError::Config` if `base_url` is not an absolute URL.
    pub fn new(config: &ApiConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .max_attempts(config.max_attempts)
            .user_agent(concat!("invoicedesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Self::with_client(client, &config.base_url, store)
    }

    /// Build a transport around an already configured client.
    ///
    /// # Errors
    /// Same as [`HttpTransport::new`].
    pub fn with_client(
        client: HttpClient,
        base_url: &str,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        Ok(Self { client, base_url: parse_base_url(base_url)?, store })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, request: &ApiRequest) -> std::result::Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("Invalid request path {}: {e}", request.path)))?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }

    fn bearer_for(&self, request: &ApiRequest) -> Result<Option<String>> {
        if !request.requires_auth {
            return Ok(None);
        }

        match request.bearer.clone().or_else(|| self.store.access_token()) {
            Some(token) => Ok(Some(token)),
            None => {
                debug!(path = %request.path, "no access token stored; request not sent");
                Err(DashboardError::NotAuthenticated)
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<ApiEnvelope<Value>> {
        let bearer = self.bearer_for(&request)?;
        let url = self.endpoint(&request)?;

        let mut builder = self.client.request(to_reqwest_method(request.method), url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = self.client.execute(builder, RetryPolicy::for_method(request.method)).await?;
        read_envelope(response).await
    }
}

/// Decode the response body into the API envelope, mapping non-success
/// statuses and `success: false` envelopes to errors.
async fn read_envelope(response: Response) -> Result<ApiEnvelope<Value>> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(format!("Failed to read response body: {e}")))?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ApiEnvelope<Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| status_description(status));

        let error = ApiError::from_status(status, message);
        warn!(%status, category = ?error.category(), "API request failed");
        return Err(error.into());
    }

    if body.is_empty() {
        return Ok(ApiEnvelope::empty());
    }

    let envelope: ApiEnvelope<Value> = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Decode(format!("Malformed response envelope: {e}")))?;

    if !envelope.success {
        let message = envelope.message.unwrap_or_else(|| "Request failed".to_string());
        debug!(%status, message = %message, "API returned an unsuccessful envelope");
        return Err(DashboardError::Rejected(message));
    }

    debug!(%status, "API request succeeded");
    Ok(envelope)
}

fn status_description(status: StatusCode) -> String {
    format!("Request failed with status {status}")
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Parse the configured base URL, ensuring paths are joined beneath it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let normalized =
        if trimmed.ends_with('/') { trimmed.to_string() } else { format!("{trimmed}/") };

    let url = Url::parse(&normalized)
        .map_err(|e| DashboardError::Config(format!("Invalid API base URL {raw:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DashboardError::Config(format!("Unsupported API URL scheme: {other}"))),
    }
}
