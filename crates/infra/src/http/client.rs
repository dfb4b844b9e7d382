//! Retrying executor for dashboard API calls
//!
//! Every attempt is classified as an [`ApiError`] before deciding whether to
//! go again, so the transport and the retry loop agree on what counts as a
//! transient failure. Only idempotent methods are ever repeated.

use std::time::Duration;

use invoicedesk_common::ErrorClassification;
use invoicedesk_core::HttpMethod;
use invoicedesk_domain::DashboardError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::api::ApiError;

/// Whether a request may be sent again after a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Send exactly once. Used for writes, which the server may have applied
    /// even though the response was lost.
    Once,
    /// Repeat rate-limited, server and network failures up to the client's
    /// attempt budget.
    Transient,
}

impl RetryPolicy {
    /// Reads are retried; writes are not.
    pub fn for_method(method: HttpMethod) -> Self {
        if method.is_idempotent() {
            Self::Transient
        } else {
            Self::Once
        }
    }
}

/// reqwest client plus the attempt budget and backoff used for retries.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start from the defaults: 30s timeout, two attempts, 200ms backoff.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Start a request on the underlying connection pool.
    pub fn request(&self, method: Method, url: url::Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a request, repeating it while `policy` allows and the failure is
    /// retryable.
    ///
    /// A response with an error status is returned as-is once no retry is
    /// left, so the caller can read the server's message from its body.
    ///
    /// # Errors
    /// Returns the classified failure when no response was received at all.
    pub async fn execute(
        &self,
        builder: RequestBuilder,
        policy: RetryPolicy,
    ) -> Result<Response, ApiError> {
        let attempts = match policy {
            RetryPolicy::Once => 1,
            RetryPolicy::Transient => self.max_attempts,
        };

        let mut attempt = 1;
        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| ApiError::Config("request body cannot be replayed".into()))?
                .build()?;
            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending API request");

            let failure = match self.client.execute(request).await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let failure = ApiError::from_status(status, status.to_string());
                    if attempt >= attempts || !failure.is_retryable() {
                        return Ok(response);
                    }
                    failure
                }
                Err(err) => {
                    let failure = ApiError::from(err);
                    if attempt >= attempts || !failure.is_retryable() {
                        return Err(failure);
                    }
                    failure
                }
            };

            let delay = self.retry_delay(attempt, &failure);
            warn!(attempt, %method, %url, error = %failure, ?delay, "API request failed; retrying");
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }

    /// Exponential backoff from the base delay, never longer than the
    /// failure's own suggested wait.
    fn retry_delay(&self, attempt: usize, failure: &ApiError) -> Duration {
        let shift = attempt.saturating_sub(1).min(8) as u32;
        let backoff = self.base_backoff.saturating_mul(1 << shift);
        match failure.retry_after() {
            Some(hint) => backoff.min(hint),
            None => backoff,
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 2,
            base_backoff: Duration::from_millis(200),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for [`RetryPolicy::Transient`] requests, including the
    /// first.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry; doubles for each one after.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// Returns `DashboardError::Config` if the TLS backend cannot start.
    pub fn build(self) -> Result<HttpClient, DashboardError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| {
            DashboardError::Config(format!("HTTP client could not be initialised: {err}"))
        })?;

        Ok(HttpClient { client, max_attempts: self.max_attempts, base_backoff: self.base_backoff })
    }
}
