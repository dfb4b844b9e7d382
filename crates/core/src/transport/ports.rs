//! Port interfaces for the HTTP transport

use std::fmt;

use async_trait::async_trait;
use invoicedesk_domain::{ApiEnvelope, DashboardError, Result};
use serde::Serialize;

/// HTTP verbs used by the dashboard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Safe to repeat without side effects.
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to the remote API, independent of any HTTP library.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the configured base URL, e.g. `/work-orders`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Attach `Authorization: Bearer <access token>` read at send time.
    pub requires_auth: bool,
    /// Explicit bearer used instead of the stored access token.
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            requires_auth: true,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Mark the request as not needing credentials.
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Serialise `body` as the JSON request body.
    ///
    /// # Errors
    /// Returns `DashboardError::InvalidInput` if `body` cannot be serialised.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| DashboardError::InvalidInput(format!("Unserialisable request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self.requires_auth = true;
        self
    }

    /// Whether a 401 on this request may be answered by refreshing the
    /// stored session and retrying.
    pub fn uses_stored_credentials(&self) -> bool {
        self.requires_auth && self.bearer.is_none()
    }
}

// Bodies carry passwords and refresh tokens.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("has_body", &self.body.is_some())
            .field("requires_auth", &self.requires_auth)
            .field("explicit_bearer", &self.bearer.is_some())
            .finish()
    }
}

/// Trait for sending requests to the dashboard API
///
/// Implementations attach the bearer credential when `requires_auth` is set,
/// decode the `{success, data, message, timestamp}` envelope, and map every
/// non-success outcome to a [`DashboardError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiEnvelope<serde_json::Value>>;
}
