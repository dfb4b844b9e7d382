//! API-specific error types
//!
//! Classifies failed HTTP exchanges before they are folded into the domain
//! error taxonomy.

use std::time::Duration;

use invoicedesk_common::{ErrorClassification, ErrorSeverity};
use invoicedesk_domain::DashboardError;
use reqwest::StatusCode;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) - retry after token refresh
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) and undecodable bodies - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Configuration errors - non-retryable
    Config,
}

/// API operation errors
///
/// The carried message is the server's own envelope message when one was
/// returned, so it can be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Self::Auth(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimit(message)
        } else if status.is_server_error() {
            Self::Server(message)
        } else {
            Self::Client(message)
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) | Self::Decode(_) => ApiErrorCategory::Client,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Get suggested retry delay in seconds
    pub fn retry_delay_secs(&self) -> u64 {
        match self.category() {
            ApiErrorCategory::Authentication => 0, // Retried right after a refresh
            ApiErrorCategory::RateLimit => 60,
            ApiErrorCategory::Server => 10,
            ApiErrorCategory::Network => 5,
            ApiErrorCategory::Client | ApiErrorCategory::Config => 0,
        }
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ApiErrorCategory::Client => ErrorSeverity::Info,
            ApiErrorCategory::Authentication
            | ApiErrorCategory::RateLimit
            | ApiErrorCategory::Network => ErrorSeverity::Warning,
            ApiErrorCategory::Server => ErrorSeverity::Error,
            ApiErrorCategory::Config => ErrorSeverity::Critical,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        self.is_retryable().then(|| Duration::from_secs(self.retry_delay_secs()))
    }
}

impl From<reqwest::Error> for ApiError {
    /// Classify a failure that produced no usable response.
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Config(format!("Invalid HTTP request: {err}"))
        } else if err.is_decode() || err.is_body() {
            Self::Decode(format!("Failed to read response body: {err}"))
        } else if err.is_timeout() {
            Self::Network("HTTP request timed out".into())
        } else if err.is_connect() {
            Self::Network("Could not reach the server".into())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<ApiError> for DashboardError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) => DashboardError::Unauthorized(message),
            ApiError::RateLimit(message) | ApiError::Server(message) | ApiError::Client(message) => {
                DashboardError::Rejected(message)
            }
            ApiError::Decode(message) => DashboardError::Internal(message),
            ApiError::Network(message) => DashboardError::Network(message),
            ApiError::Config(message) => DashboardError::Config(message),
        }
    }
}
