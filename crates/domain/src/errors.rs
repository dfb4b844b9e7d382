//! Error types used throughout the dashboard client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for InvoiceDesk
///
/// `Clone` so that one failed refresh can be handed to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DashboardError {
    /// No response was obtained from the server.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a well-formed error envelope.
    #[error("{0}")]
    Rejected(String),

    /// The bearer credential was refused (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A refresh attempt failed; both tokens are considered invalid.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    /// Whether the failure means the current credentials are no good.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::SessionExpired(_) | Self::NotAuthenticated)
    }

    /// Message suitable for inline display next to a form or list.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Network(_) => "Unable to reach the server. Check your connection.".to_string(),
            Self::SessionExpired(_) | Self::NotAuthenticated => {
                "Your session has expired. Please sign in again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for InvoiceDesk operations
pub type Result<T> = std::result::Result<T, DashboardError>;
