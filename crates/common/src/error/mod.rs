//! Error classification shared by every error type in the workspace
//!
//! Module-specific errors stay in their own crates. What they share is the
//! [`ErrorClassification`] interface, which lets the transport decide whether
//! to retry and lets the synchronizer pick a log level for a failed fetch.
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Anonymous caller, empty results |
//! | **Warning** | Degraded but operational | Network blips, expired sessions |
//! | **Error** | Failure requiring attention | Rejected requests, config errors |
//! | **Critical** | System integrity at risk | Internal invariant violations |
//!
//! ## Examples
//!
//! ```rust,ignore
//! use invoicedesk_common::error::ErrorClassification;
//!
//! fn log_failure<E: ErrorClassification + std::fmt::Display>(err: &E) {
//!     if err.severity() >= ErrorSeverity::Error {
//!         tracing::error!(error = %err, "operation failed");
//!     } else {
//!         tracing::warn!(error = %err, "operation failed");
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Standard trait for error classification
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as timeouts, refused connections or 5xx responses.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(feature = "domain")]
mod domain {
    use std::time::Duration;

    use invoicedesk_domain::DashboardError;

    use super::{ErrorClassification, ErrorSeverity};

    impl ErrorClassification for DashboardError {
        fn is_retryable(&self) -> bool {
            matches!(self, Self::Network(_))
        }

        fn severity(&self) -> ErrorSeverity {
            match self {
                Self::NotAuthenticated => ErrorSeverity::Info,
                Self::Network(_) | Self::Unauthorized(_) | Self::SessionExpired(_) => {
                    ErrorSeverity::Warning
                }
                Self::Rejected(_)
                | Self::Storage(_)
                | Self::Config(_)
                | Self::InvalidInput(_) => ErrorSeverity::Error,
                Self::Internal(_) => ErrorSeverity::Critical,
            }
        }

        fn retry_after(&self) -> Option<Duration> {
            match self {
                Self::Network(_) => Some(Duration::from_secs(5)),
                _ => None,
            }
        }
    }
}
