//! Conversions from external infrastructure errors into domain errors.

use invoicedesk_domain::DashboardError;
use keyring::Error as KeyringError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DashboardError);

impl From<InfraError> for DashboardError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DashboardError> for InfraError {
    fn from(value: DashboardError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDashboardError {
    fn into_dashboard(self) -> DashboardError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → DashboardError */
/* -------------------------------------------------------------------------- */

impl IntoDashboardError for KeyringError {
    fn into_dashboard(self) -> DashboardError {
        use KeyringError::*;

        let description = self.to_string();

        match self {
            NoEntry => DashboardError::Storage("keychain entry not found".into()),
            BadEncoding(_) => {
                DashboardError::Storage("credential in keychain is not valid UTF-8".into())
            }
            TooLong(name, limit) => DashboardError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            Invalid(attr, reason) => {
                DashboardError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            PlatformFailure(err) => {
                DashboardError::Storage(format!("keychain platform error: {err}"))
            }
            NoStorageAccess(err) => {
                DashboardError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => DashboardError::Storage(description),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        InfraError(value.into_dashboard())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / serde_json::Error → DashboardError */
/* -------------------------------------------------------------------------- */

impl IntoDashboardError for std::io::Error {
    fn into_dashboard(self) -> DashboardError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => DashboardError::Storage("file not found".into()),
            ErrorKind::PermissionDenied => DashboardError::Storage("permission denied".into()),
            _ => DashboardError::Storage(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_dashboard())
    }
}

impl IntoDashboardError for serde_json::Error {
    fn into_dashboard(self) -> DashboardError {
        if self.is_io() {
            DashboardError::Storage(format!("I/O failure while handling JSON: {self}"))
        } else {
            DashboardError::Internal(format!("malformed JSON: {self}"))
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_dashboard())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
