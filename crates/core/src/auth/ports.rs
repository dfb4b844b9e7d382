//! Port interfaces for credential persistence
//!
//! Stores are deliberately infallible: a storage backend that cannot be read
//! reports "no credentials", and a failed write is logged by the
//! implementation and otherwise ignored.

use invoicedesk_domain::Credentials;

/// Durable key-value persistence of the access/refresh token pair.
pub trait CredentialStore: Send + Sync {
    /// Persist both tokens.
    fn set(&self, credentials: &Credentials);

    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Remove both tokens.
    fn clear(&self);

    /// Both tokens, or `None` if either half is missing.
    fn credentials(&self) -> Option<Credentials> {
        match (self.access_token(), self.refresh_token()) {
            (Some(access), Some(refresh)) => Some(Credentials::new(access, refresh)),
            _ => None,
        }
    }
}
