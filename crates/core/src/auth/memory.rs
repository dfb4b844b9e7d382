//! In-process credential store

use invoicedesk_domain::Credentials;
use parking_lot::RwLock;

use super::ports::CredentialStore;

/// Credential store that lives only as long as the process.
///
/// Used by tests and by the `memory` storage backend.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    access: RwLock<Option<String>>,
    refresh: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with whatever halves are given, as a reloaded page
    /// would find them.
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        Self {
            access: RwLock::new(access.map(str::to_string)),
            refresh: RwLock::new(refresh.map(str::to_string)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access.read().is_none() && self.refresh.read().is_none()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, credentials: &Credentials) {
        *self.access.write() = Some(credentials.access_token.clone());
        *self.refresh.write() = Some(credentials.refresh_token.clone());
    }

    fn access_token(&self) -> Option<String> {
        self.access.read().clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.refresh.read().clone()
    }

    fn clear(&self) {
        *self.access.write() = None;
        *self.refresh.write() = None;
    }
}
