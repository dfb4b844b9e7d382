//! OS keychain credential store

use invoicedesk_core::CredentialStore;
use invoicedesk_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use invoicedesk_domain::{Credentials, DashboardError};
use keyring::Entry;
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Persists each token as its own keychain entry under one service name.
///
/// An entry that cannot be opened behaves as an always-empty slot.
pub struct KeychainCredentialStore {
    service: String,
    access: Option<Entry>,
    refresh: Option<Entry>,
}

impl KeychainCredentialStore {
    pub fn new(service: impl Into<String>) -> Self {
        let service = service.into();
        let access = open_entry(&service, ACCESS_TOKEN_KEY);
        let refresh = open_entry(&service, REFRESH_TOKEN_KEY);
        Self { service, access, refresh }
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

fn open_entry(service: &str, key: &str) -> Option<Entry> {
    match Entry::new(service, key) {
        Ok(entry) => Some(entry),
        Err(err) => {
            let err: DashboardError = InfraError::from(err).into();
            warn!(service, key, error = %err, "keychain entry unavailable");
            None
        }
    }
}

fn read_entry(entry: Option<&Entry>, key: &str) -> Option<String> {
    match entry?.get_password() {
        Ok(token) if !token.is_empty() => Some(token),
        Ok(_) | Err(keyring::Error::NoEntry) => None,
        Err(err) => {
            let err: DashboardError = InfraError::from(err).into();
            warn!(key, error = %err, "failed to read keychain entry");
            None
        }
    }
}

fn write_entry(entry: Option<&Entry>, key: &str, token: &str) {
    let Some(entry) = entry else {
        return;
    };
    if let Err(err) = entry.set_password(token) {
        let err: DashboardError = InfraError::from(err).into();
        warn!(key, error = %err, "failed to write keychain entry");
    }
}

fn delete_entry(entry: Option<&Entry>, key: &str) {
    let Some(entry) = entry else {
        return;
    };
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => {}
        Err(err) => {
            let err: DashboardError = InfraError::from(err).into();
            warn!(key, error = %err, "failed to delete keychain entry");
        }
    }
}

impl CredentialStore for KeychainCredentialStore {
    fn set(&self, credentials: &Credentials) {
        write_entry(self.access.as_ref(), ACCESS_TOKEN_KEY, &credentials.access_token);
        write_entry(self.refresh.as_ref(), REFRESH_TOKEN_KEY, &credentials.refresh_token);
        debug!(service = %self.service, "credentials stored in keychain");
    }

    fn access_token(&self) -> Option<String> {
        read_entry(self.access.as_ref(), ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        read_entry(self.refresh.as_ref(), REFRESH_TOKEN_KEY)
    }

    fn clear(&self) {
        delete_entry(self.access.as_ref(), ACCESS_TOKEN_KEY);
        delete_entry(self.refresh.as_ref(), REFRESH_TOKEN_KEY);
        debug!(service = %self.service, "keychain credentials cleared");
    }
}
