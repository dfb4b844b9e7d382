//! Credential store backends

mod file;
mod keychain;

use std::sync::Arc;

use invoicedesk_core::{CredentialStore, MemoryCredentialStore};
use invoicedesk_domain::{StorageBackend, StorageConfig};
use tracing::info;

pub use file::FileCredentialStore;
pub use keychain::KeychainCredentialStore;

/// Open the credential store selected by `config.backend`.
pub fn open_credential_store(config: &StorageConfig) -> Arc<dyn CredentialStore> {
    info!(backend = %config.backend, "opening credential store");
    match config.backend {
        StorageBackend::File => Arc::new(FileCredentialStore::new(&config.path)),
        StorageBackend::Keychain => Arc::new(KeychainCredentialStore::new(&config.service_name)),
        StorageBackend::Memory => Arc::new(MemoryCredentialStore::new()),
    }
}
