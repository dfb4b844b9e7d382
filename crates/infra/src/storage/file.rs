//! JSON file credential store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use invoicedesk_core::CredentialStore;
use invoicedesk_domain::{Credentials, DashboardError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// On-disk shape. Each half is optional so a partially written or hand-edited
/// file still reads back whatever it holds.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

/// Persists the token pair as a small JSON document, e.g.
/// `{"accessToken": "...", "refreshToken": "..."}`.
///
/// A missing or unreadable file reads as "no credentials". Write failures are
/// logged and otherwise ignored.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoredTokens {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return StoredTokens::default(),
            Err(err) => {
                let err: DashboardError = InfraError::from(err).into();
                warn!(path = %self.path.display(), error = %err, "credential file unreadable");
                return StoredTokens::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(tokens) => tokens,
            Err(err) => {
                let err: DashboardError = InfraError::from(err).into();
                warn!(path = %self.path.display(), error = %err, "credential file is corrupt");
                StoredTokens::default()
            }
        }
    }

    fn write(&self, tokens: &StoredTokens) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("tmp");
        fs::write(&staging, serde_json::to_vec_pretty(tokens)?)?;
        restrict_permissions(&staging)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn set(&self, credentials: &Credentials) {
        let _guard = self.write_lock.lock();
        let tokens = StoredTokens {
            access_token: Some(credentials.access_token.clone()),
            refresh_token: Some(credentials.refresh_token.clone()),
        };

        match self.write(&tokens) {
            Ok(()) => debug!(path = %self.path.display(), "credentials persisted"),
            Err(InfraError(err)) => {
                warn!(path = %self.path.display(), error = %err, "failed to persist credentials");
            }
        }
    }

    fn access_token(&self) -> Option<String> {
        self.read().access_token.filter(|token| !token.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.filter(|token| !token.is_empty())
    }

    fn clear(&self) {
        let _guard = self.write_lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "credentials cleared"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                let err: DashboardError = InfraError::from(err).into();
                warn!(path = %self.path.display(), error = %err, "failed to clear credentials");
            }
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
