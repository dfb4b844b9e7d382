//! Transport decorator that recovers from an expired access token.

use std::sync::Arc;

use async_trait::async_trait;
use invoicedesk_domain::{ApiEnvelope, DashboardError, Result};
use tracing::debug;

use super::session::SessionManager;
use crate::transport::{ApiRequest, Transport};

/// Wraps a [`Transport`] so that an `Unauthorized` answer to a request made
/// with the stored credentials triggers one session refresh and one retry.
///
/// Concurrent 401s share a single refresh through
/// [`SessionManager::refresh`]. Requests carrying an explicit bearer or no
/// credentials at all are passed through untouched.
pub struct SessionGuardedTransport {
    inner: Arc<dyn Transport>,
    session: SessionManager,
}

impl SessionGuardedTransport {
    pub fn new(inner: Arc<dyn Transport>, session: SessionManager) -> Self {
        Self { inner, session }
    }
}

#[async_trait]
impl Transport for SessionGuardedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiEnvelope<serde_json::Value>> {
        if !request.uses_stored_credentials() {
            return self.inner.send(request).await;
        }

        let retry = request.clone();
        match self.inner.send(request).await {
            Err(DashboardError::Unauthorized(reason)) => {
                debug!(path = %retry.path, %reason, "access token rejected; refreshing session");
                self.session.refresh().await?;
                self.inner.send(retry).await
            }
            other => other,
        }
    }
}
