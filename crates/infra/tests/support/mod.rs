//! Shared fixtures for infra integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use invoicedesk_core::MemoryCredentialStore;
use invoicedesk_domain::{ApiConfig, Config, StorageBackend};
use invoicedesk_infra::HttpTransport;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Configuration pointing at a mock server with the in-memory store.
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{}/api", server.uri());
    config.api.max_attempts = 3;
    config.storage.backend = StorageBackend::Memory;
    config.sync.debounce_ms = 10;
    config
}

pub fn transport_for(server: &MockServer, store: Arc<MemoryCredentialStore>) -> HttpTransport {
    let api = ApiConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_seconds: 5,
        max_attempts: 3,
    };
    HttpTransport::new(&api, store).expect("transport")
}

pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data, "timestamp": "2024-05-01T09:00:00Z" })
}

pub fn failure(message: &str) -> Value {
    json!({ "success": false, "message": message, "timestamp": "2024-05-01T09:00:00Z" })
}

pub fn auth_payload(access: &str, refresh: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "tokenType": "Bearer",
        "expiresIn": 900,
        "user": { "id": "u-1", "email": "maria@example.com", "name": "Maria Lopez", "role": "admin" }
    })
}

pub fn work_order_page() -> Value {
    json!({
        "items": [
            { "id": "WO-1", "title": "Replace boiler", "status": "pending", "priority": "high" },
            { "id": "WO-2", "title": "Roof inspection", "status": "in_progress", "priority": "low" }
        ],
        "pagination": { "total": 12, "page": 1, "limit": 10 }
    })
}
