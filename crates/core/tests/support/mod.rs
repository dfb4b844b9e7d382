//! Shared test helpers for `invoicedesk-core` integration tests.
//!
//! [`ScriptedTransport`] stands in for the HTTP layer: routes are answered by
//! closures, optionally after a virtual delay, and every call is recorded
//! with the bearer an HTTP transport would have attached.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use invoicedesk_core::{ApiRequest, CredentialStore, HttpMethod, Transport};
use invoicedesk_domain::{ApiEnvelope, DashboardError, Result};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// What the transport saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

type Responder = Arc<dyn Fn(&RecordedCall) -> Result<ApiEnvelope<Value>> + Send + Sync>;

struct Route {
    responder: Responder,
    delay: Duration,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), Route>>,
    calls: Mutex<Vec<RecordedCall>>,
    store: Mutex<Option<Arc<dyn CredentialStore>>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Resolve bearers from `store` the way the HTTP transport does.
    pub fn attach_store(&self, store: Arc<dyn CredentialStore>) {
        *self.store.lock() = Some(store);
    }

    pub fn on<F>(&self, method: HttpMethod, path: &str, responder: F)
    where
        F: Fn(&RecordedCall) -> Result<ApiEnvelope<Value>> + Send + Sync + 'static,
    {
        self.on_delayed(method, path, Duration::ZERO, responder);
    }

    pub fn on_delayed<F>(&self, method: HttpMethod, path: &str, delay: Duration, responder: F)
    where
        F: Fn(&RecordedCall) -> Result<ApiEnvelope<Value>> + Send + Sync + 'static,
    {
        self.routes
            .lock()
            .insert((method, path.to_string()), Route { responder: Arc::new(responder), delay });
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, method: HttpMethod, path: &str) -> usize {
        self.calls.lock().iter().filter(|call| call.method == method && call.path == path).count()
    }

    /// Highest number of requests observed in flight at once.
    pub fn max_concurrency(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiEnvelope<Value>> {
        let bearer = match (&request.bearer, request.requires_auth) {
            (Some(explicit), _) => Some(explicit.clone()),
            (None, true) => self.store.lock().as_ref().and_then(|store| store.access_token()),
            (None, false) => None,
        };
        let call = RecordedCall {
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            bearer,
        };
        self.calls.lock().push(call.clone());

        let route = self
            .routes
            .lock()
            .get(&(call.method, call.path.clone()))
            .map(|route| (Arc::clone(&route.responder), route.delay));
        let Some((responder, delay)) = route else {
            return Err(DashboardError::Network(format!("no route for {} {}", call.method, call.path)));
        };

        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        responder(&call)
    }
}

pub fn auth_payload(access: &str, refresh: &str, user_id: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "tokenType": "Bearer",
        "expiresIn": 900,
        "user": { "id": user_id, "email": format!("{user_id}@example.com"), "firstName": "Test", "lastName": "User", "role": "admin" }
    })
}

pub fn ok(data: Value) -> Result<ApiEnvelope<Value>> {
    Ok(ApiEnvelope::ok(data))
}

pub fn empty_ok() -> Result<ApiEnvelope<Value>> {
    Ok(ApiEnvelope::empty())
}

pub fn rejected(message: &str) -> Result<ApiEnvelope<Value>> {
    Err(DashboardError::Rejected(message.to_string()))
}

pub fn work_order(id: &str, title: &str, status: &str, due: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "status": status,
        "priority": "medium",
        "dueDate": due,
    })
}

pub fn page_of(items: Vec<Value>, total: u64, page: u64, limit: u64) -> Value {
    json!({
        "items": items,
        "pagination": { "total": total, "page": page, "limit": limit }
    })
}
