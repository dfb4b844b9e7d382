//! # InvoiceDesk Infrastructure
//!
//! Adapters behind the ports defined in `invoicedesk-core`:
//! - [`api::HttpTransport`]: reqwest-backed transport with envelope decoding
//! - [`storage`]: file, keychain and in-memory credential stores
//! - [`config`]: `.env`, file and environment configuration loading
//! - [`DashboardContext`]: the application-scoped lifecycle object

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod storage;

pub use api::{ApiError, ApiErrorCategory, HttpTransport};
pub use context::DashboardContext;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, RetryPolicy};
pub use storage::{open_credential_store, FileCredentialStore, KeychainCredentialStore};
