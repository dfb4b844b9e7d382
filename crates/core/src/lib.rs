//! # InvoiceDesk Core
//!
//! Client-side business logic for the dashboard - no HTTP or storage code.
//!
//! This crate contains:
//! - Port interfaces ([`CredentialStore`], [`Transport`], [`PageSource`])
//! - The session state machine with single-flight token refresh
//! - The debounced, single-flight resource synchronizer
//! - Resource clients for work orders, clients and dashboard stats
//! - The pure view projection engine
//!
//! ## Architecture Principles
//! - Only depends on `invoicedesk-domain` and `invoicedesk-common`
//! - All I/O goes through traits implemented in `invoicedesk-infra`
//! - State is published as immutable snapshots over `tokio::sync::watch`

pub mod auth;
pub mod projection;
pub mod resources;
pub mod sync;
pub mod transport;

pub use auth::{CredentialStore, MemoryCredentialStore, SessionGuardedTransport, SessionManager};
pub use projection::{project, FilterSpec, Projectable, Projection, SortDirection, SortSpec};
pub use resources::{ClientsResource, DashboardStatsResource, WorkOrdersResource};
pub use sync::{page_source_fn, FetchState, PageSource, ResourceSynchronizer};
pub use transport::{ApiRequest, HttpMethod, Transport};
