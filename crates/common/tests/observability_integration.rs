//! Tracing subscriber initialisation.

use invoicedesk_common::observability::{build_filter, init_tracing};
use invoicedesk_domain::{DashboardError, LoggingConfig};

/// Validates filter parsing and idempotent initialisation.
///
/// Assertions:
/// - an invalid directive surfaces as a config error
/// - the first install succeeds and the second is a no-op
#[test]
fn init_tracing_is_idempotent() {
    std::env::remove_var("RUST_LOG");

    let invalid = LoggingConfig { filter: "invoicedesk=loud".to_string(), json: false };
    assert!(matches!(build_filter(&invalid), Err(DashboardError::Config(_))));

    let config = LoggingConfig { filter: "debug".to_string(), json: true };
    assert!(init_tracing(&config).unwrap());
    assert!(!init_tracing(&config).unwrap());
}
