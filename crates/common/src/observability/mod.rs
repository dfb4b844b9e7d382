//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured filter so operators can
//! raise verbosity without touching configuration files.

use invoicedesk_domain::{DashboardError, LoggingConfig};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to `config.filter`.
///
/// # Errors
/// Returns `DashboardError::Config` if the configured directive is invalid.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, DashboardError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            DashboardError::Config(format!("Invalid log filter '{}': {}", config.filter, e))
        }),
    }
}

/// Install the global tracing subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, so calling
/// this more than once is harmless.
///
/// # Errors
/// Returns `DashboardError::Config` if the log filter cannot be parsed.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, DashboardError> {
    let filter = build_filter(config)?;

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry().with(filter).with(fmt::layer().with_target(true)).try_init().is_ok()
    };

    if installed {
        tracing::debug!(json = config.json, "tracing subscriber installed");
    }

    Ok(installed)
}
