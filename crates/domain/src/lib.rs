//! # InvoiceDesk Domain
//!
//! Business domain types and models for the InvoiceDesk dashboard client.
//!
//! This crate contains:
//! - Credential, identity and session types
//! - Pagination metadata and the server response envelope
//! - Resource models (work orders, clients, dashboard stats) and their query
//!   parameters
//! - Configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other InvoiceDesk crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
