//! Dashboard API transport
//!
//! Maps [`invoicedesk_core::ApiRequest`] values onto HTTP calls against the
//! configured base URL and decodes the `{success, data, message, timestamp}`
//! response envelope.

pub mod errors;
pub mod transport;

pub use errors::{ApiError, ApiErrorCategory};
pub use transport::HttpTransport;
