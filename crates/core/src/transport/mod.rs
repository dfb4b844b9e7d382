//! Transport boundary
//!
//! The core never talks HTTP itself. It builds [`ApiRequest`] values and
//! hands them to a [`Transport`] implemented by the infrastructure crate.

pub mod ports;
pub mod typed;

pub use ports::{ApiRequest, HttpMethod, Transport};
pub use typed::{decode_data, delete_data, get_data, post_data, put_data};
