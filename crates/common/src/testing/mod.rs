//! Testing utilities and helpers
//!
//! - **[`assertions`]**: ordering assertions for projected collections
//! - **[`async_utils`]**: waiting on `watch` snapshots under tokio's paused
//!   clock

pub mod assertions;
pub mod async_utils;

pub use assertions::assert_sorted_by_key;
pub use async_utils::wait_for_state;
