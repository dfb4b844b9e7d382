//! Remote resource clients used by the dashboard screens.
//!
//! Each client implements [`PageSource`](crate::sync::PageSource) for its
//! list endpoint so it can drive a
//! [`ResourceSynchronizer`](crate::sync::ResourceSynchronizer), and exposes
//! the write operations that screen offers.

pub mod clients;
pub mod stats;
pub mod work_orders;

pub use clients::ClientsResource;
pub use stats::DashboardStatsResource;
pub use work_orders::WorkOrdersResource;

use invoicedesk_domain::{DashboardError, Result};

/// `{collection}/{id}` for a server-issued identifier.
fn member_path(collection: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(DashboardError::InvalidInput(format!("Invalid resource id: {id:?}")));
    }
    Ok(format!("{collection}/{id}"))
}
