//! Domain types and models

pub mod auth;
pub mod client;
pub mod page;
pub mod session;
pub mod stats;
pub mod work_order;

pub use auth::{
    AuthPayload, Credentials, Identity, LoginRequest, RefreshRequest, RegisterRequest, UserDto,
};
pub use client::{Client, ClientDraft, ClientQuery, ClientStatus};
pub use page::{ApiEnvelope, Page, PageInfo};
pub use session::{Phase, Session};
pub use stats::{DashboardStats, StatsQuery};
pub use work_order::{Priority, WorkOrder, WorkOrderDraft, WorkOrderQuery, WorkOrderStatus};
