//! Dashboard statistics

use serde::{Deserialize, Serialize};

use super::work_order::WorkOrder;

/// Headline numbers shown on the dashboard landing screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_work_orders: u64,
    pub pending_work_orders: u64,
    pub in_progress_work_orders: u64,
    pub completed_work_orders: u64,
    pub total_clients: u64,
    pub active_clients: u64,
    pub total_revenue: f64,
    pub recent_work_orders: Vec<WorkOrder>,
}

/// Optional reporting window, e.g. `"30d"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub period: Option<String>,
}

impl StatsQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.period.iter().map(|period| ("period".to_string(), period.clone())).collect()
    }
}
