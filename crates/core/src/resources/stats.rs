//! Dashboard headline statistics.

use std::sync::Arc;

use async_trait::async_trait;
use invoicedesk_domain::constants::DASHBOARD_STATS_PATH;
use invoicedesk_domain::{DashboardStats, Page, Result, StatsQuery};

use crate::sync::PageSource;
use crate::transport::{get_data, Transport};

/// `GET /dashboard/stats`, served to the synchronizer as a one-item page.
pub struct DashboardStatsResource {
    transport: Arc<dyn Transport>,
}

impl DashboardStatsResource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn fetch(&self, query: &StatsQuery) -> Result<DashboardStats> {
        get_data(self.transport.as_ref(), DASHBOARD_STATS_PATH, query.to_query_pairs()).await
    }
}

#[async_trait]
impl PageSource<StatsQuery, DashboardStats> for DashboardStatsResource {
    async fn fetch_page(&self, params: StatsQuery) -> Result<Page<DashboardStats>> {
        Ok(Page::single(self.fetch(&params).await?))
    }
}
