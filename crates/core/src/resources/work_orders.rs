//! Work order list and write operations.

use std::sync::Arc;

use async_trait::async_trait;
use invoicedesk_domain::constants::WORK_ORDERS_PATH;
use invoicedesk_domain::{
    Page, Result, WorkOrder, WorkOrderDraft, WorkOrderQuery, WorkOrderStatus,
};
use serde_json::json;
use tracing::debug;

use super::member_path;
use crate::sync::PageSource;
use crate::transport::{delete_data, get_data, post_data, put_data, Transport};

pub struct WorkOrdersResource {
    transport: Arc<dyn Transport>,
}

impl WorkOrdersResource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, query: &WorkOrderQuery) -> Result<Page<WorkOrder>> {
        get_data(self.transport.as_ref(), WORK_ORDERS_PATH, query.to_query_pairs()).await
    }

    pub async fn get(&self, id: &str) -> Result<WorkOrder> {
        get_data(self.transport.as_ref(), &member_path(WORK_ORDERS_PATH, id)?, Vec::new()).await
    }

    pub async fn create(&self, draft: &WorkOrderDraft) -> Result<WorkOrder> {
        let created: WorkOrder = post_data(self.transport.as_ref(), WORK_ORDERS_PATH, draft).await?;
        debug!(id = %created.id, "work order created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, draft: &WorkOrderDraft) -> Result<WorkOrder> {
        put_data(self.transport.as_ref(), &member_path(WORK_ORDERS_PATH, id)?, draft).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        delete_data(self.transport.as_ref(), &member_path(WORK_ORDERS_PATH, id)?).await?;
        debug!(%id, "work order deleted");
        Ok(())
    }

    /// `PUT /work-orders/{id}/status`
    pub async fn set_status(&self, id: &str, status: WorkOrderStatus) -> Result<WorkOrder> {
        let path = format!("{}/status", member_path(WORK_ORDERS_PATH, id)?);
        put_data(self.transport.as_ref(), &path, &json!({ "status": status })).await
    }
}

#[async_trait]
impl PageSource<WorkOrderQuery, WorkOrder> for WorkOrdersResource {
    async fn fetch_page(&self, params: WorkOrderQuery) -> Result<Page<WorkOrder>> {
        self.list(&params).await
    }
}
