//! Client list and write operations.

use std::sync::Arc;

use async_trait::async_trait;
use invoicedesk_domain::constants::CLIENTS_PATH;
use invoicedesk_domain::{Client, ClientDraft, ClientQuery, Page, Result};

use super::member_path;
use crate::sync::PageSource;
use crate::transport::{delete_data, get_data, post_data, put_data, Transport};

pub struct ClientsResource {
    transport: Arc<dyn Transport>,
}

impl ClientsResource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, query: &ClientQuery) -> Result<Page<Client>> {
        get_data(self.transport.as_ref(), CLIENTS_PATH, query.to_query_pairs()).await
    }

    pub async fn create(&self, draft: &ClientDraft) -> Result<Client> {
        post_data(self.transport.as_ref(), CLIENTS_PATH, draft).await
    }

    pub async fn update(&self, id: &str, draft: &ClientDraft) -> Result<Client> {
        put_data(self.transport.as_ref(), &member_path(CLIENTS_PATH, id)?, draft).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        delete_data(self.transport.as_ref(), &member_path(CLIENTS_PATH, id)?).await
    }
}

#[async_trait]
impl PageSource<ClientQuery, Client> for ClientsResource {
    async fn fetch_page(&self, params: ClientQuery) -> Result<Page<Client>> {
        self.list(&params).await
    }
}
