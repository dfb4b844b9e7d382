//! Application-scoped wiring of the dashboard client
//!
//! [`DashboardContext`] owns one credential store, one HTTP transport and one
//! session manager. Screens ask it for resource clients and synchronizers;
//! nothing here is a process-wide global.

use std::sync::Arc;
use std::time::Duration;

use invoicedesk_core::{
    ClientsResource, CredentialStore, DashboardStatsResource, ResourceSynchronizer,
    SessionGuardedTransport, SessionManager, Transport, WorkOrdersResource,
};
use invoicedesk_domain::{
    Client, ClientQuery, Config, DashboardStats, Result, StatsQuery, WorkOrder, WorkOrderQuery,
};
use tracing::info;

use crate::api::HttpTransport;
use crate::storage::open_credential_store;

/// Lifecycle object for one running dashboard.
pub struct DashboardContext {
    config: Config,
    store: Arc<dyn CredentialStore>,
    session: SessionManager,
    transport: Arc<dyn Transport>,
    work_orders: Arc<WorkOrdersResource>,
    clients: Arc<ClientsResource>,
    stats: Arc<DashboardStatsResource>,
}

impl DashboardContext {
    /// Build every component and run the silent session initialisation.
    ///
    /// Resolves once the session has settled on `Authenticated` or
    /// `Anonymous`.
    ///
    /// # Errors
    /// Returns `DashboardError::Config` if the API base URL is invalid or the
    /// HTTP client cannot be built.
    pub async fn create(config: Config) -> Result<Self> {
        let store = open_credential_store(&config.storage);
        let raw: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.api, Arc::clone(&store))?);
        Ok(Self::assemble(config, store, raw).await)
    }

    /// Build a context over an existing store and raw transport.
    pub async fn with_parts(
        config: Config,
        store: Arc<dyn CredentialStore>,
        raw_transport: Arc<dyn Transport>,
    ) -> Self {
        Self::assemble(config, store, raw_transport).await
    }

    async fn assemble(
        config: Config,
        store: Arc<dyn CredentialStore>,
        raw: Arc<dyn Transport>,
    ) -> Self {
        // The session manager talks to the raw transport so its own refresh
        // call is never intercepted by the guard.
        let session = SessionManager::start(Arc::clone(&raw), Arc::clone(&store)).await;
        let transport: Arc<dyn Transport> =
            Arc::new(SessionGuardedTransport::new(raw, session.clone()));

        info!(
            base_url = %config.api.base_url,
            storage = %config.storage.backend,
            phase = %session.phase(),
            "dashboard context ready"
        );

        Self {
            work_orders: Arc::new(WorkOrdersResource::new(Arc::clone(&transport))),
            clients: Arc::new(ClientsResource::new(Arc::clone(&transport))),
            stats: Arc::new(DashboardStatsResource::new(Arc::clone(&transport))),
            config,
            store,
            session,
            transport,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.store)
    }

    /// Transport that refreshes the session once on a 401 and retries.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn work_orders(&self) -> Arc<WorkOrdersResource> {
        Arc::clone(&self.work_orders)
    }

    pub fn clients(&self) -> Arc<ClientsResource> {
        Arc::clone(&self.clients)
    }

    pub fn stats(&self) -> Arc<DashboardStatsResource> {
        Arc::clone(&self.stats)
    }

    fn debounce(&self) -> Duration {
        Duration::from_millis(self.config.sync.debounce_ms)
    }

    /// Mount the work order list screen: first page at the configured size.
    pub fn mount_work_orders(&self) -> ResourceSynchronizer<WorkOrderQuery, WorkOrder> {
        let query = WorkOrderQuery { limit: self.config.sync.page_size, ..WorkOrderQuery::default() };
        ResourceSynchronizer::mount(self.work_orders(), query, self.debounce())
    }

    /// Mount the client list screen: first page at the configured size.
    pub fn mount_clients(&self) -> ResourceSynchronizer<ClientQuery, Client> {
        let query = ClientQuery { limit: self.config.sync.page_size, ..ClientQuery::default() };
        ResourceSynchronizer::mount(self.clients(), query, self.debounce())
    }

    pub fn mount_stats(&self) -> ResourceSynchronizer<StatsQuery, DashboardStats> {
        ResourceSynchronizer::mount(self.stats(), StatsQuery::default(), self.debounce())
    }

    /// Stop the session manager. Synchronizers are torn down by dropping them.
    pub fn teardown(self) {
        self.session.teardown();
        info!("dashboard context torn down");
    }
}
