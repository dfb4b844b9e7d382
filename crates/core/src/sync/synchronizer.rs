//! Debounced, single-flight resource synchronizer
//!
//! Each list screen owns one [`ResourceSynchronizer`]. Parameter changes
//! restart a debounce timer; when it fires the latest params are fetched.
//! At most one fetch runs at a time: a request that arrives while a fetch is
//! in flight is dropped and remembered, and one fresh debounced cycle runs
//! once the in-flight fetch has finished.
//!
//! Fetches run on their own task, so cancelling the timer (a newer param
//! change, or dropping the synchronizer) never cancels a dispatched request.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use invoicedesk_common::{ErrorClassification, ErrorSeverity};
use invoicedesk_domain::{DashboardError, PageInfo, Result};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::ports::PageSource;

/// Snapshot published to subscribers after every change.
///
/// `items` is shared: a failed fetch republishes the same allocation, so
/// `Arc::ptr_eq` tells a consumer nothing changed.
pub struct FetchState<P, T> {
    pub items: Arc<Vec<T>>,
    pub pagination: PageInfo,
    pub is_loading: bool,
    pub error: Option<String>,
    pub params: P,
}

impl<P: Clone, T> Clone for FetchState<P, T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            pagination: self.pagination,
            is_loading: self.is_loading,
            error: self.error.clone(),
            params: self.params.clone(),
        }
    }
}

impl<P: fmt::Debug, T> fmt::Debug for FetchState<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchState")
            .field("items", &self.items.len())
            .field("pagination", &self.pagination)
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .field("params", &self.params)
            .finish()
    }
}

impl<P, T> FetchState<P, T> {
    fn initial(params: P) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            pagination: PageInfo::default(),
            is_loading: false,
            error: None,
            params,
        }
    }
}

/// Per-screen fetch engine. Dropping it cancels the pending debounce timer.
///
/// Must be used from within a Tokio runtime.
pub struct ResourceSynchronizer<P, T> {
    engine: Arc<Engine<P, T>>,
}

struct Engine<P, T> {
    source: Arc<dyn PageSource<P, T>>,
    state: watch::Sender<FetchState<P, T>>,
    debounce: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
    in_flight: AtomicBool,
    /// Set when a fetch request was dropped by the in-flight guard.
    pending: AtomicBool,
    closed: AtomicBool,
}

/// Releases the in-flight guard when the fetch task ends, even by panic.
struct InFlightGuard<P, T> {
    engine: Arc<Engine<P, T>>,
}

impl<P, T> Drop for InFlightGuard<P, T> {
    fn drop(&mut self) {
        self.engine.in_flight.store(false, Ordering::SeqCst);
    }
}

impl<P, T> ResourceSynchronizer<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// Create an idle synchronizer. Nothing is fetched until params change
    /// or [`ResourceSynchronizer::refetch`] is called.
    pub fn new(source: Arc<dyn PageSource<P, T>>, initial: P, debounce: Duration) -> Self {
        let (state, _) = watch::channel(FetchState::initial(initial));
        Self {
            engine: Arc::new(Engine {
                source,
                state,
                debounce,
                timer: Mutex::new(None),
                in_flight: AtomicBool::new(false),
                pending: AtomicBool::new(false),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Create a synchronizer and dispatch the first fetch immediately.
    pub fn mount(source: Arc<dyn PageSource<P, T>>, initial: P, debounce: Duration) -> Self {
        let synchronizer = Self::new(source, initial, debounce);
        synchronizer.engine.try_spawn_fetch();
        synchronizer
    }

    /// Watch every published [`FetchState`].
    pub fn subscribe(&self) -> watch::Receiver<FetchState<P, T>> {
        self.engine.state.subscribe()
    }

    /// Current state. Cheap: the item list is shared, not copied.
    pub fn snapshot(&self) -> FetchState<P, T> {
        self.engine.state.borrow().clone()
    }

    /// The params the next fetch will use.
    pub fn params(&self) -> P {
        self.engine.state.borrow().params.clone()
    }

    /// Apply a partial update to the params and restart the debounce window.
    ///
    /// ```rust,ignore
    /// work_orders.update_params(|q| q.search = Some("boiler".into()));
    /// ```
    pub fn update_params<F>(&self, update: F)
    where
        F: FnOnce(&mut P),
    {
        self.engine.state.send_modify(|state| update(&mut state.params));
        self.engine.schedule();
    }

    /// Fetch the current params now, skipping the debounce window.
    ///
    /// Resolves when the fetch has been applied. If another fetch is in
    /// flight this request is dropped and returns at once; the latest params
    /// are fetched after the in-flight one completes.
    pub async fn refetch(&self) {
        self.engine.cancel_timer();
        let Some(task) = self.engine.try_spawn_fetch() else {
            return;
        };
        if let Err(err) = task.await {
            error!(error = %err, "fetch task ended abnormally");
        }
    }

    /// Run a remote write, then refetch the list whatever its outcome.
    ///
    /// # Errors
    /// Returns the write's own error after the refetch has run.
    pub async fn mutate<R, W>(&self, write: W) -> Result<R>
    where
        W: Future<Output = Result<R>>,
    {
        let outcome = write.await;
        if let Err(err) = &outcome {
            warn!(error = %err, "remote write failed; refreshing list anyway");
        }
        self.refetch().await;
        outcome
    }
}

impl<P, T> Drop for ResourceSynchronizer<P, T> {
    fn drop(&mut self) {
        self.engine.closed.store(true, Ordering::Release);
        self.engine.cancel_timer();
    }
}

impl<P, T> Engine<P, T> {
    fn cancel_timer(&self) {
        if let Some(timer) = self.timer.lock().take() {
            timer.abort();
        }
    }
}

impl<P, T> Engine<P, T>
where
    P: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    /// (Re)start the debounce timer.
    fn schedule(self: &Arc<Self>) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }

        let engine = Arc::clone(self);
        let delay = self.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            engine.try_spawn_fetch();
        });

        if let Some(previous) = self.timer.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Claim the in-flight guard and dispatch a fetch of the current params.
    fn try_spawn_fetch(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("fetch already in flight; request dropped");
            self.remember_dropped();
            return None;
        }

        let guard = InFlightGuard { engine: Arc::clone(self) };
        let params = self.state.borrow().params.clone();
        self.state.send_if_modified(|state| !std::mem::replace(&mut state.is_loading, true));

        let engine = Arc::clone(self);
        Some(tokio::spawn(async move { engine.run_fetch(params, guard).await }))
    }

    async fn run_fetch(self: Arc<Self>, params: P, guard: InFlightGuard<P, T>) {
        match self.source.fetch_page(params).await {
            Ok(page) => {
                debug!(
                    items = page.items.len(),
                    total = page.pagination.total,
                    page = page.pagination.page,
                    "page fetched"
                );
                self.state.send_modify(|state| {
                    state.items = Arc::new(page.items);
                    state.pagination = page.pagination;
                    state.error = None;
                    state.is_loading = false;
                });
            }
            Err(err) => {
                log_fetch_failure(&err);
                let message = err.user_message();
                self.state.send_modify(|state| {
                    state.error = Some(message);
                    state.is_loading = false;
                });
            }
        }

        drop(guard);
        self.replay_dropped();
    }

    /// Flag a request the in-flight guard turned away.
    ///
    /// The fetch that blocked it may have finished and checked the flag
    /// between the failed claim and this store, so the guard is checked
    /// again afterwards.
    fn remember_dropped(self: &Arc<Self>) {
        self.pending.store(true, Ordering::SeqCst);
        if !self.in_flight.load(Ordering::SeqCst) {
            self.replay_dropped();
        }
    }

    fn replay_dropped(self: &Arc<Self>) {
        if self.pending.swap(false, Ordering::SeqCst) {
            debug!("replaying dropped fetch request");
            self.schedule();
        }
    }
}

fn log_fetch_failure(err: &DashboardError) {
    match err.severity() {
        ErrorSeverity::Info => debug!(error = %err, "fetch failed"),
        ErrorSeverity::Warning => warn!(error = %err, retryable = err.is_retryable(), "fetch failed"),
        ErrorSeverity::Error | ErrorSeverity::Critical => error!(error = %err, "fetch failed"),
    }
}
