//! Integration tests for the debounced, single-flight resource synchronizer.
//!
//! All tests run on the paused Tokio clock so debounce windows and slow
//! responses are simulated without real waiting.

mod support;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use invoicedesk_common::testing::wait_for_state;
use invoicedesk_core::{
    page_source_fn, DashboardStatsResource, HttpMethod, PageSource, ResourceSynchronizer,
    WorkOrdersResource,
};
use invoicedesk_domain::constants::{DASHBOARD_STATS_PATH, WORK_ORDERS_PATH};
use invoicedesk_domain::{DashboardError, Page, PageInfo, StatsQuery, WorkOrderQuery};
use parking_lot::Mutex;
use serde_json::json;
use support::{ok, page_of, work_order, ScriptedTransport};

const DEBOUNCE: Duration = Duration::from_millis(50);

/// Page source that records every fetch and the peak number running at once.
#[derive(Default)]
struct Recorder {
    fetched: Mutex<Vec<u64>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    completed: AtomicUsize,
    fail: AtomicBool,
}

impl Recorder {
    fn source(self: &Arc<Self>, latency: Duration) -> Arc<dyn PageSource<u64, u64>> {
        let recorder = Arc::clone(self);
        Arc::new(page_source_fn(move |page: u64| {
            let recorder = Arc::clone(&recorder);
            async move {
                recorder.fetched.lock().push(page);
                let active = recorder.active.fetch_add(1, Ordering::SeqCst) + 1;
                recorder.max_active.fetch_max(active, Ordering::SeqCst);
                tokio::time::sleep(latency).await;
                recorder.active.fetch_sub(1, Ordering::SeqCst);
                recorder.completed.fetch_add(1, Ordering::SeqCst);

                if recorder.fail.load(Ordering::SeqCst) {
                    Err(DashboardError::Network("connection refused".into()))
                } else {
                    Ok(Page::new(vec![page * 10, page * 10 + 1], PageInfo::new(42, page, 2)))
                }
            }
        }))
    }

    fn fetched(&self) -> Vec<u64> {
        self.fetched.lock().clone()
    }
}

/// Validates debouncing of a burst of parameter changes.
///
/// Assertions:
/// - Keystrokes 20ms apart inside a 50ms window produce one request
/// - The request carries the final search text
#[tokio::test(start_paused = true)]
async fn burst_of_param_changes_issues_one_fetch_with_last_params() {
    let transport = ScriptedTransport::new();
    transport.on(HttpMethod::Get, WORK_ORDERS_PATH, |_| {
        ok(page_of(vec![work_order("A", "Boiler service", "pending", "2024-03-01T00:00:00Z")], 1, 1, 10))
    });
    let source = Arc::new(WorkOrdersResource::new(transport.clone()));
    let sync = ResourceSynchronizer::new(source, WorkOrderQuery::default(), DEBOUNCE);

    for typed in ["b", "bo", "boi", "boil"] {
        sync.update_params(|query| query.search = Some(typed.to_string()));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].query.contains(&("search".to_string(), "boil".to_string())));
    let state = sync.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, "A");
    assert_eq!(state.params.search.as_deref(), Some("boil"));
}

/// Validates the in-flight guard.
///
/// Assertions:
/// - Requests made while a fetch is running never overlap it
/// - A dropped request is replayed once, with the latest params
#[tokio::test(start_paused = true)]
async fn requests_during_a_fetch_are_dropped_then_replayed_once() {
    let recorder = Arc::new(Recorder::default());
    let sync = ResourceSynchronizer::mount(recorder.source(Duration::from_millis(200)), 1, DEBOUNCE);

    tokio::time::sleep(Duration::from_millis(10)).await;
    sync.update_params(|page| *page = 2);
    tokio::time::sleep(Duration::from_millis(60)).await;
    sync.refetch().await;
    sync.update_params(|page| *page = 3);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(recorder.fetched(), vec![1, 3]);
    assert_eq!(recorder.max_active.load(Ordering::SeqCst), 1);
    let state = sync.snapshot();
    assert_eq!(state.pagination.page, 3);
    assert_eq!(*state.items, vec![30, 31]);
}

#[tokio::test(start_paused = true)]
async fn loading_flag_tracks_the_fetch() {
    let recorder = Arc::new(Recorder::default());
    let sync = ResourceSynchronizer::mount(recorder.source(Duration::from_millis(100)), 1, DEBOUNCE);

    assert!(sync.snapshot().is_loading);

    let mut rx = sync.subscribe();
    let settled = wait_for_state(&mut rx, Duration::from_secs(1), |state| !state.is_loading).await.unwrap();

    assert_eq!(*settled.items, vec![10, 11]);
    assert_eq!(settled.pagination, PageInfo::new(42, 1, 2));
    assert_eq!(settled.pagination.total_pages, 21);
    assert!(settled.pagination.has_next);
    assert!(!settled.pagination.has_prev);
}

/// Validates failure handling.
///
/// Assertions:
/// - A failed fetch keeps the previous items allocation
/// - `error` is set to a user-facing message and loading ends
/// - A later successful fetch clears the error
#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_previous_items() {
    let recorder = Arc::new(Recorder::default());
    let sync = ResourceSynchronizer::new(recorder.source(Duration::from_millis(5)), 1, DEBOUNCE);
    sync.refetch().await;
    let before = sync.snapshot().items;

    recorder.fail.store(true, Ordering::SeqCst);
    sync.refetch().await;

    let failed = sync.snapshot();
    assert!(Arc::ptr_eq(&before, &failed.items));
    assert!(failed.error.as_deref().is_some_and(|message| !message.is_empty()));
    assert!(!failed.is_loading);

    recorder.fail.store(false, Ordering::SeqCst);
    sync.refetch().await;
    assert!(sync.snapshot().error.is_none());
}

#[tokio::test(start_paused = true)]
async fn mutate_refetches_whatever_the_write_outcome() {
    let recorder = Arc::new(Recorder::default());
    let sync = ResourceSynchronizer::new(recorder.source(Duration::from_millis(5)), 1, DEBOUNCE);

    let created = sync.mutate(async { Ok::<_, DashboardError>("wo-7") }).await;
    assert_eq!(created, Ok("wo-7"));
    assert_eq!(recorder.fetched().len(), 1);

    let failed = sync
        .mutate(async { Err::<(), _>(DashboardError::Rejected("Title is required".into())) })
        .await;
    assert_eq!(failed, Err(DashboardError::Rejected("Title is required".into())));
    assert_eq!(recorder.fetched().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn unmount_lets_dispatched_fetch_finish() {
    let recorder = Arc::new(Recorder::default());
    let sync = ResourceSynchronizer::mount(recorder.source(Duration::from_millis(100)), 1, DEBOUNCE);

    tokio::time::sleep(Duration::from_millis(10)).await;
    sync.update_params(|page| *page = 2);
    drop(sync);
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(recorder.completed.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.fetched(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn stats_are_served_as_a_single_item_page() {
    let transport = ScriptedTransport::new();
    transport.on(HttpMethod::Get, DASHBOARD_STATS_PATH, |_| {
        ok(json!({ "totalWorkOrders": 12, "pendingWorkOrders": 4, "totalClients": 3, "totalRevenue": 1520.5 }))
    });
    let sync = ResourceSynchronizer::new(
        Arc::new(DashboardStatsResource::new(transport.clone())),
        StatsQuery::default(),
        DEBOUNCE,
    );

    sync.refetch().await;

    let state = sync.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].total_work_orders, 12);
    assert_eq!(state.pagination.total, 1);
    assert!(!state.pagination.has_next);
}
