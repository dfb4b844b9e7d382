//! Integration tests for the view projection engine.

use chrono::{DateTime, TimeZone, Utc};
use invoicedesk_common::testing::assert_sorted_by_key;
use invoicedesk_core::projection::{ClientFacet, ClientSortKey, WorkOrderFacet, WorkOrderSortKey};
use invoicedesk_core::{project, FilterSpec, SortSpec};
use invoicedesk_domain::{Client, ClientStatus, Priority, WorkOrder, WorkOrderStatus};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, d, 9, 0, 0).unwrap()
}

fn order(id: &str, status: WorkOrderStatus, due: Option<DateTime<Utc>>) -> WorkOrder {
    WorkOrder {
        id: id.to_string(),
        title: format!("Job {id}"),
        description: None,
        status,
        priority: Priority::Medium,
        client_id: None,
        client_name: None,
        assignee: None,
        tags: Vec::new(),
        due_date: due,
        created_at: None,
        amount: None,
    }
}

fn ids(items: &[WorkOrder]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

fn board() -> Vec<WorkOrder> {
    vec![
        WorkOrder {
            title: "Replace boiler".into(),
            description: Some("Annual contract".into()),
            client_name: Some("Northwind".into()),
            assignee: Some("Maria".into()),
            tags: vec!["heating".into()],
            priority: Priority::High,
            amount: Some(900.0),
            ..order("WO-1", WorkOrderStatus::Pending, Some(day(10)))
        },
        WorkOrder {
            title: "Roof inspection".into(),
            client_name: Some("Contoso".into()),
            priority: Priority::Low,
            amount: Some(150.0),
            ..order("WO-2", WorkOrderStatus::InProgress, Some(day(3)))
        },
        WorkOrder {
            title: "boiler pressure check".into(),
            assignee: Some("Dev".into()),
            tags: vec!["heating".into(), "urgent-call".into()],
            priority: Priority::Urgent,
            ..order("WO-3", WorkOrderStatus::Completed, None)
        },
        WorkOrder {
            title: "Paint hallway".into(),
            client_name: Some("northwind".into()),
            priority: Priority::Medium,
            amount: Some(400.0),
            ..order("WO-4", WorkOrderStatus::Pending, Some(day(3)))
        },
    ]
}

#[test]
fn test_status_filter_example() {
    let items = vec![
        order("A", WorkOrderStatus::Pending, Some(day(20))),
        order("B", WorkOrderStatus::Completed, Some(day(5))),
    ];

    let filter = FilterSpec::new().with_facet(WorkOrderFacet::Status, ["pending"]);
    assert_eq!(ids(&project(&items, &filter, &SortSpec::none())), vec!["A"]);

    let by_due = SortSpec::ascending(WorkOrderSortKey::DueDate);
    assert_eq!(ids(&project(&items, &FilterSpec::new(), &by_due)), vec!["B", "A"]);
}

/// Validates that an empty filter only reorders.
///
/// Assertions:
/// - Every item survives under every sort key and direction
/// - The source collection is left in its original order
#[test]
fn test_empty_filter_never_drops_items() {
    let items = board();
    let keys = [
        WorkOrderSortKey::Title,
        WorkOrderSortKey::Status,
        WorkOrderSortKey::Priority,
        WorkOrderSortKey::ClientName,
        WorkOrderSortKey::DueDate,
        WorkOrderSortKey::CreatedAt,
        WorkOrderSortKey::Amount,
    ];

    for key in keys {
        for sort in [SortSpec::ascending(key), SortSpec::descending(key)] {
            let output = project(&items, &FilterSpec::new(), &sort);
            let mut projected = ids(&output);
            projected.sort_unstable();
            assert_eq!(projected, vec!["WO-1", "WO-2", "WO-3", "WO-4"], "{sort:?}");
        }
    }
    assert_eq!(ids(&items), vec!["WO-1", "WO-2", "WO-3", "WO-4"]);
}

#[test]
fn test_reprojecting_sorted_output_is_idempotent() {
    let items = board();
    let filter = FilterSpec::new().with_facet(WorkOrderFacet::Tag, ["heating", "urgent-call"]);

    for sort in [
        SortSpec::ascending(WorkOrderSortKey::DueDate),
        SortSpec::descending(WorkOrderSortKey::ClientName),
        SortSpec::descending(WorkOrderSortKey::Amount),
        SortSpec::ascending(WorkOrderSortKey::Title),
    ] {
        let once = project(&items, &filter, &sort);
        let twice = project(&once, &filter, &sort);
        assert_eq!(once, twice, "{sort:?}");
    }
}

#[test]
fn test_ties_keep_source_order() {
    let items = board();

    let by_due = project(&items, &FilterSpec::new(), &SortSpec::ascending(WorkOrderSortKey::DueDate));
    assert_eq!(ids(&by_due), vec!["WO-2", "WO-4", "WO-1", "WO-3"]);

    // Names equal up to case fall back to byte order.
    let by_client = project(&items, &FilterSpec::new(), &SortSpec::ascending(WorkOrderSortKey::ClientName));
    assert_eq!(ids(&by_client), vec!["WO-2", "WO-1", "WO-4", "WO-3"]);
}

#[test]
fn test_search_covers_every_searchable_field() {
    let items = board();
    let search = |text: &str| {
        let filter = FilterSpec::new().with_search(text);
        ids(&project(&items, &filter, &SortSpec::none())).into_iter().map(str::to_string).collect::<Vec<_>>()
    };

    assert_eq!(search("BOILER"), vec!["WO-1", "WO-3"]);
    assert_eq!(search("annual"), vec!["WO-1"]);
    assert_eq!(search("wo-2"), vec!["WO-2"]);
    assert_eq!(search("contoso"), vec!["WO-2"]);
    assert_eq!(search("dev"), vec!["WO-3"]);
    assert_eq!(search("urgent-call"), vec!["WO-3"]);
    assert_eq!(search("   "), vec!["WO-1", "WO-2", "WO-3", "WO-4"]);
    assert!(search("plumbing").is_empty());
}

#[test]
fn test_facets_are_anded_and_values_ored() {
    let items = board();
    let filter = FilterSpec::new()
        .with_facet(WorkOrderFacet::Status, ["pending", "completed"])
        .with_facet(WorkOrderFacet::Priority, ["high", "urgent"]);

    assert_eq!(ids(&project(&items, &filter, &SortSpec::none())), vec!["WO-1", "WO-3"]);

    let cleared = filter.clone().with_facet(WorkOrderFacet::Priority, Vec::<String>::new());
    assert_eq!(ids(&project(&items, &cleared, &SortSpec::none())), vec!["WO-1", "WO-3", "WO-4"]);
}

#[test]
fn test_priority_sorts_by_rank() {
    let sorted = project(&board(), &FilterSpec::new(), &SortSpec::descending(WorkOrderSortKey::Priority));

    assert_sorted_by_key(&sorted, |order| std::cmp::Reverse(order.priority.rank()));
    assert_eq!(sorted[0].id, "WO-3");
}

#[test]
fn test_clients_project_by_name_case_insensitively() {
    let client = |id: &str, name: &str, status: ClientStatus| Client {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        phone: None,
        company: None,
        status,
        tags: Vec::new(),
        created_at: None,
        total_billed: None,
    };
    let clients = vec![
        client("c1", "zeta Works", ClientStatus::Active),
        client("c2", "Alpha Ltd", ClientStatus::Inactive),
        client("c3", "beta Co", ClientStatus::Active),
    ];

    let filter = FilterSpec::new().with_facet(ClientFacet::Status, ["active"]);
    let projected = project(&clients, &filter, &SortSpec::ascending(ClientSortKey::Name));

    let names: Vec<_> = projected.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["beta Co", "zeta Works"]);
}
