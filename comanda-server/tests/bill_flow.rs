//! Bill-request consolidation and station registry behavior

use comanda_server::{FeedBus, OrderStore, RetryPolicy, StationRegistry, Storage, SystemRequest};
use comanda_server::orders::classifier;
use shared::models::MenuItem;
use shared::order::{OrderDraft, OrderLine};
use std::sync::Arc;
use tempfile::TempDir;

fn setup() -> (Arc<OrderStore>, StationRegistry, TempDir) {
    let dir = TempDir::new().unwrap();
    let storage = Storage::open(dir.path().join("orders.redb")).unwrap();
    let bus = Arc::new(FeedBus::new());
    let store = Arc::new(OrderStore::new(
        storage.clone(),
        bus,
        RetryPolicy::default(),
    ));
    let registry = StationRegistry::new(storage, RetryPolicy::default());
    (store, registry, dir)
}

#[tokio::test]
async fn test_bill_request_consolidates_table_tab() {
    let (store, _registry, _dir) = setup();

    store
        .create_order(
            "t1",
            OrderDraft::new("7", vec![OrderLine::new("a", "Tortilla", 12.5, 1)], 12.5),
        )
        .await
        .unwrap();
    store
        .create_order(
            "t1",
            OrderDraft::new("7", vec![OrderLine::new("b", "Ensalada", 8.0, 1)], 8.0),
        )
        .await
        .unwrap();
    // another table's tab must not leak in
    store
        .create_order(
            "t1",
            OrderDraft::new("4", vec![OrderLine::new("c", "Entrecot", 100.0, 1)], 100.0),
        )
        .await
        .unwrap();

    let bill_order = store.request_bill("t1", "7").await.unwrap();
    assert_eq!(classifier::classify(&bill_order), Some(SystemRequest::Bill));
    assert_eq!(bill_order.total, 0.0);
    assert_eq!(bill_order.items.len(), 1);

    let bill = store.consolidate_bill("t1", "7").await.unwrap();
    assert_eq!(bill.total, 20.5);
    assert_eq!(bill.items.len(), 2);
    assert!(
        bill.items
            .iter()
            .all(|l| l.item_id != "bill-req" && l.item_id != "help-req")
    );
}

#[tokio::test]
async fn test_consolidation_reflects_pending_state_at_call_time() {
    let (store, _registry, _dir) = setup();

    let first = store
        .create_order(
            "t1",
            OrderDraft::new("7", vec![OrderLine::new("a", "Tortilla", 12.5, 1)], 12.5),
        )
        .await
        .unwrap();
    store
        .create_order(
            "t1",
            OrderDraft::new("7", vec![OrderLine::new("b", "Ensalada", 8.0, 1)], 8.0),
        )
        .await
        .unwrap();

    assert_eq!(store.consolidate_bill("t1", "7").await.unwrap().total, 20.5);

    // completing one order shrinks the tab on the next consolidation
    store.complete_order("t1", &first.id).await.unwrap();
    assert_eq!(store.consolidate_bill("t1", "7").await.unwrap().total, 8.0);
}

#[tokio::test]
async fn test_help_request_defaults_blank_message() {
    let (store, _registry, _dir) = setup();

    let help = store.request_help("t1", "3", None).await.unwrap();
    assert_eq!(classifier::classify(&help), Some(SystemRequest::Help));
    assert_eq!(
        classifier::help_message(&help).as_deref(),
        Some(classifier::DEFAULT_HELP_MESSAGE)
    );
}

#[tokio::test]
async fn test_station_delete_unassigns_menu_but_keeps_orders() {
    let (store, registry, _dir) = setup();

    let station = registry
        .create_station("t1", "Plancha", "#cc3333")
        .await
        .unwrap();

    let mut item = MenuItem::new("t1", "Tortilla", 4.5);
    item.station_id = Some(station.id.clone());
    registry.upsert_menu_item(&item).await.unwrap();

    // an order routed to the station before deletion
    let order = store
        .create_order(
            "t1",
            OrderDraft::new(
                "4",
                vec![OrderLine::new(&item.id, "Tortilla", 4.5, 1).with_station(&station.id)],
                4.5,
            ),
        )
        .await
        .unwrap();

    registry.delete_station("t1", &station.id).await.unwrap();

    // menu item unassigned for future orders
    let items = registry.list_menu_items("t1").await.unwrap();
    assert!(items[0].station_id.is_none());

    // historical order line keeps its station binding (immutable snapshot)
    let pending = store.list_pending("t1").await.unwrap();
    assert_eq!(pending[0].id, order.id);
    assert_eq!(pending[0].items[0].station_id.as_deref(), Some(station.id.as_str()));

    // stations list no longer contains it
    assert!(registry.list_stations("t1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_station_is_not_found() {
    let (_store, registry, _dir) = setup();
    assert!(registry.delete_station("t1", "nope").await.is_err());
}
