//! End-to-end scenarios over the reconciliation engine with an in-memory
//! store.

use assert_matches::assert_matches;
use stocktake::{
    compute_stats, query, InventoryService, ItemPatch, MemoryStore, NewItem, ScanOutcome,
    ScanResult, SortDirection, SortField, StockError, StockFilter,
};

fn service() -> InventoryService<MemoryStore> {
    InventoryService::open(MemoryStore::new())
}

fn new_item(barcode: &str, name: &str, quantity: u32) -> NewItem {
    NewItem {
        barcode: barcode.into(),
        name: name.into(),
        description: String::new(),
        quantity,
        unit: "pcs".into(),
        category: "Tools".into(),
        location: "Warehouse A".into(),
        min_quantity: None,
        max_quantity: None,
        cost: None,
        price: None,
        supplier: None,
        notes: None,
    }
}

#[test]
fn scan_adjust_scenario_tracks_stock_status() {
    let mut svc = service();
    let mut item = new_item("111", "Widget", 3);
    item.min_quantity = Some(2);
    let id = svc.create_item(item).unwrap().id;

    // Scan "111": matched, quantity 4, above threshold.
    let outcome = svc.reconcile(&ScanResult::new("111"));
    let matched = assert_matches!(outcome, ScanOutcome::Matched(i) => i);
    assert_eq!(matched.quantity, 4);
    assert!(!matched.is_low_stock());

    // Adjust by -3: quantity 1, low stock.
    let item = svc.adjust_quantity(id, -3).unwrap();
    assert_eq!(item.quantity, 1);
    assert!(item.is_low_stock());
    assert!(!item.is_out_of_stock());

    // Adjust by -5: clamped to 0, out of stock, not low stock.
    let item = svc.adjust_quantity(id, -5).unwrap();
    assert_eq!(item.quantity, 0);
    assert!(item.is_out_of_stock());
    assert!(!item.is_low_stock());
}

#[test]
fn created_item_is_visible_to_unfiltered_query_exactly_once() {
    let mut svc = service();
    svc.create_item(new_item("111", "Widget", 1)).unwrap();
    let view = query(
        svc.items(),
        &StockFilter::default(),
        SortField::Name,
        SortDirection::Asc,
    );
    assert_eq!(
        view.iter().filter(|i| i.barcode == "111").count(),
        1,
        "new record must appear exactly once"
    );
}

#[test]
fn ledger_orders_entries_by_append_time() {
    let mut svc = service();
    let id = svc.create_item(new_item("111", "Widget", 1)).unwrap().id;
    svc.reconcile(&ScanResult::new("111"));
    svc.adjust_quantity(id, 2).unwrap();
    svc.update_item(id, ItemPatch::from(svc.item(id).unwrap()))
        .unwrap();

    let item = svc.item(id).unwrap();
    assert_eq!(item.history.len(), 4);
    for window in item.history.windows(2) {
        assert!(window[0].timestamp <= window[1].timestamp);
    }
    // Creation time never moves; updated_at tracks the last mutation.
    assert!(item.updated_at >= item.created_at);
}

#[test]
fn failed_creation_leaves_stats_unchanged() {
    let mut svc = service();
    svc.create_item(new_item("111", "Widget", 2)).unwrap();
    let before = compute_stats(svc.items(), svc.categories().len(), svc.locations().len());

    let err = svc.create_item(new_item("111", "Clone", 9)).unwrap_err();
    assert_matches!(err, StockError::DuplicateBarcode(_));

    let after = compute_stats(svc.items(), svc.categories().len(), svc.locations().len());
    assert_eq!(before, after);
}

#[test]
fn session_state_survives_reopen() {
    let mut store = MemoryStore::new();
    {
        let mut svc = InventoryService::open(store.clone());
        svc.create_item(new_item("111", "Widget", 3)).unwrap();
        svc.add_category("Spare Parts").unwrap();
        // MemoryStore clones share nothing, so hand the mutated store back.
        store = svc.store().clone();
    }

    let svc = InventoryService::open(store);
    assert_eq!(svc.items().len(), 1);
    let item = svc.find_by_barcode("111").unwrap();
    assert_eq!(item.quantity, 3);
    assert_eq!(item.history.len(), 1);
    assert!(svc.categories().contains("Spare Parts"));
}

#[test]
fn default_registries_seed_new_sessions() {
    let svc = service();
    assert_eq!(svc.categories().len(), 7);
    assert!(svc.categories().contains("Electronics"));
    assert_eq!(svc.locations().len(), 7);
    assert!(svc.locations().contains("Warehouse A"));
    assert_eq!(svc.settings().default_unit, "pcs");
}

#[test]
fn removing_last_registry_entry_is_rejected() {
    let mut svc = service();
    let names: Vec<String> = svc.categories().names().to_vec();
    // Drain down to one entry, then the invariant kicks in.
    for name in &names[1..] {
        svc.remove_category(name).unwrap();
    }
    assert_eq!(svc.categories().len(), 1);
    let last = names[0].clone();
    assert_matches!(
        svc.remove_category(&last),
        Err(StockError::RegistryInvariant(_))
    );
    assert_eq!(svc.categories().len(), 1);
}

#[test]
fn clear_all_resets_to_defaults() {
    let mut svc = service();
    svc.create_item(new_item("111", "Widget", 1)).unwrap();
    svc.add_category("Extra").unwrap();
    svc.clear_all().unwrap();
    assert!(svc.items().is_empty());
    assert_eq!(svc.categories().len(), 7);
    assert!(!svc.categories().contains("Extra"));
}

#[test]
fn items_round_trip_through_persistence_with_timestamps() {
    let mut svc = service();
    let id = svc.create_item(new_item("111", "Widget", 3)).unwrap().id;
    svc.reconcile(&ScanResult::new("111"));
    let original = svc.item(id).unwrap().clone();

    let reopened = InventoryService::open(svc.store().clone());
    let restored = reopened.item(id).unwrap();
    assert_eq!(restored, &original);
    assert_eq!(restored.created_at, original.created_at);
    assert_eq!(
        restored.history.last().unwrap().timestamp,
        original.history.last().unwrap().timestamp
    );
}
