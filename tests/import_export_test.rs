//! CSV boundary and import merge behavior.

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use stocktake::{
    codec, InventoryService, MemoryStore, MergeSummary, NewItem, StockError,
};

fn service() -> InventoryService<MemoryStore> {
    InventoryService::open(MemoryStore::new())
}

fn new_item(barcode: &str, name: &str, quantity: u32) -> NewItem {
    NewItem {
        barcode: barcode.into(),
        name: name.into(),
        description: "desc".into(),
        quantity,
        unit: "pcs".into(),
        category: "Tools".into(),
        location: "Warehouse A".into(),
        min_quantity: Some(2),
        max_quantity: Some(50),
        cost: Some(dec!(10.50)),
        price: Some(dec!(15.99)),
        supplier: Some("Acme".into()),
        notes: None,
    }
}

#[test]
fn export_then_import_restores_field_values() {
    let mut source = service();
    source.create_item(new_item("111", "Widget", 3)).unwrap();
    source.create_item(new_item("222", "Gadget", 0)).unwrap();
    let bytes = codec::export_csv(source.items()).unwrap();

    let mut target = service();
    let summary = target.merge_import(codec::import_csv(&bytes).unwrap());
    assert_eq!(summary, MergeSummary { added: 2, updated: 0 });

    let widget = target.find_by_barcode("111").unwrap();
    assert_eq!(widget.name, "Widget");
    assert_eq!(widget.quantity, 3);
    assert_eq!(widget.min_quantity, Some(2));
    assert_eq!(widget.cost, Some(dec!(10.50)));
    assert_eq!(widget.price, Some(dec!(15.99)));
    assert_eq!(widget.supplier.as_deref(), Some("Acme"));
}

#[test]
fn reimport_counts_as_updates_not_additions() {
    let mut svc = service();
    svc.create_item(new_item("111", "Widget", 3)).unwrap();
    let bytes = codec::export_csv(svc.items()).unwrap();

    let summary = svc.merge_import(codec::import_csv(&bytes).unwrap());
    assert_eq!(summary, MergeSummary { added: 0, updated: 1 });
    assert_eq!(svc.items().len(), 1);
    // The update leaves an audit trail entry.
    let item = svc.find_by_barcode("111").unwrap();
    assert_eq!(
        item.history.last().unwrap().notes.as_deref(),
        Some("Updated via import")
    );
}

#[test]
fn rows_without_identity_are_skipped_not_fatal() {
    let csv = "\
Barcode,Name,Quantity
111,Widget,5
,NoBarcode,2
222,,4
333,Gadget,1
";
    let mut svc = service();
    let summary = svc.merge_import(codec::import_csv(csv.as_bytes()).unwrap());
    assert_eq!(summary, MergeSummary { added: 2, updated: 0 });
    assert_eq!(svc.items().len(), 2);
}

#[test]
fn undecodable_bytes_are_an_import_parse_error() {
    // Invalid UTF-8 in a record cannot be decoded as CSV text.
    let bytes = b"Barcode,Name\n\xff\xfe\x00\x01,Broken\n";
    assert_matches!(codec::import_csv(bytes), Err(StockError::ImportParse(_)));
}

#[test]
fn template_round_trips_into_a_record() {
    let bytes = codec::export_template().unwrap();
    let mut svc = service();
    let summary = svc.merge_import(codec::import_csv(&bytes).unwrap());
    assert_eq!(summary, MergeSummary { added: 1, updated: 0 });
    let item = svc.find_by_barcode("123456789").unwrap();
    assert_eq!(item.name, "Sample Item");
    assert_eq!(item.quantity, 10);
    assert_eq!(item.category, "Electronics");
    assert_eq!(item.cost, Some(dec!(10.50)));
}
