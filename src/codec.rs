//! Spreadsheet boundary: CSV encode/decode with a fixed column schema.
//!
//! Import matches headers exactly (case-sensitive). Numeric cells that fail
//! to parse degrade rather than error: quantity falls back to 0, optional
//! numerics to absent. Only undecodable input is a parse failure; row-level
//! problems are resolved by the import merge engine, not here.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::{StockError, StockResult};
use crate::models::{ImportedRow, StockItem};

/// Export column order, headers exactly as written and expected back.
pub const COLUMNS: [&str; 15] = [
    "Barcode",
    "Name",
    "Description",
    "Quantity",
    "Unit",
    "Category",
    "Location",
    "Min Quantity",
    "Max Quantity",
    "Cost",
    "Price",
    "Supplier",
    "Notes",
    "Created At",
    "Updated At",
];

/// Serializes the record set with the full column schema. Absent optionals
/// become empty cells; timestamps are RFC 3339.
pub fn export_csv(items: &[StockItem]) -> StockResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(COLUMNS)
        .map_err(|e| StockError::Storage(e.to_string()))?;
    for item in items {
        writer
            .write_record([
                item.barcode.clone(),
                item.name.clone(),
                item.description.clone(),
                item.quantity.to_string(),
                item.unit.clone(),
                item.category.clone(),
                item.location.clone(),
                opt_num(item.min_quantity),
                opt_num(item.max_quantity),
                opt_dec(item.cost),
                opt_dec(item.price),
                item.supplier.clone().unwrap_or_default(),
                item.notes.clone().unwrap_or_default(),
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
            ])
            .map_err(|e| StockError::Storage(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| StockError::Storage(e.to_string()))
}

/// Single representative example row for user guidance. Same layout as the
/// import schema, without the timestamp columns.
pub fn export_template() -> StockResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&COLUMNS[..13])
        .map_err(|e| StockError::Storage(e.to_string()))?;
    writer
        .write_record([
            "123456789",
            "Sample Item",
            "Sample description",
            "10",
            "pcs",
            "Electronics",
            "Warehouse A",
            "5",
            "50",
            "10.50",
            "15.99",
            "Sample Supplier",
            "Sample notes",
        ])
        .map_err(|e| StockError::Storage(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| StockError::Storage(e.to_string()))
}

/// Decodes CSV bytes into partial records. Fails only when the bytes cannot
/// be decoded as CSV at all.
pub fn import_csv(bytes: &[u8]) -> StockResult<Vec<ImportedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| StockError::ImportParse(e.to_string()))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let barcode_col = column("Barcode");
    let name_col = column("Name");
    let description_col = column("Description");
    let quantity_col = column("Quantity");
    let unit_col = column("Unit");
    let category_col = column("Category");
    let location_col = column("Location");
    let min_quantity_col = column("Min Quantity");
    let max_quantity_col = column("Max Quantity");
    let cost_col = column("Cost");
    let price_col = column("Price");
    let supplier_col = column("Supplier");
    let notes_col = column("Notes");

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StockError::ImportParse(e.to_string()))?;
        let cell = |col: Option<usize>| col.and_then(|i| record.get(i)).map(str::trim);
        let text_or = |col: Option<usize>, default: &str| {
            let value = cell(col).unwrap_or_default();
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        rows.push(ImportedRow {
            barcode: Some(text_or(barcode_col, "")),
            name: Some(text_or(name_col, "")),
            description: Some(text_or(description_col, "")),
            quantity: Some(
                cell(quantity_col)
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(0),
            ),
            unit: Some(text_or(unit_col, "pcs")),
            category: Some(text_or(category_col, "Uncategorized")),
            location: Some(text_or(location_col, "Unknown")),
            min_quantity: cell(min_quantity_col).and_then(|v| v.parse::<u32>().ok()),
            max_quantity: cell(max_quantity_col).and_then(|v| v.parse::<u32>().ok()),
            cost: cell(cost_col).and_then(|v| Decimal::from_str(v).ok()),
            price: cell(price_col).and_then(|v| Decimal::from_str(v).ok()),
            supplier: Some(text_or(supplier_col, "")),
            notes: Some(text_or(notes_col, "")),
        });
    }
    Ok(rows)
}

fn opt_num(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn opt_dec(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
