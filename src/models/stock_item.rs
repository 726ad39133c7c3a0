use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::history::StockHistory;

/// A tracked inventory record.
///
/// The barcode is the external matching key; uniqueness among active records
/// is enforced by the inventory service, not here. Records are only mutated
/// through the service, and every mutation appends exactly one ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Uuid,
    pub barcode: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    /// Free-text unit label, e.g. "pcs", "kg".
    pub unit: String,
    /// Weak reference into the category registry; orphans are tolerated.
    pub category: String,
    /// Weak reference into the location registry; orphans are tolerated.
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<StockHistory>,
}

impl StockItem {
    /// Low stock: a threshold is set, the quantity is at or below it, and
    /// there is still something on the shelf. A quantity of zero is out of
    /// stock, never low stock.
    pub fn is_low_stock(&self) -> bool {
        match self.min_quantity {
            Some(min) => self.quantity <= min && self.quantity > 0,
            None => false,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }
}

/// Fields supplied by the caller when creating a record. Ids, timestamps,
/// and the initial ledger entry are assigned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewItem {
    #[validate(length(min = 1, message = "Barcode must not be empty"))]
    pub barcode: String,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: u32,
    pub unit: String,
    pub category: String,
    pub location: String,
    #[serde(default)]
    pub min_quantity: Option<u32>,
    #[serde(default)]
    pub max_quantity: Option<u32>,
    #[serde(default)]
    pub cost: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Full-field patch applied by `update_item`, as from an edit form. The
/// whole patched record becomes the new state; identity, creation time, and
/// the ledger are preserved by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ItemPatch {
    #[validate(length(min = 1, message = "Barcode must not be empty"))]
    pub barcode: String,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub unit: String,
    pub category: String,
    pub location: String,
    pub min_quantity: Option<u32>,
    pub max_quantity: Option<u32>,
    pub cost: Option<Decimal>,
    pub price: Option<Decimal>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

impl From<&StockItem> for ItemPatch {
    fn from(item: &StockItem) -> Self {
        Self {
            barcode: item.barcode.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            category: item.category.clone(),
            location: item.location.clone(),
            min_quantity: item.min_quantity,
            max_quantity: item.max_quantity,
            cost: item.cost,
            price: item.price,
            supplier: item.supplier.clone(),
            notes: item.notes.clone(),
        }
    }
}

/// One parsed spreadsheet row. Every field is independently optional; merge
/// semantics (row field wins when present) live in the import engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportedRow {
    pub barcode: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<u32>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_quantity: Option<u32>,
    pub max_quantity: Option<u32>,
    pub cost: Option<Decimal>,
    pub price: Option<Decimal>,
    pub supplier: Option<String>,
    pub notes: Option<String>,
}

impl ImportedRow {
    /// A row without both a barcode and a name cannot be reconciled and is
    /// skipped by the import engine.
    pub fn is_importable(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.barcode) && filled(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, min_quantity: Option<u32>) -> StockItem {
        StockItem {
            id: Uuid::new_v4(),
            barcode: "111".into(),
            name: "Widget".into(),
            description: String::new(),
            quantity,
            unit: "pcs".into(),
            category: "Tools".into(),
            location: "Warehouse A".into(),
            min_quantity,
            max_quantity: None,
            cost: None,
            price: None,
            supplier: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            history: Vec::new(),
        }
    }

    #[test]
    fn low_stock_requires_threshold_and_nonzero_quantity() {
        assert!(item(2, Some(2)).is_low_stock());
        assert!(!item(3, Some(2)).is_low_stock());
        assert!(!item(0, Some(2)).is_low_stock());
        assert!(!item(1, None).is_low_stock());
    }

    #[test]
    fn out_of_stock_ignores_thresholds() {
        assert!(item(0, Some(5)).is_out_of_stock());
        assert!(item(0, None).is_out_of_stock());
        assert!(!item(1, None).is_out_of_stock());
    }

    #[test]
    fn row_importability_requires_barcode_and_name() {
        let mut row = ImportedRow {
            barcode: Some("123".into()),
            name: Some("Thing".into()),
            ..Default::default()
        };
        assert!(row.is_importable());
        row.name = Some("   ".into());
        assert!(!row.is_importable());
        row.name = None;
        assert!(!row.is_importable());
    }
}
