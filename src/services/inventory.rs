//! Stock reconciliation engine.
//!
//! Owns the record set, both name registries, and session settings. Every
//! mutation is all-or-nothing at the single-record level and appends exactly
//! one ledger entry to the affected record. With auto-save on, each
//! successful mutation persists the affected blob; persistence failures are
//! logged and swallowed so the session keeps operating in memory.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{StockError, StockResult};
use crate::history::{HistoryAction, StockHistory};
use crate::ids;
use crate::models::{AppSettings, ItemPatch, NewItem, ScanResult, StockItem};
use crate::registry::Registry;
use crate::store::{self, BlobStore};

/// Result of reconciling one scan against the record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScanOutcome {
    /// An existing record matched; its quantity was incremented by one.
    Matched(StockItem),
    /// No record holds this barcode; the caller must complete creation.
    NeedsCreation(String),
}

pub struct InventoryService<S: BlobStore> {
    store: S,
    items: Vec<StockItem>,
    categories: Registry,
    locations: Registry,
    settings: AppSettings,
}

impl<S: BlobStore> InventoryService<S> {
    /// Opens a session over the given store, loading persisted state.
    /// Absent or corrupt blobs fall back to defaults.
    pub fn open(store: S) -> Self {
        let items = store::load_items(&store);
        let categories = store::load_categories(&store);
        let locations = store::load_locations(&store);
        let settings = store::load_settings(&store);
        info!(
            items = items.len(),
            categories = categories.len(),
            locations = locations.len(),
            "session opened"
        );
        Self {
            store,
            items,
            categories,
            locations,
            settings,
        }
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn item(&self, id: Uuid) -> Option<&StockItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Exact, case-sensitive barcode lookup.
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&StockItem> {
        self.items.iter().find(|i| i.barcode == barcode)
    }

    /// Reconciles one scan: an exact barcode match increments that record's
    /// quantity by one and appends a `scan` ledger entry; a miss mutates
    /// nothing and asks the caller to complete creation.
    #[instrument(skip(self, scan), fields(code = %scan.code))]
    pub fn reconcile(&mut self, scan: &ScanResult) -> ScanOutcome {
        let Some(index) = self.items.iter().position(|i| i.barcode == scan.code) else {
            info!("no record for scanned barcode");
            return ScanOutcome::NeedsCreation(scan.code.clone());
        };

        let now = ids::now();
        let item = &mut self.items[index];
        let old_quantity = item.quantity;
        item.quantity = old_quantity.saturating_add(1);
        item.updated_at = now;
        item.history.push(StockHistory::field_change(
            HistoryAction::Scan,
            now,
            "quantity",
            old_quantity,
            item.quantity,
            "Scanned - quantity increased",
        ));
        info!(name = %item.name, quantity = item.quantity, "scan matched");
        let matched = item.clone();
        self.autosave_items();
        ScanOutcome::Matched(matched)
    }

    /// Creates a record from a completed form. Fails on blank barcode/name,
    /// negative money fields, or a barcode already in the active set.
    #[instrument(skip(self, new), fields(barcode = %new.barcode))]
    pub fn create_item(&mut self, new: NewItem) -> StockResult<&StockItem> {
        self.create_with_note(new, "Item added to inventory", true)
    }

    pub(crate) fn create_with_note(
        &mut self,
        new: NewItem,
        note: &str,
        at_front: bool,
    ) -> StockResult<&StockItem> {
        new.validate()?;
        validate_money("cost", new.cost)?;
        validate_money("price", new.price)?;
        if self.find_by_barcode(&new.barcode).is_some() {
            return Err(StockError::DuplicateBarcode(new.barcode));
        }

        let now = ids::now();
        let item = StockItem {
            id: ids::record_id(),
            barcode: new.barcode,
            name: new.name,
            description: new.description,
            quantity: new.quantity,
            unit: new.unit,
            category: new.category,
            location: new.location,
            min_quantity: new.min_quantity,
            max_quantity: new.max_quantity,
            cost: new.cost,
            price: new.price,
            supplier: new.supplier,
            notes: new.notes,
            created_at: now,
            updated_at: now,
            history: vec![StockHistory::record(HistoryAction::Add, now, note)],
        };
        info!(name = %item.name, "item created");

        let index = if at_front {
            self.items.insert(0, item);
            0
        } else {
            self.items.push(item);
            self.items.len() - 1
        };
        self.autosave_items();
        Ok(&self.items[index])
    }

    /// Applies a full-field patch, as from an edit form. Identity, creation
    /// time, and the ledger are preserved; one `update` entry is appended.
    #[instrument(skip(self, patch))]
    pub fn update_item(&mut self, id: Uuid, patch: ItemPatch) -> StockResult<&StockItem> {
        self.update_with_note(id, patch, "Item details updated")
    }

    pub(crate) fn update_with_note(
        &mut self,
        id: Uuid,
        patch: ItemPatch,
        note: &str,
    ) -> StockResult<&StockItem> {
        patch.validate()?;
        validate_money("cost", patch.cost)?;
        validate_money("price", patch.price)?;
        if self
            .items
            .iter()
            .any(|i| i.id != id && i.barcode == patch.barcode)
        {
            return Err(StockError::DuplicateBarcode(patch.barcode));
        }
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| StockError::NotFound(format!("item {id}")))?;

        let now = ids::now();
        let item = &mut self.items[index];
        item.barcode = patch.barcode;
        item.name = patch.name;
        item.description = patch.description;
        item.quantity = patch.quantity;
        item.unit = patch.unit;
        item.category = patch.category;
        item.location = patch.location;
        item.min_quantity = patch.min_quantity;
        item.max_quantity = patch.max_quantity;
        item.cost = patch.cost;
        item.price = patch.price;
        item.supplier = patch.supplier;
        item.notes = patch.notes;
        item.updated_at = now;
        item.history
            .push(StockHistory::record(HistoryAction::Update, now, note));
        info!(name = %item.name, "item updated");
        self.autosave_items();
        Ok(&self.items[index])
    }

    /// Clamped quantity adjustment: the new quantity is `max(0, q + delta)`.
    /// Never rejected, even when the delta would go negative.
    #[instrument(skip(self))]
    pub fn adjust_quantity(&mut self, id: Uuid, delta: i64) -> StockResult<&StockItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| StockError::NotFound(format!("item {id}")))?;

        let now = ids::now();
        let item = &mut self.items[index];
        let old_quantity = item.quantity;
        let adjusted = i64::from(old_quantity)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));
        item.quantity = adjusted as u32;
        item.updated_at = now;
        item.history.push(StockHistory::field_change(
            HistoryAction::AdjustQuantity,
            now,
            "quantity",
            old_quantity,
            item.quantity,
            &adjust_note(delta),
        ));
        info!(name = %item.name, old = old_quantity, new = item.quantity, "quantity adjusted");
        self.autosave_items();
        Ok(&self.items[index])
    }

    /// Removes a record from the active set, returning it. The ledger is
    /// discarded with the record; there is no tombstone retention.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: Uuid) -> StockResult<StockItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| StockError::NotFound(format!("item {id}")))?;
        let item = self.items.remove(index);
        info!(name = %item.name, "item removed");
        self.autosave_items();
        Ok(item)
    }

    pub fn categories(&self) -> &Registry {
        &self.categories
    }

    pub fn locations(&self) -> &Registry {
        &self.locations
    }

    pub fn add_category(&mut self, name: &str) -> StockResult<()> {
        self.categories.add(name)?;
        self.autosave_categories();
        Ok(())
    }

    /// Does not cascade: records referencing the removed name keep it.
    pub fn remove_category(&mut self, name: &str) -> StockResult<()> {
        self.categories.remove(name)?;
        self.autosave_categories();
        Ok(())
    }

    pub fn add_location(&mut self, name: &str) -> StockResult<()> {
        self.locations.add(name)?;
        self.autosave_locations();
        Ok(())
    }

    pub fn remove_location(&mut self, name: &str) -> StockResult<()> {
        self.locations.remove(name)?;
        self.autosave_locations();
        Ok(())
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: AppSettings) {
        self.settings = settings;
        if let Err(err) = store::save_settings(&mut self.store, &self.settings) {
            warn!(error = %err, "failed to persist settings");
        }
    }

    /// Persists every blob explicitly, surfacing the first failure.
    pub fn save(&mut self) -> StockResult<()> {
        store::save_items(&mut self.store, &self.items)?;
        store::save_categories(&mut self.store, &self.categories)?;
        store::save_locations(&mut self.store, &self.locations)?;
        store::save_settings(&mut self.store, &self.settings)
    }

    /// Empties the record set and resets registries and settings to their
    /// defaults, dropping every persisted blob.
    #[instrument(skip(self))]
    pub fn clear_all(&mut self) -> StockResult<()> {
        self.items.clear();
        self.categories = Registry::default_categories();
        self.locations = Registry::default_locations();
        self.settings = AppSettings::default();
        store::clear_all(&mut self.store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn autosave_items(&mut self) {
        if !self.settings.auto_save {
            return;
        }
        if let Err(err) = store::save_items(&mut self.store, &self.items) {
            warn!(error = %err, "failed to persist items");
        }
    }

    fn autosave_categories(&mut self) {
        if !self.settings.auto_save {
            return;
        }
        if let Err(err) = store::save_categories(&mut self.store, &self.categories) {
            warn!(error = %err, "failed to persist categories");
        }
    }

    fn autosave_locations(&mut self) {
        if !self.settings.auto_save {
            return;
        }
        if let Err(err) = store::save_locations(&mut self.store, &self.locations) {
            warn!(error = %err, "failed to persist locations");
        }
    }
}

// Positive deltas carry an explicit sign, zero and negatives print as-is.
fn adjust_note(delta: i64) -> String {
    if delta > 0 {
        format!("Adjusted by +{delta}")
    } else {
        format!("Adjusted by {delta}")
    }
}

fn validate_money(field: &str, value: Option<Decimal>) -> StockResult<()> {
    match value {
        Some(v) if v < Decimal::ZERO => Err(StockError::Validation(format!(
            "{field} must be non-negative"
        ))),
        _ => Ok(()),
    }
}
