//! Pure filter/sort projection over the record set.
//!
//! Never mutates its input; running the same query twice over the same
//! records yields the same output.

use std::cmp::Ordering;

use crate::models::{SortDirection, SortField, StockFilter, StockItem};

/// Derive a filtered, sorted view. Borrowed items, original set untouched.
pub fn query<'a>(
    items: &'a [StockItem],
    filter: &StockFilter,
    sort_field: SortField,
    direction: SortDirection,
) -> Vec<&'a StockItem> {
    let mut view: Vec<&StockItem> = items.iter().filter(|item| matches(item, filter)).collect();
    view.sort_by(|a, b| {
        let ordering = compare(a, b, sort_field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    view
}

fn matches(item: &StockItem, filter: &StockFilter) -> bool {
    if let Some(search) = filter.search.as_deref() {
        if !search.is_empty() {
            let needle = search.to_lowercase();
            let hit = item.name.to_lowercase().contains(&needle)
                || item.barcode.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
    }
    if let Some(category) = filter.category.as_deref() {
        if item.category != category {
            return false;
        }
    }
    if let Some(location) = filter.location.as_deref() {
        if item.location != location {
            return false;
        }
    }
    if filter.low_stock && item.quantity > item.min_quantity.unwrap_or(0) {
        return false;
    }
    if filter.no_stock && item.quantity > 0 {
        return false;
    }
    true
}

fn compare(a: &StockItem, b: &StockItem, field: SortField) -> Ordering {
    match field {
        SortField::Name => text_cmp(&a.name, &b.name),
        SortField::Barcode => text_cmp(&a.barcode, &b.barcode),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::Category => text_cmp(&a.category, &b.category),
        SortField::Location => text_cmp(&a.location, &b.location),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

// Case-insensitive, ties broken case-sensitively so the order is total.
fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
