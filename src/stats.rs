//! Dashboard statistics, recomputed from the record set on every
//! observation. Pure function of its inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::StockItem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockStats {
    pub total_items: usize,
    pub total_quantity: u64,
    /// Sum of cost * quantity; records without a cost contribute zero.
    pub total_value: Decimal,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
    pub categories: usize,
    pub locations: usize,
}

pub fn compute_stats(items: &[StockItem], categories: usize, locations: usize) -> StockStats {
    StockStats {
        total_items: items.len(),
        total_quantity: items.iter().map(|i| u64::from(i.quantity)).sum(),
        total_value: items
            .iter()
            .map(|i| i.cost.unwrap_or(Decimal::ZERO) * Decimal::from(i.quantity))
            .sum(),
        low_stock_items: items.iter().filter(|i| i.is_low_stock()).count(),
        out_of_stock_items: items.iter().filter(|i| i.is_out_of_stock()).count(),
        categories,
        locations,
    }
}
