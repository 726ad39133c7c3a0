use serde::{Deserialize, Serialize};

/// View filter over the record set. All set criteria must hold (AND).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockFilter {
    /// Case-insensitive substring match across name, barcode, description.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact category match.
    #[serde(default)]
    pub category: Option<String>,
    /// Exact location match.
    #[serde(default)]
    pub location: Option<String>,
    /// Keep only records at or below their minimum quantity (0 if unset).
    #[serde(default)]
    pub low_stock: bool,
    /// Keep only records with zero quantity.
    #[serde(default)]
    pub no_stock: bool,
}

impl StockFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && !self.low_stock
            && !self.no_stock
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Barcode,
    Quantity,
    Category,
    Location,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}
