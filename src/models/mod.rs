pub mod filter;
pub mod scan;
pub mod settings;
pub mod stock_item;

pub use filter::{SortDirection, SortField, StockFilter};
pub use scan::ScanResult;
pub use settings::AppSettings;
pub use stock_item::{ImportedRow, ItemPatch, NewItem, StockItem};
