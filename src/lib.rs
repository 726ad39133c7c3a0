//! Stocktake library
//!
//! Barcode-driven stock reconciliation with a per-record append-only audit
//! ledger. A scan either increments an existing record's quantity or asks
//! the caller to complete creation; pure read-side views (filter/sort,
//! statistics) are recomputed from the record set on every observation.
//! Persistence is a local key-value blob store; there is no server.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod codec;
pub mod errors;
pub mod history;
pub mod ids;
pub mod models;
pub mod query;
pub mod registry;
pub mod services;
pub mod stats;
pub mod store;

pub use errors::{StockError, StockResult};
pub use history::{HistoryAction, StockHistory};
pub use models::{
    AppSettings, ImportedRow, ItemPatch, NewItem, ScanResult, SortDirection, SortField,
    StockFilter, StockItem,
};
pub use query::query;
pub use registry::Registry;
pub use services::{InventoryService, MergeSummary, ScanOutcome};
pub use stats::{compute_stats, StockStats};
pub use store::{BlobStore, FileStore, MemoryStore};
