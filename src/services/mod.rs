pub mod import;
pub mod inventory;

pub use import::MergeSummary;
pub use inventory::{InventoryService, ScanOutcome};
