//! Append-only per-record audit ledger.
//!
//! Every mutation of a stock record appends exactly one entry here. Entries
//! are never edited or removed after append; within one record, insertion
//! order is chronological order. There is no global ordering requirement
//! across records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids;

/// Kind of change recorded in a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Add,
    Update,
    Delete,
    AdjustQuantity,
    Scan,
}

impl HistoryAction {
    /// The persisted snake_case form, for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Add => "add",
            HistoryAction::Update => "update",
            HistoryAction::Delete => "delete",
            HistoryAction::AdjustQuantity => "adjust_quantity",
            HistoryAction::Scan => "scan",
        }
    }
}

/// One immutable entry in a record's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockHistory {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    /// Set when the action is a single-field change (e.g. quantity).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    /// Human-readable summary of the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StockHistory {
    /// Whole-record entry: no field-level old/new values.
    pub fn record(action: HistoryAction, timestamp: DateTime<Utc>, notes: &str) -> Self {
        Self {
            id: ids::entry_id(),
            timestamp,
            action,
            field: None,
            old_value: None,
            new_value: None,
            notes: Some(notes.to_string()),
        }
    }

    /// Single-field entry carrying old and new values.
    pub fn field_change(
        action: HistoryAction,
        timestamp: DateTime<Utc>,
        field: &str,
        old_value: impl ToString,
        new_value: impl ToString,
        notes: &str,
    ) -> Self {
        Self {
            id: ids::entry_id(),
            timestamp,
            action,
            field: Some(field.to_string()),
            old_value: Some(old_value.to_string()),
            new_value: Some(new_value.to_string()),
            notes: Some(notes.to_string()),
        }
    }
}
