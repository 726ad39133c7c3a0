//! Id and timestamp capture for records and ledger entries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Fresh id for a stock record.
pub fn record_id() -> Uuid {
    Uuid::new_v4()
}

/// Fresh id for a history ledger entry.
pub fn entry_id() -> Uuid {
    Uuid::new_v4()
}

/// Mutation timestamp. Single capture point so a record's `updated_at` and
/// its ledger entry can share the same instant.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
