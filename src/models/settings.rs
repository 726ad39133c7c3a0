use serde::{Deserialize, Serialize};

/// Session preferences, persisted under their own blob key. Partial or
/// absent blobs fall back field-by-field to these defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub auto_save: bool,
    pub show_low_stock_alerts: bool,
    pub default_unit: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            show_low_stock_alerts: true,
            default_unit: "pcs".to_string(),
        }
    }
}
