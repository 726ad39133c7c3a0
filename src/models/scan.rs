use serde::{Deserialize, Serialize};

/// A decoded barcode handed to the core by an acquisition collaborator
/// (camera, USB wedge, or manual entry). The core does not care which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub code: String,
    /// Symbology reported by the scanner, e.g. "ean_13". Informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ScanResult {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            format: None,
        }
    }
}
