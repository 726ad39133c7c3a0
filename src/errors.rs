use serde::Serialize;

/// Service-level error for all inventory operations.
///
/// Every variant is recoverable at the boundary: a failed operation leaves
/// the record set and registries exactly as they were.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum StockError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate barcode: {0}")]
    DuplicateBarcode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Registry invariant: {0}")]
    RegistryInvariant(String),

    #[error("Import parse error: {0}")]
    ImportParse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(
        #[from]
        #[serde(skip)]
        serde_json::Error,
    ),
}

impl From<validator::ValidationErrors> for StockError {
    fn from(err: validator::ValidationErrors) -> Self {
        StockError::Validation(err.to_string())
    }
}

impl From<std::io::Error> for StockError {
    fn from(err: std::io::Error) -> Self {
        StockError::Storage(err.to_string())
    }
}

pub type StockResult<T> = Result<T, StockError>;
