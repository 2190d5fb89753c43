use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Duplicate product id {0} in catalog")]
    DuplicateProduct(i64),

    #[error("Product {0} not found")]
    ProductNotFound(i64),

    #[error("Storage quota exceeded: key '{key}' needs {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
