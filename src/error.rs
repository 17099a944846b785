use rust_decimal::Decimal;
use thiserror::Error;

/// System faults. Business declines are not errors; they travel as a
/// [`StatusCode`](crate::domain::status::StatusCode) inside a normal response.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Account {0} not found")]
    AccountNotFound(String),
    #[error("Payment {0} not found")]
    PaymentNotFound(String),
    #[error(
        "Balance invariant violated on account {account}: available {available}, blocked {blocked}"
    )]
    BalanceInvariant {
        account: String,
        available: Decimal,
        blocked: Decimal,
    },
    #[error("Arithmetic overflow on {0}")]
    Overflow(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
