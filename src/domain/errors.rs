use rust_decimal::Decimal;
use thiserror::Error;

/// Domain-level error type
#[derive(Error, Debug)]
pub enum DomainError {
    /// Request validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Amount is zero, negative, or otherwise unusable
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// No payment record matches the given reference
    #[error("Payment record not found: {0}")]
    PaymentRecordNotFound(String),

    /// Illegal state transition attempt
    #[error("Invalid payment state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    /// Gateway call failed; no local state was changed, safe to retry
    #[error("Gateway error: {0}")]
    GatewayError(String),

    /// Gateway refused or failed the refund; no local state was changed
    #[error("Refund failed: {0}")]
    RefundFailed(String),

    /// Wallet is locked against balance changes
    #[error("Wallet is locked: {reason}")]
    WalletLocked { reason: String },

    /// Wallet is deactivated and refuses debits
    #[error("Wallet is deactivated for customer {0}")]
    WalletInactive(String),

    /// Debit exceeds the current balance
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
