use thiserror::Error;

/// Failure kinds at the ledger boundary. `Store` carries anything the
/// persistence layer threw (the caller may retry those at its own policy);
/// everything else is a definitive answer and must not be retried as-is.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not allowed: {0}")]
    Permission(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
