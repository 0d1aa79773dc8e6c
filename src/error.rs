use thiserror::Error;

/// Errors surfaced by the payout ledger and its collaborators.
///
/// `Validation`/`Conflict`/`NotFound` are caller-correctable and returned
/// synchronously from mutating operations. `Unauthorized`/`Unreachable` come
/// from the external platform probe. `Dispatch` errors are only ever carried
/// inside a dispatch outcome, never through the ledger call path.
#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("platform unreachable: {0}")]
    Unreachable(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("dispatch error: {0}")]
    Dispatch(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PayoutError>;
