use crate::ports::PortError;
use tally_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElectionError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("no permission: {0}")]
    NoPermission(String),

    #[error("attempt failed: {0}")]
    AttemptFailed(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Port(#[from] PortError),
}
