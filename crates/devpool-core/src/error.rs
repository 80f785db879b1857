//! Device pool error types

use thiserror::Error;

/// Device pool errors
///
/// Errors raised by an [`InstanceSource`](crate::InstanceSource) or a
/// [`BusyRegistry`](crate::BusyRegistry) reach the caller of the lookup
/// service as-is. "No free instance" and "unknown id" are never errors.
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Registry error: {0}")]
    RegistryError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("Could not claim a free instance of recipe {0}: every candidate was taken concurrently")]
    ClaimConflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PoolError>;
