//! gmsaas error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GmsaasError {
    #[error("gmsaas not found at '{0}'. Please install: pip3 install gmsaas")]
    NotFound(String),

    #[error("gmsaas command failed: {0}")]
    CommandFailed(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GmsaasError>;
