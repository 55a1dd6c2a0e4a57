//! Error types for sitewire.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate logical id: {0}")]
    Duplicate(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("cycle detected in resource dependencies: {0}")]
    CycleDetected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
