//! Topology construction errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("configuration error: {0}")]
    Config(#[from] sitewire_config::ConfigError),

    #[error("graph error: {0}")]
    Graph(#[from] sitewire_core::Error),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
