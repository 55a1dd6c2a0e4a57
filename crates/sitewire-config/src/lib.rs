//! Environment configuration for sitewire.
//!
//! This crate handles:
//! - The closed set of deployment environments and their profiles
//! - Process-environment settings (account, region, source connection)

pub mod error;
pub mod profile;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use profile::{DeployEnv, EnvironmentProfile};
pub use settings::Settings;
