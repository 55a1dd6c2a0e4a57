//! Process-environment settings shared by every topology.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

pub const ACCOUNT_VAR: &str = "SITEWIRE_ACCOUNT";
pub const REGION_VAR: &str = "SITEWIRE_REGION";
pub const CONNECTION_ARN_VAR: &str = "SITEWIRE_CONNECTION_ARN";

/// Account/region context and the pre-authorized source-control
/// connection. Threaded explicitly through composition so topology
/// builders stay pure functions of their inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Target account identifier.
    pub account: String,
    /// Region the stacks are provisioned into.
    pub region: String,
    /// Authorization identifier of the source-control connection the
    /// pipeline's source stage consumes.
    pub connection_arn: String,
}

impl Settings {
    /// Read settings from the process environment. Missing variables
    /// become empty strings; [`Settings::validate`] rejects those
    /// before any plan is synthesized.
    pub fn from_env() -> Self {
        Self {
            account: std::env::var(ACCOUNT_VAR).unwrap_or_default(),
            region: std::env::var(REGION_VAR).unwrap_or_default(),
            connection_arn: std::env::var(CONNECTION_ARN_VAR).unwrap_or_default(),
        }
    }

    /// Reject empty values. An empty string is a configuration error,
    /// not a default with meaning.
    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_target()?;
        if self.connection_arn.is_empty() {
            return Err(ConfigError::MissingVariable(CONNECTION_ARN_VAR.to_string()));
        }
        Ok(())
    }

    /// Validate only the account/region pair, for topologies that do
    /// not consume the source connection.
    pub fn validate_target(&self) -> ConfigResult<()> {
        for (var, value) in [(ACCOUNT_VAR, &self.account), (REGION_VAR, &self.region)] {
            if value.is_empty() {
                return Err(ConfigError::MissingVariable(var.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Settings {
        Settings {
            account: "123456789012".to_string(),
            region: "ap-southeast-1".to_string(),
            connection_arn: "arn:aws:codeconnections:ap-southeast-1:123456789012:connection/test"
                .to_string(),
        }
    }

    #[test]
    fn test_complete_settings_validate() {
        complete().validate().unwrap();
    }

    #[test]
    fn test_empty_account_rejected() {
        let settings = Settings {
            account: String::new(),
            ..complete()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(ref var) if var == ACCOUNT_VAR));
    }

    #[test]
    fn test_empty_connection_rejected() {
        let settings = Settings {
            connection_arn: String::new(),
            ..complete()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(ref var) if var == CONNECTION_ARN_VAR));
    }
}
