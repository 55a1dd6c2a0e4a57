//! Deployment environment profiles.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// The closed set of deployment environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployEnv {
    Prod,
    Stg,
    Dev,
}

impl DeployEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployEnv::Prod => "prod",
            DeployEnv::Stg => "stg",
            DeployEnv::Dev => "dev",
        }
    }
}

impl fmt::Display for DeployEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeployEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "prod" | "production" => Ok(DeployEnv::Prod),
            "stg" | "staging" => Ok(DeployEnv::Stg),
            "dev" => Ok(DeployEnv::Dev),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

// Single DNS label: letters, digits, inner hyphens.
static DNS_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").unwrap());

// Zone name: at least two dot-separated labels.
static DNS_ZONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+$").unwrap()
});

const SOURCE_OWNER: &str = "ducchung2444";
const SOURCE_REPO: &str = "aws-cicd-spa-cdk";
const APEX_ZONE: &str = "traveloke.io.vn";

/// Static parameters for one deployment environment: where the site's
/// source lives and what DNS name the site is served under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentProfile {
    pub env: DeployEnv,
    /// Source repository owner.
    pub owner: String,
    /// Source repository name.
    pub repo: String,
    /// Branch whose pushes trigger the pipeline.
    pub branch: String,
    /// DNS record name under the apex zone.
    pub record_name: String,
    /// Parent DNS zone the record is created in.
    pub apex_zone: String,
}

impl EnvironmentProfile {
    /// Resolve the profile for a deployment environment.
    ///
    /// The match is exhaustive over [`DeployEnv`]: adding an
    /// environment without a profile fails to compile instead of
    /// failing at lookup time.
    pub fn resolve(env: DeployEnv) -> Self {
        let (branch, record_name) = match env {
            DeployEnv::Prod => ("master", "fecicd"),
            DeployEnv::Stg => ("stg", "stg-spa-cicd"),
            DeployEnv::Dev => ("dev", "dev-spa-cicd"),
        };
        Self {
            env,
            owner: SOURCE_OWNER.to_string(),
            repo: SOURCE_REPO.to_string(),
            branch: branch.to_string(),
            record_name: record_name.to_string(),
            apex_zone: APEX_ZONE.to_string(),
        }
    }

    /// Fully-qualified site domain: `{record_name}.{apex_zone}`.
    pub fn full_domain(&self) -> String {
        format!("{}.{}", self.record_name, self.apex_zone)
    }

    /// Check profile invariants: non-empty source coordinates, a
    /// well-formed record label, and a well-formed apex zone.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("owner", &self.owner),
            ("repo", &self.repo),
            ("branch", &self.branch),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if !DNS_LABEL_REGEX.is_match(&self.record_name) {
            return Err(ConfigError::InvalidValue {
                field: "record_name".to_string(),
                message: format!("'{}' is not a valid DNS label", self.record_name),
            });
        }
        if !DNS_ZONE_REGEX.is_match(&self.apex_zone) {
            return Err(ConfigError::InvalidValue {
                field: "apex_zone".to_string(),
                message: format!("'{}' is not a valid DNS zone name", self.apex_zone),
            });
        }
        Ok(())
    }
}
