//! Logical resource identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A stable logical identifier for one resource within a topology.
///
/// Logical ids name the *declared* resource, not the materialized one.
/// The provisioning engine tracks physical resources by logical id
/// across repeated applies, so the same input must always yield the
/// same id: ids are fixed strings chosen by the topology builders,
/// never generated.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display("{_0}")]
pub struct LogicalId(String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogicalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
