//! Late-bound values threaded through the resource graph.

use serde::{Deserialize, Serialize};

use crate::LogicalId;

/// Attribute of a materialized resource, known only after the
/// provisioning engine has applied the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attr {
    /// Engine-assigned identifier (e.g. a distribution id).
    Id,
    /// Physical name (e.g. a bucket name).
    Name,
    /// Publicly routable domain name.
    DomainName,
    /// Hosted-zone identifier.
    ZoneId,
    /// Name servers assigned to a hosted zone.
    NameServers,
}

/// A value that is either known at synthesis time or late-bound to an
/// attribute of another resource in the same graph.
///
/// Late binding is how engine-returned identifiers flow into dependent
/// resources (grant conditions, build environment variables) and into
/// declared outputs without this core ever seeing the physical values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Literal text known when the plan is synthesized.
    Text(String),
    /// Reference to an attribute of a resource in the same graph.
    Attr { resource: LogicalId, attr: Attr },
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn attr(resource: &LogicalId, attr: Attr) -> Self {
        Value::Attr {
            resource: resource.clone(),
            attr,
        }
    }

    /// The resource this value references, if late-bound.
    pub fn reference(&self) -> Option<&LogicalId> {
        match self {
            Value::Text(_) => None,
            Value::Attr { resource, .. } => Some(resource),
        }
    }
}
