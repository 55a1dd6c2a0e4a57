//! Resource graph arena.
//!
//! A [`ResourceGraph`] is the unit handed to the provisioning engine:
//! an ordered arena of resource descriptors keyed by stable logical id,
//! explicit dependency edges, and the outputs the engine must surface
//! to the operator after apply. The engine topologically sorts the
//! edges and may apply unrelated resources in parallel.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::resource::ResourceKind;
use crate::value::Value;
use crate::{Error, LogicalId, Result};

/// Account and region a topology is provisioned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEnv {
    pub account: String,
    pub region: String,
}

/// A declared resource: its stable id, desired state, and the
/// resources that must exist before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: LogicalId,
    pub kind: ResourceKind,
    /// Explicit ordering edges beyond what `kind` already references.
    pub depends_on: Vec<LogicalId>,
}

impl Resource {
    /// All outgoing dependency edges: explicit ones plus every logical
    /// id the descriptor references.
    pub fn edges(&self) -> Vec<&LogicalId> {
        let mut edges: Vec<&LogicalId> = self.depends_on.iter().collect();
        edges.extend(self.kind.references());
        edges
    }
}

/// Output surfaced to the operator once the engine applies the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub value: Value,
    pub description: Option<String>,
}

/// Declarative resource graph for one topology instance.
///
/// Builders only reference ids they have already inserted, so a valid
/// graph is correct by construction; [`ResourceGraph::validate`]
/// double-checks before the plan leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGraph {
    name: String,
    env: TargetEnv,
    resources: Vec<Resource>,
    outputs: Vec<Output>,
}

impl ResourceGraph {
    pub fn new(name: impl Into<String>, env: TargetEnv) -> Self {
        Self {
            name: name.into(),
            env,
            resources: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &TargetEnv {
        &self.env
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn get(&self, id: &LogicalId) -> Option<&Resource> {
        self.resources.iter().find(|resource| &resource.id == id)
    }

    /// Declare a resource. Fails if the logical id is already taken.
    pub fn add(&mut self, id: &str, kind: ResourceKind) -> Result<LogicalId> {
        self.add_dependent(id, kind, &[])
    }

    /// Declare a resource with explicit ordering edges in addition to
    /// whatever the descriptor itself references.
    pub fn add_dependent(
        &mut self,
        id: &str,
        kind: ResourceKind,
        deps: &[&LogicalId],
    ) -> Result<LogicalId> {
        let id = LogicalId::new(id);
        if self.get(&id).is_some() {
            return Err(Error::Duplicate(id.to_string()));
        }
        self.resources.push(Resource {
            id: id.clone(),
            kind,
            depends_on: deps.iter().map(|dep| (*dep).clone()).collect(),
        });
        Ok(id)
    }

    /// Declare an output.
    pub fn output(&mut self, name: &str, value: Value) {
        self.outputs.push(Output {
            name: name.to_string(),
            value,
            description: None,
        });
    }

    /// Declare an output with an operator-facing description. Used for
    /// results that require a manual follow-up step.
    pub fn output_with_description(&mut self, name: &str, value: Value, description: &str) {
        self.outputs.push(Output {
            name: name.to_string(),
            value,
            description: Some(description.to_string()),
        });
    }

    /// Check that every reference resolves to a declared resource and
    /// that the dependency edges are acyclic.
    pub fn validate(&self) -> Result<()> {
        let ids: HashSet<&LogicalId> = self.resources.iter().map(|resource| &resource.id).collect();

        for resource in &self.resources {
            for dep in resource.edges() {
                if !ids.contains(dep) {
                    return Err(Error::InvalidReference(format!(
                        "{} '{}' references unknown resource '{}'",
                        resource.kind.label(),
                        resource.id,
                        dep
                    )));
                }
            }
        }

        for output in &self.outputs {
            if let Some(target) = output.value.reference() {
                if !ids.contains(target) {
                    return Err(Error::InvalidReference(format!(
                        "output '{}' references unknown resource '{}'",
                        output.name, target
                    )));
                }
            }
        }

        if let Err(cycle) = self.detect_cycle() {
            return Err(Error::CycleDetected(cycle));
        }
        Ok(())
    }

    /// Detect cycles in the dependency edges using DFS.
    fn detect_cycle(&self) -> std::result::Result<(), String> {
        let resource_map: HashMap<&LogicalId, &Resource> = self
            .resources
            .iter()
            .map(|resource| (&resource.id, resource))
            .collect();

        let mut visited = HashMap::new();
        let mut rec_stack = HashMap::new();

        for resource in &self.resources {
            if !visited.contains_key(&resource.id) {
                if let Some(cycle) =
                    Self::dfs_detect_cycle(&resource.id, &resource_map, &mut visited, &mut rec_stack)
                {
                    return Err(cycle);
                }
            }
        }
        Ok(())
    }

    fn dfs_detect_cycle<'a>(
        node: &'a LogicalId,
        resource_map: &HashMap<&'a LogicalId, &'a Resource>,
        visited: &mut HashMap<&'a LogicalId, bool>,
        rec_stack: &mut HashMap<&'a LogicalId, bool>,
    ) -> Option<String> {
        visited.insert(node, true);
        rec_stack.insert(node, true);

        if let Some(resource) = resource_map.get(node) {
            for dep in resource.edges() {
                if !visited.contains_key(dep) {
                    if let Some(cycle) =
                        Self::dfs_detect_cycle(dep, resource_map, visited, rec_stack)
                    {
                        return Some(cycle);
                    }
                } else if rec_stack.get(dep).copied().unwrap_or(false) {
                    return Some(format!("{} -> {}", node, dep));
                }
            }
        }

        rec_stack.insert(node, false);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{AliasRecordSpec, DnsZoneSpec, DistributionSpec, RecordType};
    use crate::resource::{
        AccessLevel, CachePolicy, Origin, OriginRequestPolicy, PriceClass, ResponseHeadersPolicy,
        TlsVersion, ViewerProtocol,
    };
    use crate::{Attr, Value};
    use std::time::Duration;

    fn target_env() -> TargetEnv {
        TargetEnv {
            account: "123456789012".to_string(),
            region: "ap-southeast-1".to_string(),
        }
    }

    fn zone_kind() -> ResourceKind {
        ResourceKind::DnsZone(DnsZoneSpec {
            zone_name: "example.test".to_string(),
        })
    }

    #[test]
    fn test_duplicate_logical_id_rejected() {
        let mut graph = ResourceGraph::new("test", target_env());
        graph.add("zone", zone_kind()).unwrap();
        let result = graph.add("zone", zone_kind());
        assert!(matches!(result.unwrap_err(), Error::Duplicate(_)));
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let mut graph = ResourceGraph::new("test", target_env());
        let zone = graph.add("zone", zone_kind()).unwrap();
        graph
            .add(
                "alias",
                ResourceKind::AliasRecord(AliasRecordSpec {
                    zone: zone.clone(),
                    record_name: "www".to_string(),
                    record_type: RecordType::A,
                    target: LogicalId::new("missing-distribution"),
                    ttl: Duration::from_secs(60),
                }),
            )
            .unwrap();

        let result = graph.validate();
        assert!(matches!(result.unwrap_err(), Error::InvalidReference(_)));
    }

    #[test]
    fn test_unknown_output_reference_rejected() {
        let mut graph = ResourceGraph::new("test", target_env());
        graph.add("zone", zone_kind()).unwrap();
        graph.output(
            "zone_id",
            Value::attr(&LogicalId::new("other-zone"), Attr::ZoneId),
        );

        let result = graph.validate();
        assert!(matches!(result.unwrap_err(), Error::InvalidReference(_)));
    }

    #[test]
    fn test_explicit_dependency_cycle_detected() {
        let mut graph = ResourceGraph::new("test", target_env());
        let b_id = LogicalId::new("zone-b");
        let a = graph
            .add_dependent("zone-a", zone_kind(), &[&b_id])
            .unwrap();
        graph.add_dependent("zone-b", zone_kind(), &[&a]).unwrap();

        let result = graph.validate();
        assert!(matches!(result.unwrap_err(), Error::CycleDetected(_)));
    }

    #[test]
    fn test_valid_graph_passes_validation() {
        let mut graph = ResourceGraph::new("test", target_env());
        let zone = graph.add("zone", zone_kind()).unwrap();
        let store = graph
            .add(
                "store",
                ResourceKind::AssetStore(crate::resource::AssetStoreSpec {
                    versioned: true,
                    encryption: crate::resource::Encryption::StoreManaged,
                    public_access: crate::resource::PublicAccess::BlockAll,
                    enforce_tls: true,
                    object_ownership: crate::resource::ObjectOwnership::OwnerEnforced,
                    retention: crate::resource::Retention::Retain,
                    auto_purge: false,
                }),
            )
            .unwrap();
        let distribution = graph
            .add(
                "distribution",
                ResourceKind::Distribution(DistributionSpec {
                    default_root_object: "index.html".to_string(),
                    domain_names: Vec::new(),
                    certificate: None,
                    origin: Origin {
                        store: store.clone(),
                        access: vec![AccessLevel::Read, AccessLevel::List],
                    },
                    price_class: PriceClass::Class100,
                    minimum_tls: TlsVersion::V1_2_2021,
                    viewer_protocol: ViewerProtocol::RedirectToHttps,
                    cache_policy: CachePolicy::CachingOptimized,
                    response_headers: ResponseHeadersPolicy::SecurityHeaders,
                    origin_requests: OriginRequestPolicy::CorsStoreOrigin,
                    error_responses: Vec::new(),
                }),
            )
            .unwrap();
        graph
            .add(
                "alias",
                ResourceKind::AliasRecord(AliasRecordSpec {
                    zone: zone.clone(),
                    record_name: "www".to_string(),
                    record_type: RecordType::A,
                    target: distribution.clone(),
                    ttl: Duration::from_secs(60),
                }),
            )
            .unwrap();
        graph.output("zone_id", Value::attr(&zone, Attr::ZoneId));

        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_plan_json_round_trip() {
        let mut graph = ResourceGraph::new("round-trip", target_env());
        let zone = graph.add("zone", zone_kind()).unwrap();
        graph.output("zone_id", Value::attr(&zone, Attr::ZoneId));

        let json = serde_json::to_string(&graph).unwrap();
        let restored: ResourceGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(graph, restored);
    }
}
