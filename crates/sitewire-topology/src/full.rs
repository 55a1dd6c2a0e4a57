//! Full hosted-site topology: DNS zone, TLS certificate, asset store,
//! CDN distribution, scoped access grants, alias records, and the
//! two-stage CI pipeline.

use tracing::debug;

use sitewire_config::{EnvironmentProfile, Settings};
use sitewire_core::resource::{
    AccessLevel, AliasRecordSpec, AssetStoreSpec, BuildImage, BuildPermissions, BuildStage,
    CachePolicy, CertificateSpec, CertificateValidation, ComputeSize, DistributionSpec,
    DnsZoneSpec, EDGE_CERTIFICATE_REGION, Encryption, EnvVar, ObjectOwnership, Origin,
    OriginRequestPolicy, PipelineSpec, PriceClass, PublicAccess, RecordType, ResourceKind,
    ResponseHeadersPolicy, Retention, SourceStage, TlsVersion, ViewerProtocol,
};
use sitewire_core::{Attr, ResourceGraph, TargetEnv, Value};

use crate::Result;
use crate::site::{DEFAULT_DOCUMENT, SHORT_TTL, add_cdn_access_grants, spa_error_responses};

/// Plan name for the full pipeline topology.
pub const PLAN_NAME: &str = "frontend-cicd-pipeline";

/// External build specification consumed by the build executor.
const BUILDSPEC_PATH: &str = "assets/build-spec/frontend.yml";

/// Build the end-to-end hosted-site graph for one environment.
///
/// Each resource only references ids declared earlier in this
/// function, which is what makes the creation partial order hold by
/// construction; [`ResourceGraph::validate`] re-checks it before the
/// graph is returned.
pub fn build(profile: &EnvironmentProfile, settings: &Settings) -> Result<ResourceGraph> {
    profile.validate()?;
    settings.validate()?;

    let full_domain = profile.full_domain();
    debug!(env = %profile.env, domain = %full_domain, "assembling full pipeline topology");

    let mut graph = ResourceGraph::new(
        PLAN_NAME,
        TargetEnv {
            account: settings.account.clone(),
            region: settings.region.clone(),
        },
    );

    // The zone comes first: the certificate validates against it, and
    // its assigned name servers are surfaced as an output because the
    // registrar must be updated out-of-band.
    let zone = graph.add(
        "hosted-zone",
        ResourceKind::DnsZone(DnsZoneSpec {
            zone_name: profile.apex_zone.clone(),
        }),
    )?;

    let certificate = graph.add(
        "site-certificate",
        ResourceKind::Certificate(CertificateSpec {
            domain_name: full_domain.clone(),
            validation: CertificateValidation::Dns { zone: zone.clone() },
            region: EDGE_CERTIFICATE_REGION.to_string(),
        }),
    )?;

    // Built-asset history must survive accidental stack deletion.
    let store = graph.add(
        "assets-bucket",
        ResourceKind::AssetStore(AssetStoreSpec {
            versioned: true,
            encryption: Encryption::StoreManaged,
            public_access: PublicAccess::BlockAll,
            enforce_tls: true,
            object_ownership: ObjectOwnership::OwnerEnforced,
            retention: Retention::Retain,
            auto_purge: false,
        }),
    )?;

    let distribution = graph.add(
        "distribution",
        ResourceKind::Distribution(DistributionSpec {
            default_root_object: DEFAULT_DOCUMENT.to_string(),
            domain_names: vec![full_domain.clone()],
            certificate: Some(certificate.clone()),
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
            error_responses: spa_error_responses(),
        }),
    )?;

    add_cdn_access_grants(&mut graph, &store, &distribution)?;

    for (id, record_type) in [("alias-a", RecordType::A), ("alias-aaaa", RecordType::Aaaa)] {
        graph.add(
            id,
            ResourceKind::AliasRecord(AliasRecordSpec {
                zone: zone.clone(),
                record_name: profile.record_name.clone(),
                record_type,
                target: distribution.clone(),
                ttl: SHORT_TTL,
            }),
        )?;
    }

    let pipeline_name = format!("fe-cicd-{}", profile.record_name);
    graph.add(
        "pipeline",
        ResourceKind::Pipeline(Box::new(PipelineSpec {
            name: pipeline_name.clone(),
            source: SourceStage {
                connection_arn: settings.connection_arn.clone(),
                owner: profile.owner.clone(),
                repo: profile.repo.clone(),
                branch: profile.branch.clone(),
            },
            build: BuildStage {
                project_name: pipeline_name,
                description: "Build the site, sync to the asset store, invalidate the CDN"
                    .to_string(),
                compute: ComputeSize::Small,
                image: BuildImage::AmazonLinux2023,
                privileged: false,
                buildspec: BUILDSPEC_PATH.to_string(),
                env: vec![
                    EnvVar {
                        name: "BUCKET_NAME".to_string(),
                        value: Value::attr(&store, Attr::Name),
                    },
                    EnvVar {
                        name: "DISTRIBUTION_ID".to_string(),
                        value: Value::attr(&distribution, Attr::Id),
                    },
                ],
                permissions: BuildPermissions {
                    read_write_store: store.clone(),
                    invalidate_distribution: distribution.clone(),
                },
            },
            artifact_retention: Retention::Destroy,
            cross_account: false,
        })),
    )?;

    graph.output("bucket_name", Value::attr(&store, Attr::Name));
    graph.output(
        "cloudfront_domain",
        Value::attr(&distribution, Attr::DomainName),
    );
    graph.output("distribution_id", Value::attr(&distribution, Attr::Id));
    graph.output("hosted_zone_id", Value::attr(&zone, Attr::ZoneId));
    graph.output_with_description(
        "hosted_zone_name_servers",
        Value::attr(&zone, Attr::NameServers),
        "Update these name servers at the domain registrar to delegate DNS to the hosted zone.",
    );
    graph.output("site_url", Value::text(format!("https://{full_domain}")));

    graph.validate()?;
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TopologyError;
    use sitewire_config::{ConfigError, DeployEnv};
    use sitewire_core::LogicalId;
    use sitewire_core::resource::{AccessGrantSpec, GrantAction};
    use std::time::Duration;

    fn settings() -> Settings {
        Settings {
            account: "123456789012".to_string(),
            region: "ap-southeast-1".to_string(),
            connection_arn: "arn:aws:codeconnections:ap-southeast-1:123456789012:connection/test"
                .to_string(),
        }
    }

    fn prod_graph() -> ResourceGraph {
        build(&EnvironmentProfile::resolve(DeployEnv::Prod), &settings()).unwrap()
    }

    fn grants(graph: &ResourceGraph) -> Vec<&AccessGrantSpec> {
        graph
            .resources()
            .iter()
            .filter_map(|resource| match &resource.kind {
                ResourceKind::AccessGrant(grant) => Some(grant),
                _ => None,
            })
            .collect()
    }

    fn count(graph: &ResourceGraph, label: &str) -> usize {
        graph
            .resources()
            .iter()
            .filter(|resource| resource.kind.label() == label)
            .count()
    }

    #[test]
    fn test_full_domain_flows_into_certificate_and_distribution() {
        let graph = prod_graph();

        let certificate = match &graph.get(&LogicalId::new("site-certificate")).unwrap().kind {
            ResourceKind::Certificate(certificate) => certificate.clone(),
            other => panic!("unexpected kind {}", other.label()),
        };
        assert_eq!(certificate.domain_name, "fecicd.traveloke.io.vn");

        let distribution = match &graph.get(&LogicalId::new("distribution")).unwrap().kind {
            ResourceKind::Distribution(distribution) => distribution.clone(),
            other => panic!("unexpected kind {}", other.label()),
        };
        assert_eq!(distribution.domain_names, vec!["fecicd.traveloke.io.vn"]);
        assert_eq!(
            distribution.certificate,
            Some(LogicalId::new("site-certificate"))
        );
    }

    #[test]
    fn test_certificate_pinned_to_edge_region() {
        // The stack itself deploys elsewhere; the certificate may not.
        let graph = prod_graph();
        assert_eq!(graph.env().region, "ap-southeast-1");

        match &graph.get(&LogicalId::new("site-certificate")).unwrap().kind {
            ResourceKind::Certificate(certificate) => {
                assert_eq!(certificate.region, EDGE_CERTIFICATE_REGION);
            }
            other => panic!("unexpected kind {}", other.label()),
        }
    }

    #[test]
    fn test_store_retained_on_teardown() {
        let graph = prod_graph();
        match &graph.get(&LogicalId::new("assets-bucket")).unwrap().kind {
            ResourceKind::AssetStore(store) => {
                assert_eq!(store.retention, Retention::Retain);
                assert!(!store.auto_purge);
                assert!(store.versioned);
            }
            other => panic!("unexpected kind {}", other.label()),
        }
    }

    #[test]
    fn test_grants_conditioned_on_this_distribution() {
        let graph = prod_graph();
        let grants = grants(&graph);
        assert_eq!(grants.len(), 2);

        let distribution = LogicalId::new("distribution");
        for grant in &grants {
            assert_eq!(grant.source_distribution, distribution);
            assert_eq!(grant.store, LogicalId::new("assets-bucket"));
        }
        assert!(
            grants
                .iter()
                .any(|grant| grant.action == GrantAction::ReadObjects)
        );
        assert!(
            grants
                .iter()
                .any(|grant| grant.action == GrantAction::ListStore)
        );
    }

    #[test]
    fn test_spa_error_remapping() {
        let graph = prod_graph();
        let distribution = match &graph.get(&LogicalId::new("distribution")).unwrap().kind {
            ResourceKind::Distribution(distribution) => distribution.clone(),
            other => panic!("unexpected kind {}", other.label()),
        };

        assert_eq!(distribution.error_responses.len(), 2);
        for status in [403, 404] {
            let remap = distribution
                .error_responses
                .iter()
                .find(|remap| remap.http_status == status)
                .unwrap();
            assert_eq!(remap.response_status, 200);
            assert_eq!(remap.response_page, "/index.html");
            assert!(remap.ttl <= Duration::from_secs(60));
        }
    }

    #[test]
    fn test_two_alias_records_point_at_distribution() {
        let graph = prod_graph();
        let mut types = Vec::new();
        for resource in graph.resources() {
            if let ResourceKind::AliasRecord(record) = &resource.kind {
                assert_eq!(record.zone, LogicalId::new("hosted-zone"));
                assert_eq!(record.record_name, "fecicd");
                assert_eq!(record.target, LogicalId::new("distribution"));
                assert!(record.ttl <= Duration::from_secs(60));
                types.push(record.record_type);
            }
        }
        types.sort_by_key(|record_type| format!("{record_type:?}"));
        assert_eq!(types, vec![RecordType::A, RecordType::Aaaa]);
    }

    #[test]
    fn test_build_env_references_current_store_and_distribution() {
        let graph = prod_graph();
        let pipeline = match &graph.get(&LogicalId::new("pipeline")).unwrap().kind {
            ResourceKind::Pipeline(pipeline) => pipeline.clone(),
            other => panic!("unexpected kind {}", other.label()),
        };

        assert_eq!(pipeline.build.env.len(), 2);
        assert_eq!(
            pipeline.build.env[0],
            EnvVar {
                name: "BUCKET_NAME".to_string(),
                value: Value::attr(&LogicalId::new("assets-bucket"), Attr::Name),
            }
        );
        assert_eq!(
            pipeline.build.env[1],
            EnvVar {
                name: "DISTRIBUTION_ID".to_string(),
                value: Value::attr(&LogicalId::new("distribution"), Attr::Id),
            }
        );
    }

    #[test]
    fn test_pipeline_source_and_permissions() {
        let graph = prod_graph();
        let pipeline = match &graph.get(&LogicalId::new("pipeline")).unwrap().kind {
            ResourceKind::Pipeline(pipeline) => pipeline.clone(),
            other => panic!("unexpected kind {}", other.label()),
        };

        assert_eq!(pipeline.source.owner, "ducchung2444");
        assert_eq!(pipeline.source.repo, "aws-cicd-spa-cdk");
        assert_eq!(pipeline.source.branch, "master");
        assert_eq!(pipeline.source.connection_arn, settings().connection_arn);

        assert_eq!(
            pipeline.build.permissions.read_write_store,
            LogicalId::new("assets-bucket")
        );
        assert_eq!(
            pipeline.build.permissions.invalidate_distribution,
            LogicalId::new("distribution")
        );
        assert_eq!(pipeline.artifact_retention, Retention::Destroy);
        assert!(!pipeline.cross_account);
    }

    #[test]
    fn test_production_scenario_resource_counts() {
        let graph = prod_graph();
        assert_eq!(count(&graph, "dns-zone"), 1);
        assert_eq!(count(&graph, "certificate"), 1);
        assert_eq!(count(&graph, "alias-record"), 2);
        assert_eq!(count(&graph, "pipeline"), 1);
        assert_eq!(count(&graph, "site-artifact"), 0);

        let site_url = graph
            .outputs()
            .iter()
            .find(|output| output.name == "site_url")
            .unwrap();
        assert_eq!(
            site_url.value,
            Value::text("https://fecicd.traveloke.io.vn")
        );
    }

    #[test]
    fn test_name_server_output_carries_registrar_instruction() {
        let graph = prod_graph();
        let output = graph
            .outputs()
            .iter()
            .find(|output| output.name == "hosted_zone_name_servers")
            .unwrap();
        assert_eq!(
            output.value,
            Value::attr(&LogicalId::new("hosted-zone"), Attr::NameServers)
        );
        assert!(output.description.as_deref().unwrap().contains("registrar"));
    }

    #[test]
    fn test_plan_generation_is_idempotent() {
        let profile = EnvironmentProfile::resolve(DeployEnv::Prod);
        let first = build(&profile, &settings()).unwrap();
        let second = build(&profile, &settings()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_connection_is_a_config_error() {
        let incomplete = Settings {
            connection_arn: String::new(),
            ..settings()
        };
        let result = build(&EnvironmentProfile::resolve(DeployEnv::Prod), &incomplete);
        assert!(matches!(
            result.unwrap_err(),
            TopologyError::Config(ConfigError::MissingVariable(_))
        ));
    }

    #[test]
    fn test_staging_profile_changes_wiring() {
        let graph = build(&EnvironmentProfile::resolve(DeployEnv::Stg), &settings()).unwrap();
        match &graph.get(&LogicalId::new("site-certificate")).unwrap().kind {
            ResourceKind::Certificate(certificate) => {
                assert_eq!(certificate.domain_name, "stg-spa-cicd.traveloke.io.vn");
            }
            other => panic!("unexpected kind {}", other.label()),
        }
        match &graph.get(&LogicalId::new("pipeline")).unwrap().kind {
            ResourceKind::Pipeline(pipeline) => {
                assert_eq!(pipeline.source.branch, "stg");
                assert_eq!(pipeline.name, "fe-cicd-stg-spa-cicd");
            }
            other => panic!("unexpected kind {}", other.label()),
        }
    }
}
