//! Minimal static-hosting topology for quick validation: asset store,
//! CDN distribution, scoped access grants, and a placeholder document.
//! No DNS, no certificate, no pipeline.

use tracing::debug;

use sitewire_config::Settings;
use sitewire_core::resource::{
    AccessLevel, AssetStoreSpec, CachePolicy, DistributionSpec, Encryption, ObjectOwnership,
    Origin, OriginRequestPolicy, PriceClass, PublicAccess, ResourceKind, ResponseHeadersPolicy,
    Retention, SiteArtifactSpec, TlsVersion, ViewerProtocol,
};
use sitewire_core::{Attr, ResourceGraph, TargetEnv, Value};

use crate::Result;
use crate::site::{DEFAULT_DOCUMENT, add_cdn_access_grants, spa_error_responses};

/// Plan name for the simple hosting topology.
pub const PLAN_NAME: &str = "frontend-simple";

/// Placeholder page pushed at provisioning time so the distribution
/// serves something immediately.
const PLACEHOLDER_INDEX: &str = r#"<!doctype html>
<meta charset="utf-8">
<title>SPA test</title>
<style>html,body{height:100%;margin:0;font:16px/1.4 system-ui}main{display:grid;place-items:center;height:100%}</style>
<main>
  <div>
    <h1>It works</h1>
    <p>Served from the asset store through the CDN.</p>
  </div>
</main>
"#;

/// Build the disposable hosting graph: store, distribution behind the
/// CDN's default domain, grants, and one placeholder document.
pub fn build(settings: &Settings) -> Result<ResourceGraph> {
    settings.validate_target()?;

    debug!("assembling simple hosting topology");

    let mut graph = ResourceGraph::new(
        PLAN_NAME,
        TargetEnv {
            account: settings.account.clone(),
            region: settings.region.clone(),
        },
    );

    // Disposable: the store goes away with the topology, leftover
    // objects included.
    let store = graph.add(
        "spa-bucket",
        ResourceKind::AssetStore(AssetStoreSpec {
            versioned: true,
            encryption: Encryption::StoreManaged,
            public_access: PublicAccess::BlockAll,
            enforce_tls: true,
            object_ownership: ObjectOwnership::OwnerEnforced,
            retention: Retention::Destroy,
            auto_purge: true,
        }),
    )?;

    let distribution = graph.add(
        "distribution",
        ResourceKind::Distribution(DistributionSpec {
            default_root_object: DEFAULT_DOCUMENT.to_string(),
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
            error_responses: spa_error_responses(),
        }),
    )?;

    add_cdn_access_grants(&mut graph, &store, &distribution)?;

    // The push and the full-path invalidation are one operation, so a
    // stale cached 404 is never served after the placeholder lands.
    graph.add_dependent(
        "placeholder-index",
        ResourceKind::SiteArtifact(SiteArtifactSpec {
            store: store.clone(),
            path: DEFAULT_DOCUMENT.to_string(),
            content: PLACEHOLDER_INDEX.to_string(),
            invalidate: Some(distribution.clone()),
            invalidation_paths: vec!["/*".to_string()],
        }),
        &[&distribution],
    )?;

    graph.output("bucket_name", Value::attr(&store, Attr::Name));
    graph.output(
        "cloudfront_domain",
        Value::attr(&distribution, Attr::DomainName),
    );
    graph.output("distribution_id", Value::attr(&distribution, Attr::Id));

    graph.validate()?;
    Ok(graph)
}
