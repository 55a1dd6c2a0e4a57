//! Typed resource descriptors.
//!
//! Each descriptor declares the desired state of one piece of
//! infrastructure. Descriptors never hold engine-assigned identifiers;
//! cross-resource wiring uses [`LogicalId`] references and late-bound
//! [`Value`]s, which double as implicit dependency edges.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{LogicalId, Value};

/// Region TLS certificates must be issued in for the CDN layer to
/// accept them, independent of where the rest of the stack lives.
pub const EDGE_CERTIFICATE_REGION: &str = "us-east-1";

/// Desired state of a single resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResourceKind {
    DnsZone(DnsZoneSpec),
    Certificate(CertificateSpec),
    AssetStore(AssetStoreSpec),
    Distribution(DistributionSpec),
    AccessGrant(AccessGrantSpec),
    AliasRecord(AliasRecordSpec),
    Pipeline(Box<PipelineSpec>),
    SiteArtifact(SiteArtifactSpec),
}

impl ResourceKind {
    /// Logical ids of the resources this descriptor references.
    ///
    /// A referenced resource must be declared in the same graph and
    /// materialized first; validation treats these as dependency edges.
    pub fn references(&self) -> Vec<&LogicalId> {
        match self {
            ResourceKind::DnsZone(_) | ResourceKind::AssetStore(_) => Vec::new(),
            ResourceKind::Certificate(cert) => match &cert.validation {
                CertificateValidation::Dns { zone } => vec![zone],
            },
            ResourceKind::Distribution(dist) => {
                let mut refs = vec![&dist.origin.store];
                if let Some(certificate) = &dist.certificate {
                    refs.push(certificate);
                }
                refs
            }
            ResourceKind::AccessGrant(grant) => {
                vec![&grant.store, &grant.source_distribution]
            }
            ResourceKind::AliasRecord(record) => vec![&record.zone, &record.target],
            ResourceKind::Pipeline(pipeline) => {
                let mut refs = vec![
                    &pipeline.build.permissions.read_write_store,
                    &pipeline.build.permissions.invalidate_distribution,
                ];
                refs.extend(
                    pipeline
                        .build
                        .env
                        .iter()
                        .filter_map(|var| var.value.reference()),
                );
                refs
            }
            ResourceKind::SiteArtifact(artifact) => {
                let mut refs = vec![&artifact.store];
                if let Some(distribution) = &artifact.invalidate {
                    refs.push(distribution);
                }
                refs
            }
        }
    }

    /// Short kind name for logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::DnsZone(_) => "dns-zone",
            ResourceKind::Certificate(_) => "certificate",
            ResourceKind::AssetStore(_) => "asset-store",
            ResourceKind::Distribution(_) => "distribution",
            ResourceKind::AccessGrant(_) => "access-grant",
            ResourceKind::AliasRecord(_) => "alias-record",
            ResourceKind::Pipeline(_) => "pipeline",
            ResourceKind::SiteArtifact(_) => "site-artifact",
        }
    }
}

/// Authoritative DNS zone for the apex domain.
///
/// The zone's assigned name servers are an output of materialization,
/// not an input: the domain registrar must be updated with them
/// out-of-band before delegation completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsZoneSpec {
    /// Apex zone name, e.g. `traveloke.io.vn`.
    pub zone_name: String,
}

/// TLS certificate bound to a fully-qualified domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSpec {
    pub domain_name: String,
    pub validation: CertificateValidation,
    /// Issuing region; always [`EDGE_CERTIFICATE_REGION`].
    pub region: String,
}

/// How certificate ownership is proven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateValidation {
    /// Validation records written into the referenced zone.
    Dns { zone: LogicalId },
}

/// Object storage holding built site artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStoreSpec {
    pub versioned: bool,
    pub encryption: Encryption,
    pub public_access: PublicAccess,
    pub enforce_tls: bool,
    pub object_ownership: ObjectOwnership,
    pub retention: Retention,
    /// Purge remaining objects when the store is torn down. Only
    /// meaningful with [`Retention::Destroy`].
    pub auto_purge: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encryption {
    /// Keys managed by the storage service.
    StoreManaged,
}

/// Public access is always fully blocked; the type admits nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicAccess {
    BlockAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectOwnership {
    /// Store owner owns every object; ACLs are disabled.
    OwnerEnforced,
}

/// What happens to a resource when its topology is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Retention {
    /// Keep the resource and its history after teardown.
    Retain,
    /// Delete the resource together with the topology.
    Destroy,
}

/// CDN edge distribution fronting an asset store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSpec {
    pub default_root_object: String,
    /// Custom domains served by this distribution; empty when it
    /// serves only through the CDN's default domain.
    pub domain_names: Vec<String>,
    pub certificate: Option<LogicalId>,
    pub origin: Origin,
    pub price_class: PriceClass,
    pub minimum_tls: TlsVersion,
    pub viewer_protocol: ViewerProtocol,
    pub cache_policy: CachePolicy,
    pub response_headers: ResponseHeadersPolicy,
    pub origin_requests: OriginRequestPolicy,
    pub error_responses: Vec<ErrorResponse>,
}

/// Store origin reachable only through scoped origin access control,
/// never through public bucket access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub store: LogicalId,
    /// Access levels granted to the distribution on the store.
    pub access: Vec<AccessLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessLevel {
    Read,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceClass {
    /// Cheapest edge-location tier.
    Class100,
    Class200,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TlsVersion {
    V1_2_2019,
    V1_2_2021,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerProtocol {
    RedirectToHttps,
    HttpsOnly,
    AllowAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachePolicy {
    CachingOptimized,
    CachingDisabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseHeadersPolicy {
    SecurityHeaders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginRequestPolicy {
    CorsStoreOrigin,
}

/// Remap of an origin error status to a page served with another
/// status, so client-side-routed paths never surface a raw storage
/// error to end users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub http_status: u16,
    pub response_status: u16,
    pub response_page: String,
    pub ttl: Duration,
}

/// Scoped permission allowing a CDN distribution to access a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrantSpec {
    pub store: LogicalId,
    pub principal: ServicePrincipal,
    pub action: GrantAction,
    /// The grant applies only to requests made on behalf of this
    /// distribution; never a wildcard.
    pub source_distribution: LogicalId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServicePrincipal {
    /// The CDN service identity.
    Cdn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantAction {
    /// Read objects under the store's key space.
    ReadObjects,
    /// List the store's contents.
    ListStore,
}

/// DNS record aliasing a name to a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecordSpec {
    pub zone: LogicalId,
    pub record_name: String,
    pub record_type: RecordType,
    /// Distribution the alias resolves to.
    pub target: LogicalId,
    /// Kept short so cutover during re-provisioning is fast.
    pub ttl: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    A,
    Aaaa,
}

/// Two-stage CI pipeline: source checkout, then build and deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub name: String,
    pub source: SourceStage,
    pub build: BuildStage,
    pub artifact_retention: Retention,
    pub cross_account: bool,
}

/// Source stage consuming a pre-authorized source-control connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStage {
    pub connection_arn: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

/// Build stage that compiles the site and pushes it to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStage {
    pub project_name: String,
    pub description: String,
    pub compute: ComputeSize,
    pub image: BuildImage,
    pub privileged: bool,
    /// Path to the external build specification consumed by the build
    /// executor; the build steps themselves are not modeled here.
    pub buildspec: String,
    /// Environment handed to the build job. The job's contract is two
    /// variables: target store name and target distribution id.
    pub env: Vec<EnvVar>,
    pub permissions: BuildPermissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputeSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildImage {
    AmazonLinux2023,
}

/// Named environment variable handed to the build job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: Value,
}

/// Least-privilege permission set for the build job: read/write on one
/// store and invalidation on one distribution, nothing broader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPermissions {
    pub read_write_store: LogicalId,
    pub invalidate_distribution: LogicalId,
}

/// One-shot content pushed directly into a store at provisioning time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteArtifactSpec {
    pub store: LogicalId,
    pub path: String,
    pub content: String,
    /// Distribution to invalidate when the artifact lands, so stale
    /// edge caches are never served after the push.
    pub invalidate: Option<LogicalId>,
    pub invalidation_paths: Vec<String>,
}
