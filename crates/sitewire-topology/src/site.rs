//! Pieces shared by both hosting topologies.

use std::time::Duration;

use sitewire_core::resource::{
    AccessGrantSpec, ErrorResponse, GrantAction, ResourceKind, ServicePrincipal,
};
use sitewire_core::{LogicalId, ResourceGraph};

use crate::Result;

/// Default document served at the distribution root and used as the
/// SPA fallback page.
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// TTL for SPA error remaps and alias records. Kept short so stale
/// edge state clears quickly during cutover.
pub const SHORT_TTL: Duration = Duration::from_secs(60);

/// SPA fallback: 403 and 404 from the origin both serve the default
/// document with a 200 so client-side routing can handle the path.
pub fn spa_error_responses() -> Vec<ErrorResponse> {
    [403, 404]
        .into_iter()
        .map(|status| ErrorResponse {
            http_status: status,
            response_status: 200,
            response_page: format!("/{DEFAULT_DOCUMENT}"),
            ttl: SHORT_TTL,
        })
        .collect()
}

/// Grant the CDN service read and list on the store, conditioned on
/// the exact distribution. Issued only after the distribution exists,
/// since the condition value is the distribution's identifier.
pub fn add_cdn_access_grants(
    graph: &mut ResourceGraph,
    store: &LogicalId,
    distribution: &LogicalId,
) -> Result<()> {
    graph.add_dependent(
        "cdn-read-grant",
        ResourceKind::AccessGrant(AccessGrantSpec {
            store: store.clone(),
            principal: ServicePrincipal::Cdn,
            action: GrantAction::ReadObjects,
            source_distribution: distribution.clone(),
        }),
        &[distribution],
    )?;
    graph.add_dependent(
        "cdn-list-grant",
        ResourceKind::AccessGrant(AccessGrantSpec {
            store: store.clone(),
            principal: ServicePrincipal::Cdn,
            action: GrantAction::ListStore,
            source_distribution: distribution.clone(),
        }),
        &[distribution],
    )?;
    Ok(())
}
