use pkg_source::{ClusterSource, SourceError};
use pkg_types::health::{Domain, ResourceRecord};
use pkg_types::report::DomainResult;

use crate::tally;

/// Nodes are cluster-scoped; the namespace filter never applies.
pub async fn collect(source: &dyn ClusterSource) -> Result<DomainResult, SourceError> {
    let nodes = source.nodes().await?;
    Ok(tally(Domain::Nodes, nodes.into_iter().map(ResourceRecord::Node)))
}
