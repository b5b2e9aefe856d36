use pkg_source::{ClusterSource, SourceError};
use pkg_types::health::{Domain, ResourceRecord};
use pkg_types::report::DomainResult;
use tracing::debug;

use crate::namespace::NamespaceGate;
use crate::tally;

/// Collect pods from namespaces the gate admits.
pub async fn collect(
    source: &dyn ClusterSource,
    scope: Option<&str>,
    gate: &NamespaceGate,
) -> Result<DomainResult, SourceError> {
    let pods = source.pods(scope).await?;
    let admitted = pods.into_iter().filter(|p| {
        let admit = gate.admits(&p.namespace);
        if !admit {
            debug!("Skipping pod {}/{}: namespace not active", p.namespace, p.name);
        }
        admit
    });
    Ok(tally(Domain::Pods, admitted.map(ResourceRecord::Pod)))
}
