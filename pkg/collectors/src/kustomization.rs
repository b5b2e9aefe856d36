use pkg_source::{ClusterSource, SourceError};
use pkg_types::health::{Domain, ResourceRecord};
use pkg_types::report::DomainResult;

use crate::tally;

pub async fn collect(
    source: &dyn ClusterSource,
    scope: Option<&str>,
) -> Result<DomainResult, SourceError> {
    let kustomizations = source.kustomizations(scope).await?;
    Ok(tally(
        Domain::Kustomizations,
        kustomizations.into_iter().map(ResourceRecord::Kustomization),
    ))
}
