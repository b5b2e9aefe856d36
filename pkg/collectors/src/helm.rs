use pkg_source::{ClusterSource, SourceError};
use pkg_types::health::{Domain, ResourceRecord};
use pkg_types::report::DomainResult;

use crate::tally;

pub async fn collect(
    source: &dyn ClusterSource,
    scope: Option<&str>,
) -> Result<DomainResult, SourceError> {
    let releases = source.helm_releases(scope).await?;
    Ok(tally(
        Domain::HelmReleases,
        releases.into_iter().map(ResourceRecord::HelmRelease),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_source::FixtureSource;

    #[tokio::test]
    async fn test_collect_releases() {
        let source = FixtureSource::from_yaml(
            r#"
helm_releases:
  - { namespace: monitoring, name: kube-prometheus, status: deployed }
  - { namespace: prod, name: api, status: pending-upgrade }
  - { namespace: prod, name: worker, status: superseded }
"#,
        )
        .unwrap();
        let result = collect(&source, None).await.unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(result.healthy, 1);
        assert_eq!(result.status_label(), "FAILED");
        assert_eq!(result.issues[0].id.to_string(), "prod/api");
    }
}
