use pkg_source::{ClusterSource, SourceError};
use pkg_types::health::{Domain, ResourceRecord};
use pkg_types::report::DomainResult;
use tracing::debug;

use crate::namespace::NamespaceGate;
use crate::tally;

/// Collect deployments from namespaces the gate admits.
pub async fn collect(
    source: &dyn ClusterSource,
    scope: Option<&str>,
    gate: &NamespaceGate,
) -> Result<DomainResult, SourceError> {
    let deployments = source.deployments(scope).await?;
    let admitted = deployments.into_iter().filter(|d| {
        let admit = gate.admits(&d.namespace);
        if !admit {
            debug!("Skipping deployment {}/{}: namespace not active", d.namespace, d.name);
        }
        admit
    });
    Ok(tally(Domain::Deployments, admitted.map(ResourceRecord::Deployment)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_source::FixtureSource;

    const SNAPSHOT: &str = r#"
namespaces:
  - { name: prod, phase: Active }
  - { name: old, phase: Terminating }
deployments:
  - { namespace: prod, name: api, ready_replicas: 2, desired_replicas: 2, updated_replicas: 2, available_replicas: 2 }
  - { namespace: prod, name: web, ready_replicas: 1, desired_replicas: 2, updated_replicas: 2, available_replicas: 1 }
  - { namespace: old, name: legacy, ready_replicas: 0, desired_replicas: 1 }
"#;

    #[tokio::test]
    async fn test_collect_gated_deployments() {
        let source = FixtureSource::from_yaml(SNAPSHOT).unwrap();
        let (_, gate) = crate::namespace::collect(&source, None).await.unwrap();
        let result = collect(&source, None, &gate).await.unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.healthy, 1);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].id.to_string(), "prod/web");
        assert!(result.issues[0].reason.contains("1/2"));
    }

    #[tokio::test]
    async fn test_open_gate_admits_all() {
        let source = FixtureSource::from_yaml(SNAPSHOT).unwrap();
        let result = collect(&source, None, &NamespaceGate::Open).await.unwrap();
        assert_eq!(result.total, 3);
    }
}
