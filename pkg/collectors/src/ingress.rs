use pkg_probe::{EndpointProbe, extract_candidates};
use pkg_report::aggregate::ingress_result;
use pkg_source::{ClusterSource, SourceError};
use pkg_types::endpoint::EndpointResult;
use pkg_types::report::DomainResult;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Discover endpoints from ingress rules and probe each of them.
///
/// Returns the ingress domain result together with every probe outcome, in
/// discovery order, for role assignment.
pub async fn collect(
    source: &dyn ClusterSource,
    scope: Option<&str>,
    probe: &EndpointProbe,
    concurrency: usize,
    cancel: &CancellationToken,
) -> Result<(DomainResult, Vec<EndpointResult>), SourceError> {
    let ingresses = source.ingresses(scope).await?;
    let candidates = extract_candidates(&ingresses);
    info!(
        "Probing {} endpoints from {} ingresses (concurrency={})",
        candidates.len(),
        ingresses.len(),
        concurrency
    );
    let endpoints = probe.probe_all(&candidates, concurrency, cancel).await;
    Ok((ingress_result(&endpoints), endpoints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_source::FixtureSource;
    use pkg_types::endpoint::ProbeVerdict;
    use std::time::Duration;

    fn make_probe() -> EndpointProbe {
        EndpointProbe::new(Duration::from_secs(2), false).unwrap()
    }

    #[tokio::test]
    async fn test_no_ingresses_no_probes() {
        let source = FixtureSource::default();
        let (result, endpoints) = collect(&source, None, &make_probe(), 4, &CancellationToken::new())
            .await
            .unwrap();
        assert!(endpoints.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.status_label(), "HEALTHY");
    }

    #[tokio::test]
    async fn test_unresolvable_hosts_are_issues() {
        let source = FixtureSource::from_yaml(
            r#"
ingresses:
  - namespace: monitoring
    name: grafana
    rules:
      - host: grafana.kcheck.invalid
        paths: [{ path: /login }]
      - paths: [{ path: / }]
"#,
        )
        .unwrap();
        let (result, endpoints) = collect(&source, None, &make_probe(), 4, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].url, "https://grafana.kcheck.invalid/login");
        assert_eq!(endpoints[0].verdict, ProbeVerdict::DnsFailed);
        assert_eq!(endpoints[0].status_code, None);
        assert_eq!(result.total, 1);
        assert_eq!(endpoints[0].ingress_name, "grafana");
        assert_eq!(result.issues[0].id.to_string(), "monitoring/grafana");
        assert_eq!(
            result.issues[0].reason,
            "DNS resolution failed (https://grafana.kcheck.invalid/login)"
        );
    }
}
