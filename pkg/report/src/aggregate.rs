use chrono::{DateTime, Utc};
use pkg_probe::assign_roles;
use pkg_types::cluster::ClusterIdentity;
use pkg_types::endpoint::{EndpointResult, ProbeVerdict};
use pkg_types::health::{Domain, HealthVerdict, ResourceId};
use pkg_types::report::{ClusterReport, DomainResult, Issue, OverallVerdict, PodCounts};
use serde::Serialize;

/// Rows of the summary table, in order.
pub const SUMMARY_DOMAINS: [Domain; 5] = [
    Domain::Namespaces,
    Domain::HelmReleases,
    Domain::Deployments,
    Domain::Ingress,
    Domain::Kustomizations,
];

/// Merge per-domain results and probe outcomes into one report.
pub fn aggregate(
    domain_results: Vec<DomainResult>,
    endpoints: Vec<EndpointResult>,
    identity: ClusterIdentity,
) -> ClusterReport {
    aggregate_at(domain_results, endpoints, identity, Utc::now())
}

/// [`aggregate`] with an explicit timestamp.
pub fn aggregate_at(
    mut domain_results: Vec<DomainResult>,
    endpoints: Vec<EndpointResult>,
    identity: ClusterIdentity,
    generated_at: DateTime<Utc>,
) -> ClusterReport {
    if !domain_results.iter().any(|r| r.domain == Domain::Ingress) {
        domain_results.push(ingress_result(&endpoints));
    }
    domain_results.sort_by_key(|r| r.domain);

    let pods = domain_results
        .iter()
        .find(|r| r.domain == Domain::Pods)
        .map(PodCounts::from)
        .unwrap_or_default();
    let unavailable: Vec<Domain> = domain_results
        .iter()
        .filter(|r| !r.is_available())
        .map(|r| r.domain)
        .collect();
    let total_issues: usize = domain_results
        .iter()
        .map(DomainResult::issue_count)
        .sum::<usize>()
        + unavailable.len();
    let verdict = if total_issues == 0 {
        OverallVerdict::AllHealthy
    } else {
        OverallVerdict::IssuesFound(total_issues)
    };
    // Role assignment needs the complete, discovery-ordered probe list.
    let discovered = assign_roles(&endpoints);

    ClusterReport {
        identity,
        generated_at,
        domain_results,
        pods,
        endpoints,
        discovered,
        unavailable,
        total_issues,
        verdict,
    }
}

/// Health verdict of one probed endpoint.
pub fn endpoint_verdict(result: &EndpointResult) -> HealthVerdict {
    match (result.verdict, result.status_code) {
        (ProbeVerdict::Healthy, _) => HealthVerdict::Healthy,
        (ProbeVerdict::DnsFailed, _) => HealthVerdict::Failed("DNS resolution failed".to_string()),
        (ProbeVerdict::HttpFailed, Some(code)) => {
            HealthVerdict::Failed(format!("unexpected HTTP status {}", code))
        }
        (ProbeVerdict::HttpFailed, None) => {
            HealthVerdict::Failed("HTTP request failed".to_string())
        }
    }
}

/// Ingress domain result built from probe outcomes alone.
///
/// Issues are keyed by the owning ingress, with the URL in the reason. A
/// standalone URL is keyed by itself.
pub fn ingress_result(endpoints: &[EndpointResult]) -> DomainResult {
    let mut result = DomainResult::new(Domain::Ingress);
    for endpoint in endpoints {
        let verdict = endpoint_verdict(endpoint);
        if endpoint.namespace.is_empty() {
            result.record(ResourceId::cluster(Domain::Ingress, &endpoint.url), &verdict);
            continue;
        }
        let verdict = match verdict {
            HealthVerdict::Failed(reason) => {
                HealthVerdict::Failed(format!("{} ({})", reason, endpoint.url))
            }
            other => other,
        };
        result.record(
            ResourceId::namespaced(Domain::Ingress, &endpoint.namespace, &endpoint.ingress_name),
            &verdict,
        );
    }
    result
}

/// Unavailable domains with the retrieval error, in [`Domain`] order.
pub fn outages(report: &ClusterReport) -> Vec<(Domain, &str)> {
    report
        .domain_results
        .iter()
        .filter_map(|r| r.outage().map(|reason| (r.domain, reason)))
        .collect()
}

// --- Presentation views ---

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub domain: Domain,
    pub status: &'static str,
    pub healthy: usize,
    pub total: usize,
    pub issues: usize,
}

/// The five fixed summary rows. A domain missing from the report shows as empty and healthy.
pub fn summary_rows(report: &ClusterReport) -> Vec<SummaryRow> {
    SUMMARY_DOMAINS
        .iter()
        .map(|domain| match report.domain(*domain) {
            Some(result) => SummaryRow {
                domain: *domain,
                status: result.status_label(),
                healthy: result.healthy,
                total: result.total,
                issues: result.issue_count(),
            },
            None => SummaryRow {
                domain: *domain,
                status: DomainResult::new(*domain).status_label(),
                healthy: 0,
                total: 0,
                issues: 0,
            },
        })
        .collect()
}

/// Issues of one domain, most severe first.
#[derive(Debug, Clone)]
pub struct IssueSection<'a> {
    pub domain: Domain,
    pub issues: Vec<&'a Issue>,
}

/// Issue breakdown in presentation order, skipping domains without issues.
pub fn breakdown(report: &ClusterReport) -> Vec<IssueSection<'_>> {
    let mut sections: Vec<IssueSection<'_>> = report
        .domain_results
        .iter()
        .filter(|r| !r.issues.is_empty())
        .map(|r| {
            let mut issues: Vec<&Issue> = r.issues.iter().collect();
            // Stable: equal severities keep discovery order.
            issues.sort_by(|a, b| b.severity.cmp(&a.severity));
            IssueSection {
                domain: r.domain,
                issues,
            }
        })
        .collect();
    sections.sort_by_key(|s| s.domain);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::endpoint::ServiceRole;
    use pkg_types::health::Verdict;
    use pkg_types::report::EndpointStatus;

    fn make_result(domain: Domain, verdicts: &[HealthVerdict]) -> DomainResult {
        let mut result = DomainResult::new(domain);
        for (i, verdict) in verdicts.iter().enumerate() {
            result.record(
                ResourceId::namespaced(domain, "prod", &format!("r{}", i)),
                verdict,
            );
        }
        result
    }

    fn make_endpoint(host: &str, verdict: ProbeVerdict, code: Option<u16>) -> EndpointResult {
        EndpointResult {
            url: format!("https://{}/", host),
            host: host.to_string(),
            namespace: "monitoring".to_string(),
            ingress_name: host.split('.').next().unwrap_or(host).to_string(),
            verdict,
            status_code: code,
        }
    }

    fn degraded(reason: &str) -> HealthVerdict {
        HealthVerdict::Degraded(reason.to_string())
    }

    fn failed(reason: &str) -> HealthVerdict {
        HealthVerdict::Failed(reason.to_string())
    }

    #[test]
    fn test_all_healthy() {
        let report = aggregate(
            vec![
                make_result(Domain::Namespaces, &[HealthVerdict::Healthy]),
                make_result(Domain::Deployments, &[HealthVerdict::Healthy]),
            ],
            vec![make_endpoint("grafana.example.com", ProbeVerdict::Healthy, Some(200))],
            ClusterIdentity::default(),
        );
        assert_eq!(report.total_issues, 0);
        assert_eq!(report.verdict, OverallVerdict::AllHealthy);
        assert!(report.is_healthy());
    }

    #[test]
    fn test_issues_are_summed_across_domains() {
        let report = aggregate(
            vec![
                make_result(Domain::Namespaces, &[degraded("Terminating")]),
                make_result(Domain::HelmReleases, &[failed("failed"), HealthVerdict::Healthy]),
                make_result(Domain::Pods, &[degraded("Pending"), failed("Error")]),
            ],
            vec![
                make_endpoint("a.example.com", ProbeVerdict::DnsFailed, None),
                make_endpoint("b.example.com", ProbeVerdict::Healthy, Some(404)),
            ],
            ClusterIdentity::default(),
        );
        assert_eq!(report.total_issues, 5);
        assert_eq!(report.verdict, OverallVerdict::IssuesFound(5));

        let ingress = report.domain(Domain::Ingress).unwrap();
        assert_eq!((ingress.healthy, ingress.total), (1, 2));
        assert_eq!(ingress.issues[0].id.to_string(), "monitoring/a");
        assert_eq!(ingress.issues[0].reason, "DNS resolution failed (https://a.example.com/)");
    }

    #[test]
    fn test_ingress_issues_name_the_ingress() {
        let mut standalone = make_endpoint("c.example.com", ProbeVerdict::HttpFailed, Some(700));
        standalone.namespace.clear();
        standalone.ingress_name.clear();
        let endpoints = vec![
            make_endpoint("grafana.example.com", ProbeVerdict::DnsFailed, None),
            make_endpoint("grafana.example.com", ProbeVerdict::HttpFailed, None),
            standalone,
        ];

        let result = ingress_result(&endpoints);
        let ids: Vec<String> = result.issues.iter().map(|i| i.id.to_string()).collect();
        assert_eq!(
            ids,
            vec!["monitoring/grafana", "monitoring/grafana", "https://c.example.com/"]
        );
        assert_eq!(result.issues[2].reason, "unexpected HTTP status 700");
    }

    #[test]
    fn test_verdict_matches_issue_count() {
        let cases = vec![
            vec![],
            vec![make_result(Domain::Nodes, &[HealthVerdict::Healthy])],
            vec![make_result(Domain::Nodes, &[failed("NotReady")])],
            vec![DomainResult::unavailable(Domain::Pods, "timeout")],
        ];
        for results in cases {
            let report = aggregate(results, vec![], ClusterIdentity::default());
            assert_eq!(report.total_issues == 0, report.verdict == OverallVerdict::AllHealthy);
        }
    }

    #[test]
    fn test_unavailable_domain_flips_verdict_without_issues() {
        let report = aggregate(
            vec![
                make_result(Domain::Deployments, &[HealthVerdict::Healthy]),
                DomainResult::unavailable(Domain::Pods, "timed out"),
            ],
            vec![],
            ClusterIdentity::default(),
        );
        assert_eq!(report.unavailable, vec![Domain::Pods]);
        assert_eq!(report.total_issues, 1);
        assert_eq!(report.verdict, OverallVerdict::IssuesFound(1));
        assert_eq!(outages(&report), vec![(Domain::Pods, "timed out")]);

        // Counters stay consistent for the missing domain.
        for result in &report.domain_results {
            assert_eq!(result.healthy + result.issue_count(), result.total);
        }
        assert_eq!(report.pods, PodCounts::default());
        assert!(breakdown(&report).is_empty());
    }

    #[test]
    fn test_pod_counts() {
        let report = aggregate(
            vec![make_result(
                Domain::Pods,
                &[HealthVerdict::Healthy, HealthVerdict::Healthy, degraded("Pending"), failed("Evicted")],
            )],
            vec![],
            ClusterIdentity::default(),
        );
        assert_eq!(
            report.pods,
            PodCounts {
                running: 2,
                pending: 1,
                failed: 1,
                total: 4
            }
        );
    }

    #[test]
    fn test_summary_rows_are_fixed() {
        let report = aggregate(
            vec![
                make_result(Domain::Deployments, &[HealthVerdict::Healthy, degraded("not ready")]),
                DomainResult::unavailable(Domain::Kustomizations, "crd missing"),
            ],
            vec![],
            ClusterIdentity::default(),
        );
        let rows = summary_rows(&report);
        let labels: Vec<&str> = rows.iter().map(|r| r.domain.label()).collect();
        assert_eq!(
            labels,
            vec!["Namespaces", "Helm Releases", "Deployments", "Ingress URLs", "Kustomizations"]
        );
        assert_eq!(rows[0].status, "HEALTHY");
        assert_eq!((rows[2].status, rows[2].healthy, rows[2].total, rows[2].issues), ("DEGRADED", 1, 2, 1));
        assert_eq!(rows[4].status, "UNKNOWN");
    }

    #[test]
    fn test_breakdown_order_and_severity() {
        let report = aggregate(
            vec![
                make_result(Domain::Kustomizations, &[failed("build failed")]),
                make_result(Domain::HelmReleases, &[degraded("superseded"), failed("failed")]),
                make_result(Domain::Namespaces, &[HealthVerdict::Healthy]),
            ],
            vec![],
            ClusterIdentity::default(),
        );
        let sections = breakdown(&report);
        let domains: Vec<Domain> = sections.iter().map(|s| s.domain).collect();
        assert_eq!(domains, vec![Domain::HelmReleases, Domain::Kustomizations]);
        assert_eq!(sections[0].issues[0].severity, Verdict::Failed);
        assert_eq!(sections[0].issues[1].severity, Verdict::Degraded);
    }

    #[test]
    fn test_roles_from_healthy_endpoints() {
        let report = aggregate(
            vec![],
            vec![
                make_endpoint("prometheus.example.com", ProbeVerdict::Healthy, Some(200)),
                make_endpoint("grafana.example.com", ProbeVerdict::HttpFailed, None),
            ],
            ClusterIdentity::default(),
        );
        assert_eq!(
            report.discovered.status(ServiceRole::Prometheus),
            EndpointStatus::Found("https://prometheus.example.com/")
        );
        assert_eq!(report.discovered.status(ServiceRole::Grafana), EndpointStatus::NotFound);
        assert_eq!(report.discovered.status(ServiceRole::Vault), EndpointStatus::ToBeConfigured);
    }

    #[test]
    fn test_empty_run_reports_nothing_found() {
        let report = aggregate(vec![], vec![], ClusterIdentity::default());
        for role in ServiceRole::ALL {
            let expected = if role == ServiceRole::Vault {
                EndpointStatus::ToBeConfigured
            } else {
                EndpointStatus::NotFound
            };
            assert_eq!(report.discovered.status(role), expected);
        }
        assert!(breakdown(&report).is_empty());
    }
}
