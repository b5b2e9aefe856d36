use pkg_constants::network::DEFAULT_ENDPOINT_PATH;
use pkg_types::endpoint::{EndpointCandidate, EndpointResult, ServiceRole};
use pkg_types::ingress::Ingress;
use pkg_types::report::DiscoveredEndpoints;
use tracing::debug;

/// Expand ingress rules into probe candidates.
///
/// One candidate per path of every rule that names a host; a rule without
/// paths yields `/`. Order follows the input and duplicates are kept.
pub fn extract_candidates(ingresses: &[Ingress]) -> Vec<EndpointCandidate> {
    let mut candidates = Vec::new();
    for ingress in ingresses {
        for rule in &ingress.rules {
            let host = match rule.host.as_deref() {
                Some(h) if !h.is_empty() => h,
                _ => continue,
            };
            let make = |path: &str| EndpointCandidate {
                namespace: ingress.namespace.clone(),
                ingress_name: ingress.name.clone(),
                host: host.to_string(),
                path: if path.is_empty() {
                    DEFAULT_ENDPOINT_PATH.to_string()
                } else {
                    path.to_string()
                },
            };
            if rule.paths.is_empty() {
                candidates.push(make(DEFAULT_ENDPOINT_PATH));
            } else {
                candidates.extend(rule.paths.iter().map(|p| make(&p.path)));
            }
        }
    }
    candidates
}

/// Role a hostname matched, and whether it is the preferred source for that role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RoleMatch {
    role: ServiceRole,
    preferred: bool,
}

/// Map a hostname to a platform service role.
///
/// Rules are checked in order and the first hit decides. `thanos-sc.` is a
/// fallback for `thanos-sidecar.` and never displaces it.
fn match_role(host: &str) -> Option<RoleMatch> {
    let matched = |role, preferred| Some(RoleMatch { role, preferred });
    if host.contains("prometheus.") && !host.contains("alertmanager") {
        matched(ServiceRole::Prometheus, true)
    } else if host.contains("alertmanager.") {
        matched(ServiceRole::Alertmanager, true)
    } else if host.contains("grafana.") {
        matched(ServiceRole::Grafana, true)
    } else if host.contains("dashboard.") {
        matched(ServiceRole::Dashboard, true)
    } else if host.contains("thanos-sidecar.") {
        matched(ServiceRole::Thanos, true)
    } else if host.contains("thanos-sc.") {
        matched(ServiceRole::Thanos, false)
    } else if host.contains("kiali.") {
        matched(ServiceRole::Kiali, true)
    } else {
        None
    }
}

/// Assign healthy endpoints to service roles, first match per role in discovery order.
///
/// Must run after every probe has completed so the result does not depend on
/// probe completion order.
pub fn assign_roles(results: &[EndpointResult]) -> DiscoveredEndpoints {
    let mut discovered = DiscoveredEndpoints::new();
    let mut fallback_roles: Vec<ServiceRole> = Vec::new();

    for result in results.iter().filter(|r| r.is_healthy()) {
        let Some(m) = match_role(&result.host) else {
            continue;
        };
        let taken = discovered.contains(m.role);
        let upgrade = taken && m.preferred && fallback_roles.contains(&m.role);
        if taken && !upgrade {
            continue;
        }
        debug!("Endpoint {} assigned to {}", result.url, m.role);
        discovered.insert(m.role, &result.url);
        if m.preferred {
            fallback_roles.retain(|r| *r != m.role);
        } else {
            fallback_roles.push(m.role);
        }
    }
    discovered
}
