use serde::{Deserialize, Serialize};

use pkg_constants::network::{DEFAULT_ENDPOINT_PATH, DEFAULT_ENDPOINT_SCHEME};

/// A `(host, path)` pair taken from an ingress rule, not yet probed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointCandidate {
    pub namespace: String,
    pub ingress_name: String,
    pub host: String,
    pub path: String,
}

impl EndpointCandidate {
    /// URL to probe. Endpoints are always addressed over HTTPS.
    pub fn url(&self) -> String {
        let path = if self.path.is_empty() {
            DEFAULT_ENDPOINT_PATH
        } else {
            self.path.as_str()
        };
        if path.starts_with('/') {
            format!("{}://{}{}", DEFAULT_ENDPOINT_SCHEME, self.host, path)
        } else {
            format!("{}://{}/{}", DEFAULT_ENDPOINT_SCHEME, self.host, path)
        }
    }
}

/// Outcome of the two-stage liveness check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProbeVerdict {
    Healthy,
    DnsFailed,
    HttpFailed,
}

impl std::fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeVerdict::Healthy => write!(f, "Healthy"),
            ProbeVerdict::DnsFailed => write!(f, "DNS failed"),
            ProbeVerdict::HttpFailed => write!(f, "HTTP failed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointResult {
    pub url: String,
    pub host: String,
    /// Namespace of the ingress the URL came from, empty for a standalone URL
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub ingress_name: String,
    pub verdict: ProbeVerdict,
    /// Set only when an HTTP response was received
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl EndpointResult {
    pub fn is_healthy(&self) -> bool {
        self.verdict == ProbeVerdict::Healthy
    }
}

/// Well-known platform service an endpoint can be mapped to.
///
/// Variant order is the display order in the report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    Prometheus,
    Alertmanager,
    Grafana,
    Dashboard,
    Thanos,
    Kiali,
    /// Never discovered, always rendered as a placeholder.
    Vault,
}

impl ServiceRole {
    pub const ALL: [ServiceRole; 7] = [
        ServiceRole::Prometheus,
        ServiceRole::Alertmanager,
        ServiceRole::Grafana,
        ServiceRole::Dashboard,
        ServiceRole::Thanos,
        ServiceRole::Kiali,
        ServiceRole::Vault,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ServiceRole::Prometheus => "Prometheus",
            ServiceRole::Alertmanager => "Alertmanager",
            ServiceRole::Grafana => "Grafana",
            ServiceRole::Dashboard => "Dashboard",
            ServiceRole::Thanos => "Thanos",
            ServiceRole::Kiali => "Kiali",
            ServiceRole::Vault => "Vault",
        }
    }
}

impl std::fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candidate(host: &str, path: &str) -> EndpointCandidate {
        EndpointCandidate {
            namespace: "monitoring".to_string(),
            ingress_name: "grafana".to_string(),
            host: host.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_url_uses_https() {
        assert_eq!(
            make_candidate("grafana.example.com", "/").url(),
            "https://grafana.example.com/"
        );
        assert_eq!(
            make_candidate("grafana.example.com", "/api/health").url(),
            "https://grafana.example.com/api/health"
        );
    }

    #[test]
    fn test_url_normalizes_path() {
        assert_eq!(make_candidate("a.example.com", "").url(), "https://a.example.com/");
        assert_eq!(make_candidate("a.example.com", "ui").url(), "https://a.example.com/ui");
    }
}
