use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use pkg_constants::health::{ENDPOINT_NOT_FOUND, VAULT_PLACEHOLDER};

use crate::cluster::ClusterIdentity;
use crate::endpoint::{EndpointResult, ServiceRole};
use crate::health::{Domain, HealthVerdict, ResourceId, Verdict};

// --- Issues ---

/// A non-healthy resource as it appears in the issue breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub id: ResourceId,
    pub severity: Verdict,
    pub reason: String,
}

// --- Domain results ---

/// Whether the records of a domain could be retrieved at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Collected,
    Unavailable(String),
}

/// Counters and issues produced by one collector.
///
/// `healthy + issues.len() == total` always holds. A domain that could not be
/// retrieved has no counts and no issues; its outage lives in `availability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResult {
    pub domain: Domain,
    pub total: usize,
    pub healthy: usize,
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub availability: Availability,
}

impl DomainResult {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            total: 0,
            healthy: 0,
            issues: Vec::new(),
            availability: Availability::Collected,
        }
    }

    /// A domain whose retrieval failed.
    pub fn unavailable(domain: Domain, reason: &str) -> Self {
        Self {
            availability: Availability::Unavailable(reason.to_string()),
            ..Self::new(domain)
        }
    }

    /// Count one classified resource.
    pub fn record(&mut self, id: ResourceId, verdict: &HealthVerdict) {
        self.total += 1;
        match verdict {
            HealthVerdict::Healthy => self.healthy += 1,
            HealthVerdict::Degraded(reason) | HealthVerdict::Failed(reason) => {
                self.issues.push(Issue {
                    id,
                    severity: verdict.verdict(),
                    reason: reason.clone(),
                });
            }
        }
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn count(&self, severity: Verdict) -> usize {
        match severity {
            Verdict::Healthy => self.healthy,
            _ => self.issues.iter().filter(|i| i.severity == severity).count(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.availability == Availability::Collected
    }

    /// Why retrieval failed, if it did.
    pub fn outage(&self) -> Option<&str> {
        match &self.availability {
            Availability::Collected => None,
            Availability::Unavailable(reason) => Some(reason),
        }
    }

    /// Label of the summary-table status column.
    pub fn status_label(&self) -> &'static str {
        if !self.is_available() {
            "UNKNOWN"
        } else if self.issues.is_empty() {
            "HEALTHY"
        } else if self.count(Verdict::Failed) > 0 {
            "FAILED"
        } else {
            "DEGRADED"
        }
    }
}

/// Pod counters. `running + pending + failed == total`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodCounts {
    /// Healthy pods, including completed jobs
    pub running: usize,
    /// Degraded pods: pending, transitional, or not all containers ready
    pub pending: usize,
    pub failed: usize,
    pub total: usize,
}

impl From<&DomainResult> for PodCounts {
    fn from(result: &DomainResult) -> Self {
        Self {
            running: result.healthy,
            pending: result.count(Verdict::Degraded),
            failed: result.count(Verdict::Failed),
            total: result.total,
        }
    }
}

// --- Discovered endpoints ---

/// How a service role is shown in the endpoint block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointStatus<'a> {
    Found(&'a str),
    NotFound,
    ToBeConfigured,
}

impl std::fmt::Display for EndpointStatus<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointStatus::Found(url) => write!(f, "{}", url),
            EndpointStatus::NotFound => write!(f, "{}", ENDPOINT_NOT_FOUND),
            EndpointStatus::ToBeConfigured => write!(f, "{}", VAULT_PLACEHOLDER),
        }
    }
}

/// Service role → URL of the healthy endpoint assigned to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DiscoveredEndpoints(BTreeMap<ServiceRole, String>);

impl DiscoveredEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: ServiceRole) -> Option<&str> {
        self.0.get(&role).map(String::as_str)
    }

    pub fn contains(&self, role: ServiceRole) -> bool {
        self.0.contains_key(&role)
    }

    /// Assign `url` to `role`, replacing any previous assignment.
    pub fn insert(&mut self, role: ServiceRole, url: &str) {
        if role != ServiceRole::Vault {
            self.0.insert(role, url.to_string());
        }
    }

    pub fn status(&self, role: ServiceRole) -> EndpointStatus<'_> {
        match (role, self.get(role)) {
            (ServiceRole::Vault, _) => EndpointStatus::ToBeConfigured,
            (_, Some(url)) => EndpointStatus::Found(url),
            (_, None) => EndpointStatus::NotFound,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// --- Report ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "issues", rename_all = "snake_case")]
pub enum OverallVerdict {
    AllHealthy,
    IssuesFound(usize),
}

/// Consolidated result of one assessment run. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    pub identity: ClusterIdentity,
    pub generated_at: DateTime<Utc>,
    /// One result per domain, in [`Domain`] order
    pub domain_results: Vec<DomainResult>,
    pub pods: PodCounts,
    /// Every probed endpoint, in discovery order
    pub endpoints: Vec<EndpointResult>,
    pub discovered: DiscoveredEndpoints,
    /// Domains that could not be retrieved. Each one counts toward `total_issues`.
    #[serde(default)]
    pub unavailable: Vec<Domain>,
    /// Resource issues plus unavailable domains
    pub total_issues: usize,
    pub verdict: OverallVerdict,
}

impl ClusterReport {
    pub fn domain(&self, domain: Domain) -> Option<&DomainResult> {
        self.domain_results.iter().find(|r| r.domain == domain)
    }

    pub fn is_healthy(&self) -> bool {
        self.verdict == OverallVerdict::AllHealthy
    }
}
