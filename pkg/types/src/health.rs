use serde::{Deserialize, Serialize};

use crate::deployment::Deployment;
use crate::helm::HelmRelease;
use crate::kustomization::Kustomization;
use crate::namespace::Namespace;
use crate::node::Node;
use crate::pod::Pod;

// --- Domains ---

/// A resource category validated by a health check.
///
/// Variant order is the presentation order of the issue breakdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Namespaces,
    HelmReleases,
    Deployments,
    Pods,
    Ingress,
    Kustomizations,
    Nodes,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Namespaces,
        Domain::HelmReleases,
        Domain::Deployments,
        Domain::Pods,
        Domain::Ingress,
        Domain::Kustomizations,
        Domain::Nodes,
    ];

    /// Human-readable label used in summary rows and section headers.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::Namespaces => "Namespaces",
            Domain::HelmReleases => "Helm Releases",
            Domain::Deployments => "Deployments",
            Domain::Pods => "Pods",
            Domain::Ingress => "Ingress URLs",
            Domain::Kustomizations => "Kustomizations",
            Domain::Nodes => "Nodes",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// --- Verdicts ---

/// Three-way health classification, ordered by severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Healthy,
    Degraded,
    Failed,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Healthy => write!(f, "Healthy"),
            Verdict::Degraded => write!(f, "Degraded"),
            Verdict::Failed => write!(f, "Failed"),
        }
    }
}

/// Classification of one resource, with a reason for anything not healthy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum HealthVerdict {
    Healthy,
    Degraded(String),
    Failed(String),
}

impl HealthVerdict {
    pub fn verdict(&self) -> Verdict {
        match self {
            HealthVerdict::Healthy => Verdict::Healthy,
            HealthVerdict::Degraded(_) => Verdict::Degraded,
            HealthVerdict::Failed(_) => Verdict::Failed,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            HealthVerdict::Healthy => None,
            HealthVerdict::Degraded(reason) | HealthVerdict::Failed(reason) => Some(reason),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthVerdict::Healthy)
    }
}

// --- Resource identity ---

/// Identity of an observed resource: `(domain, namespace, name)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub domain: Domain,
    /// `None` for cluster-scoped resources
    #[serde(default)]
    pub namespace: Option<String>,
    pub name: String,
}

impl ResourceId {
    pub fn namespaced(domain: Domain, namespace: &str, name: &str) -> Self {
        Self {
            domain,
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
        }
    }

    pub fn cluster(domain: Domain, name: &str) -> Self {
        Self {
            domain,
            namespace: None,
            name: name.to_string(),
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

// --- Records ---

/// A domain-tagged resource as retrieved from the cluster.
///
/// Ingress objects are not listed here: they are not classified directly but
/// expanded into endpoint candidates and probed.
#[derive(Debug, Clone)]
pub enum ResourceRecord {
    Namespace(Namespace),
    HelmRelease(HelmRelease),
    Deployment(Deployment),
    Pod(Pod),
    Kustomization(Kustomization),
    Node(Node),
}

impl ResourceRecord {
    pub fn domain(&self) -> Domain {
        match self {
            ResourceRecord::Namespace(_) => Domain::Namespaces,
            ResourceRecord::HelmRelease(_) => Domain::HelmReleases,
            ResourceRecord::Deployment(_) => Domain::Deployments,
            ResourceRecord::Pod(_) => Domain::Pods,
            ResourceRecord::Kustomization(_) => Domain::Kustomizations,
            ResourceRecord::Node(_) => Domain::Nodes,
        }
    }

    pub fn id(&self) -> ResourceId {
        let domain = self.domain();
        match self {
            ResourceRecord::Namespace(ns) => ResourceId::cluster(domain, &ns.name),
            ResourceRecord::HelmRelease(r) => ResourceId::namespaced(domain, &r.namespace, &r.name),
            ResourceRecord::Deployment(d) => ResourceId::namespaced(domain, &d.namespace, &d.name),
            ResourceRecord::Pod(p) => ResourceId::namespaced(domain, &p.namespace, &p.name),
            ResourceRecord::Kustomization(k) => {
                ResourceId::namespaced(domain, &k.namespace, &k.name)
            }
            ResourceRecord::Node(n) => ResourceId::cluster(domain, &n.name),
        }
    }
}
