use pkg_source::{ClusterSource, SourceError};
use pkg_types::health::{Domain, ResourceRecord};
use pkg_types::namespace::Namespace;
use pkg_types::report::DomainResult;
use std::collections::HashSet;

use crate::tally;

/// Which namespaces namespaced records may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceGate {
    /// The namespace listing was unavailable; admit everything.
    Open,
    /// Only these namespaces are Active.
    Active(HashSet<String>),
}

impl NamespaceGate {
    pub fn from_namespaces(namespaces: &[Namespace]) -> Self {
        NamespaceGate::Active(
            namespaces
                .iter()
                .filter(|ns| ns.phase.is_active())
                .map(|ns| ns.name.clone())
                .collect(),
        )
    }

    pub fn admits(&self, namespace: &str) -> bool {
        match self {
            NamespaceGate::Open => true,
            NamespaceGate::Active(active) => active.contains(namespace),
        }
    }
}

/// Collect namespaces and derive the gate for deployments and pods.
pub async fn collect(
    source: &dyn ClusterSource,
    scope: Option<&str>,
) -> Result<(DomainResult, NamespaceGate), SourceError> {
    let namespaces = source.namespaces(scope).await?;
    let gate = NamespaceGate::from_namespaces(&namespaces);
    let result = tally(
        Domain::Namespaces,
        namespaces.into_iter().map(ResourceRecord::Namespace),
    );
    Ok((result, gate))
}
