use async_trait::async_trait;
use pkg_types::cluster::ClusterIdentity;
use pkg_types::deployment::Deployment;
use pkg_types::health::Domain;
use pkg_types::helm::HelmRelease;
use pkg_types::ingress::Ingress;
use pkg_types::kustomization::Kustomization;
use pkg_types::namespace::Namespace;
use pkg_types::node::Node;
use pkg_types::pod::Pod;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::{ClusterSource, SourceError};

/// A captured cluster snapshot.
///
/// Example `fixture.yaml`:
/// ```yaml
/// cluster:
///   name: prod-eu
///   context: prod-eu-admin
///   version: v1.30.4
/// namespaces:
///   - { name: prod, phase: Active }
/// deployments:
///   - { namespace: prod, name: api, ready_replicas: 2, desired_replicas: 2, available_replicas: 2 }
/// unavailable: [helm_releases]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub cluster: ClusterIdentity,
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    #[serde(default, alias = "helm-releases")]
    pub helm_releases: Vec<HelmRelease>,
    #[serde(default)]
    pub deployments: Vec<Deployment>,
    #[serde(default)]
    pub pods: Vec<Pod>,
    #[serde(default)]
    pub ingresses: Vec<Ingress>,
    #[serde(default)]
    pub kustomizations: Vec<Kustomization>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Domains whose retrieval should fail
    #[serde(default)]
    pub unavailable: Vec<Domain>,
}

/// Serves records from an in-memory [`Fixture`].
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    fixture: Fixture,
}

impl FixtureSource {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture }
    }

    pub fn from_yaml(content: &str) -> Result<Self, SourceError> {
        let fixture = serde_yaml::from_str(content).map_err(|e| SourceError::Fixture {
            path: "<inline>".to_string(),
            source: e,
        })?;
        Ok(Self::new(fixture))
    }

    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        info!("Loading cluster fixture from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let fixture = serde_yaml::from_str(&content).map_err(|e| SourceError::Fixture {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::new(fixture))
    }

    fn check(&self, domain: Domain) -> Result<(), SourceError> {
        if self.fixture.unavailable.contains(&domain) {
            return Err(SourceError::Unavailable(domain));
        }
        Ok(())
    }

    fn scoped<T: Clone>(
        &self,
        domain: Domain,
        items: &[T],
        scope: Option<&str>,
        namespace_of: impl Fn(&T) -> &str,
    ) -> Result<Vec<T>, SourceError> {
        self.check(domain)?;
        Ok(items
            .iter()
            .filter(|item| scope.is_none_or(|ns| namespace_of(item) == ns))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ClusterSource for FixtureSource {
    async fn context(&self) -> Result<String, SourceError> {
        Ok(self.fixture.cluster.context.clone())
    }

    async fn cluster_name(&self) -> Result<String, SourceError> {
        Ok(self.fixture.cluster.name.clone())
    }

    async fn cluster_version(&self) -> Result<String, SourceError> {
        Ok(self.fixture.cluster.version.clone())
    }

    async fn mesh_version(&self) -> Result<Option<String>, SourceError> {
        Ok(self.fixture.cluster.mesh_version.clone())
    }

    async fn namespaces(&self, scope: Option<&str>) -> Result<Vec<Namespace>, SourceError> {
        self.scoped(Domain::Namespaces, &self.fixture.namespaces, scope, |ns| ns.name.as_str())
    }

    async fn helm_releases(&self, scope: Option<&str>) -> Result<Vec<HelmRelease>, SourceError> {
        self.scoped(Domain::HelmReleases, &self.fixture.helm_releases, scope, |r| r.namespace.as_str())
    }

    async fn deployments(&self, scope: Option<&str>) -> Result<Vec<Deployment>, SourceError> {
        self.scoped(Domain::Deployments, &self.fixture.deployments, scope, |d| d.namespace.as_str())
    }

    async fn pods(&self, scope: Option<&str>) -> Result<Vec<Pod>, SourceError> {
        self.scoped(Domain::Pods, &self.fixture.pods, scope, |p| p.namespace.as_str())
    }

    async fn ingresses(&self, scope: Option<&str>) -> Result<Vec<Ingress>, SourceError> {
        self.scoped(Domain::Ingress, &self.fixture.ingresses, scope, |i| i.namespace.as_str())
    }

    async fn kustomizations(
        &self,
        scope: Option<&str>,
    ) -> Result<Vec<Kustomization>, SourceError> {
        self.scoped(Domain::Kustomizations, &self.fixture.kustomizations, scope, |k| k.namespace.as_str())
    }

    async fn nodes(&self) -> Result<Vec<Node>, SourceError> {
        self.check(Domain::Nodes)?;
        Ok(self.fixture.nodes.clone())
    }
}
