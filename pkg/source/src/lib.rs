//! Retrieval of raw cluster state.
//!
//! The health engine never talks to a cluster directly; it consumes records
//! through [`ClusterSource`]. [`kubectl::KubectlSource`] reads a live cluster
//! through kubectl and helm, [`fixture::FixtureSource`] serves a YAML snapshot.

pub mod fixture;
pub mod kubectl;

use async_trait::async_trait;
use pkg_types::deployment::Deployment;
use pkg_types::health::Domain;
use pkg_types::helm::HelmRelease;
use pkg_types::ingress::Ingress;
use pkg_types::kustomization::Kustomization;
use pkg_types::namespace::Namespace;
use pkg_types::node::Node;
use pkg_types::pod::Pod;

pub use fixture::FixtureSource;
pub use kubectl::KubectlSource;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("failed to parse output of {command}: {source}")]
    Parse {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture {path}: {source}")]
    Fixture {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{0} unavailable")]
    Unavailable(Domain),
}

/// Read-only access to the resources of one cluster.
///
/// `scope` restricts namespaced lists to a single namespace; `None` means all
/// namespaces. An empty list means nothing was found, an error means the
/// domain could not be retrieved.
#[async_trait]
pub trait ClusterSource: Send + Sync {
    /// Kubeconfig context in use.
    async fn context(&self) -> Result<String, SourceError>;
    async fn cluster_name(&self) -> Result<String, SourceError>;
    async fn cluster_version(&self) -> Result<String, SourceError>;
    /// Service-mesh control plane version, `None` when no mesh is installed.
    async fn mesh_version(&self) -> Result<Option<String>, SourceError>;

    async fn namespaces(&self, scope: Option<&str>) -> Result<Vec<Namespace>, SourceError>;
    async fn helm_releases(&self, scope: Option<&str>) -> Result<Vec<HelmRelease>, SourceError>;
    async fn deployments(&self, scope: Option<&str>) -> Result<Vec<Deployment>, SourceError>;
    async fn pods(&self, scope: Option<&str>) -> Result<Vec<Pod>, SourceError>;
    async fn ingresses(&self, scope: Option<&str>) -> Result<Vec<Ingress>, SourceError>;
    async fn kustomizations(&self, scope: Option<&str>)
    -> Result<Vec<Kustomization>, SourceError>;
    async fn nodes(&self) -> Result<Vec<Node>, SourceError>;
}
