use serde::{Deserialize, Serialize};

/// Identity block shown at the top of a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterIdentity {
    /// Cluster name from the active kubeconfig context
    pub name: String,
    /// Kubeconfig context the run was executed against
    pub context: String,
    /// API server version, e.g. `v1.30.4`
    pub version: String,
    /// Service-mesh control plane version, `None` when no mesh is installed
    #[serde(default)]
    pub mesh_version: Option<String>,
}
