use serde::{Deserialize, Serialize};

/// Replica counters of a Deployment as reported by the API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub ready_replicas: u32,
    /// `spec.replicas`
    #[serde(default)]
    pub desired_replicas: u32,
    #[serde(default)]
    pub updated_replicas: u32,
    #[serde(default)]
    pub available_replicas: u32,
}
