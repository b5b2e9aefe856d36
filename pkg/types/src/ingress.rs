use serde::{Deserialize, Serialize};

/// A single path rule within an Ingress HTTP rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressPath {
    /// Empty when the rule only names a backend.
    #[serde(default)]
    pub path: String,
}

/// A single host-based Ingress rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressRule {
    /// Rules without a host catch all traffic and are not probed.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub paths: Vec<IngressPath>,
}

/// Ingress resource exposing in-cluster services to external traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingress {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<IngressRule>,
}
