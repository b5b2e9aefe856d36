use serde::{Deserialize, Serialize};

// --- Node condition ---

/// Summarized `Ready` condition of a node, as printed by `kubectl get nodes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum NodeCondition {
    Ready,
    /// `NotReady`, `Unknown`, `Ready,SchedulingDisabled`, ...
    NotReady(String),
}

impl From<&str> for NodeCondition {
    fn from(raw: &str) -> Self {
        match raw {
            "Ready" => NodeCondition::Ready,
            other => NodeCondition::NotReady(other.to_string()),
        }
    }
}

impl From<String> for NodeCondition {
    fn from(raw: String) -> Self {
        NodeCondition::from(raw.as_str())
    }
}

impl From<NodeCondition> for String {
    fn from(condition: NodeCondition) -> Self {
        condition.to_string()
    }
}

impl std::fmt::Display for NodeCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeCondition::Ready => write!(f, "Ready"),
            NodeCondition::NotReady(raw) => write!(f, "{}", raw),
        }
    }
}

// --- Node ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub condition: NodeCondition,
    /// Values of `node-role.kubernetes.io/<role>` labels
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub kubelet_version: String,
}
