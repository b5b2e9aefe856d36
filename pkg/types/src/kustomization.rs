use serde::{Deserialize, Serialize};

/// Value of a Kubernetes-style condition `status` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum ConditionStatus {
    True,
    False,
    /// `Unknown`, empty, or anything unrecognized.
    Unknown(String),
    #[default]
    Absent,
}

impl From<&str> for ConditionStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "True" => ConditionStatus::True,
            "False" => ConditionStatus::False,
            "" => ConditionStatus::Absent,
            other => ConditionStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ConditionStatus {
    fn from(raw: String) -> Self {
        ConditionStatus::from(raw.as_str())
    }
}

impl From<ConditionStatus> for String {
    fn from(status: ConditionStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown(raw) => write!(f, "{}", raw),
            ConditionStatus::Absent => Ok(()),
        }
    }
}

/// Flux Kustomization reconciliation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kustomization {
    pub namespace: String,
    pub name: String,
    /// Status of the `Ready` condition
    #[serde(default)]
    pub ready: ConditionStatus,
    /// Message of the `Ready` condition
    #[serde(default)]
    pub message: Option<String>,
}
