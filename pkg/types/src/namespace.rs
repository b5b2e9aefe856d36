use serde::{Deserialize, Serialize};

/// Lifecycle phase reported for a namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum NamespacePhase {
    Active,
    Terminating,
    Unknown(String),
}

impl NamespacePhase {
    pub fn is_active(&self) -> bool {
        matches!(self, NamespacePhase::Active)
    }
}

impl From<&str> for NamespacePhase {
    fn from(raw: &str) -> Self {
        match raw {
            "Active" => NamespacePhase::Active,
            "Terminating" => NamespacePhase::Terminating,
            other => NamespacePhase::Unknown(other.to_string()),
        }
    }
}

impl From<String> for NamespacePhase {
    fn from(raw: String) -> Self {
        NamespacePhase::from(raw.as_str())
    }
}

impl From<NamespacePhase> for String {
    fn from(phase: NamespacePhase) -> Self {
        phase.to_string()
    }
}

impl std::fmt::Display for NamespacePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamespacePhase::Active => write!(f, "Active"),
            NamespacePhase::Terminating => write!(f, "Terminating"),
            NamespacePhase::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub phase: NamespacePhase,
}
