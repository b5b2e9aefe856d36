use serde::{Deserialize, Serialize};

/// Release status as printed by `helm list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum HelmStatus {
    Deployed,
    Failed,
    PendingUpgrade,
    PendingInstall,
    /// Anything else: superseded, uninstalling, pending-rollback, ...
    Other(String),
}

impl From<&str> for HelmStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "deployed" => HelmStatus::Deployed,
            "failed" => HelmStatus::Failed,
            "pending-upgrade" => HelmStatus::PendingUpgrade,
            "pending-install" => HelmStatus::PendingInstall,
            other => HelmStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for HelmStatus {
    fn from(raw: String) -> Self {
        HelmStatus::from(raw.as_str())
    }
}

impl From<HelmStatus> for String {
    fn from(status: HelmStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for HelmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HelmStatus::Deployed => write!(f, "deployed"),
            HelmStatus::Failed => write!(f, "failed"),
            HelmStatus::PendingUpgrade => write!(f, "pending-upgrade"),
            HelmStatus::PendingInstall => write!(f, "pending-install"),
            HelmStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelmRelease {
    pub namespace: String,
    pub name: String,
    pub status: HelmStatus,
    /// Chart reference, e.g. `kube-prometheus-stack-58.2.1`
    #[serde(default)]
    pub chart: Option<String>,
}
