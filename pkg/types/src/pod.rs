use serde::{Deserialize, Serialize};

// --- Pod phase ---

/// Pod status as shown in the STATUS column of `kubectl get pods`.
///
/// This is the kubectl display status rather than the bare API phase, so it
/// carries container-level reasons such as `CrashLoopBackOff` or `Init:Error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum PodPhase {
    Running,
    /// Succeeded pods, typically finished jobs.
    Completed,
    Pending,
    /// A status that means the pod is broken and will not recover by itself.
    Failed(String),
    /// Transitional or unrecognized status (ContainerCreating, Terminating, ...).
    Other(String),
}

const FAILED_PHASES: &[&str] = &["Failed", "CrashLoopBackOff", "ImagePullBackOff", "ErrImagePull"];

impl From<&str> for PodPhase {
    fn from(raw: &str) -> Self {
        match raw {
            "Running" => PodPhase::Running,
            "Completed" => PodPhase::Completed,
            "Pending" => PodPhase::Pending,
            _ if FAILED_PHASES.contains(&raw)
                || raw.starts_with("Init:")
                || raw.contains("Error")
                || raw.contains("Evicted") =>
            {
                PodPhase::Failed(raw.to_string())
            }
            other => PodPhase::Other(other.to_string()),
        }
    }
}

impl From<String> for PodPhase {
    fn from(raw: String) -> Self {
        PodPhase::from(raw.as_str())
    }
}

impl From<PodPhase> for String {
    fn from(phase: PodPhase) -> Self {
        phase.to_string()
    }
}

impl std::fmt::Display for PodPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PodPhase::Running => write!(f, "Running"),
            PodPhase::Completed => write!(f, "Completed"),
            PodPhase::Pending => write!(f, "Pending"),
            PodPhase::Failed(raw) | PodPhase::Other(raw) => write!(f, "{}", raw),
        }
    }
}

// --- Pod ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pod {
    pub namespace: String,
    pub name: String,
    pub phase: PodPhase,
    #[serde(default)]
    pub containers_ready: u32,
    #[serde(default)]
    pub containers_total: u32,
    /// Sum of restart counts across all containers
    #[serde(default)]
    pub restart_count: u32,
}
