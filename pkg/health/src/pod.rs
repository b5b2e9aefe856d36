use pkg_types::health::HealthVerdict;
use pkg_types::pod::{Pod, PodPhase};

use crate::Classify;

/// Three-way pod classification.
///
/// Running pods must have every container ready, completed pods count as
/// successful jobs, and unrecognized states stay `Degraded` so transient
/// phases never raise a false failure.
impl Classify for Pod {
    fn classify(&self) -> HealthVerdict {
        match &self.phase {
            PodPhase::Running => {
                if self.containers_total != 0 && self.containers_ready == self.containers_total {
                    HealthVerdict::Healthy
                } else {
                    HealthVerdict::Degraded(format!(
                        "not all containers ready ({}/{})",
                        self.containers_ready, self.containers_total
                    ))
                }
            }
            PodPhase::Completed => HealthVerdict::Healthy,
            PodPhase::Pending => HealthVerdict::Degraded("Pending".to_string()),
            PodPhase::Failed(raw) => HealthVerdict::Failed(with_restarts(raw, self.restart_count)),
            PodPhase::Other(raw) => HealthVerdict::Degraded(raw.clone()),
        }
    }
}

fn with_restarts(phase: &str, restarts: u32) -> String {
    if restarts > 0 {
        format!("{} ({} restarts)", phase, restarts)
    } else {
        phase.to_string()
    }
}
