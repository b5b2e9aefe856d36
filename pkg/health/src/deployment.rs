use pkg_types::deployment::Deployment;
use pkg_types::health::HealthVerdict;

use crate::Classify;

/// Healthy only when every desired replica is ready and available.
///
/// A deployment scaled to zero is not healthy: an empty deployment in a
/// delivered cluster points at a misconfiguration.
impl Classify for Deployment {
    fn classify(&self) -> HealthVerdict {
        let desired = self.desired_replicas;
        if desired != 0 && self.ready_replicas == desired && self.available_replicas == desired {
            HealthVerdict::Healthy
        } else {
            HealthVerdict::Degraded(format!(
                "not ready ({}/{} ready, {} available)",
                self.ready_replicas, desired, self.available_replicas
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_deployment(name: &str, ready: u32, desired: u32, available: u32) -> Deployment {
        Deployment {
            namespace: "prod".to_string(),
            name: name.to_string(),
            ready_replicas: ready,
            desired_replicas: desired,
            updated_replicas: ready,
            available_replicas: available,
        }
    }

    #[test]
    fn test_fully_ready_is_healthy() {
        assert_eq!(make_deployment("api", 2, 2, 2).classify(), HealthVerdict::Healthy);
    }

    #[test]
    fn test_partially_ready_is_degraded() {
        let verdict = make_deployment("web", 1, 2, 1).classify();
        assert_eq!(verdict.verdict(), pkg_types::health::Verdict::Degraded);
        assert!(verdict.reason().unwrap().contains("1/2"));
    }

    #[test]
    fn test_scaled_to_zero_is_degraded() {
        let verdict = make_deployment("idle", 0, 0, 0).classify();
        assert_eq!(
            verdict,
            HealthVerdict::Degraded("not ready (0/0 ready, 0 available)".to_string())
        );
    }

    #[test]
    fn test_ready_but_unavailable_is_degraded() {
        assert!(!make_deployment("rolling", 3, 3, 2).classify().is_healthy());
    }
}
