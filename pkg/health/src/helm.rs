use pkg_types::health::HealthVerdict;
use pkg_types::helm::{HelmRelease, HelmStatus};

use crate::Classify;

/// Broken releases are `Failed`; transitional or superseded ones only `Degraded`.
impl Classify for HelmRelease {
    fn classify(&self) -> HealthVerdict {
        match &self.status {
            HelmStatus::Deployed => HealthVerdict::Healthy,
            HelmStatus::Failed | HelmStatus::PendingUpgrade | HelmStatus::PendingInstall => {
                HealthVerdict::Failed(self.status.to_string())
            }
            HelmStatus::Other(raw) => HealthVerdict::Degraded(raw.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_release(status: &str) -> HelmRelease {
        HelmRelease {
            namespace: "monitoring".to_string(),
            name: "kube-prometheus-stack".to_string(),
            status: HelmStatus::from(status),
            chart: None,
        }
    }

    #[test]
    fn test_deployed_is_healthy() {
        assert_eq!(make_release("deployed").classify(), HealthVerdict::Healthy);
    }

    #[test]
    fn test_broken_statuses_fail() {
        for status in ["failed", "pending-upgrade", "pending-install"] {
            assert_eq!(
                make_release(status).classify(),
                HealthVerdict::Failed(status.to_string())
            );
        }
    }

    #[test]
    fn test_other_statuses_degrade() {
        for status in ["superseded", "uninstalling", "pending-rollback", "Deployed", ""] {
            assert_eq!(
                make_release(status).classify(),
                HealthVerdict::Degraded(status.to_string())
            );
        }
    }
}
