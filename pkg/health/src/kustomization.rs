use pkg_types::health::HealthVerdict;
use pkg_types::kustomization::{ConditionStatus, Kustomization};

use crate::Classify;

/// Binary: ready or failed. GitOps drift is always actionable.
impl Classify for Kustomization {
    fn classify(&self) -> HealthVerdict {
        match &self.ready {
            ConditionStatus::True => HealthVerdict::Healthy,
            status => {
                let reason = match self.message.as_deref() {
                    Some(message) if !message.is_empty() => message.to_string(),
                    _ if *status == ConditionStatus::Absent => "no Ready condition".to_string(),
                    _ => format!("Ready={}", status),
                };
                HealthVerdict::Failed(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_kustomization(ready: &str, message: Option<&str>) -> Kustomization {
        Kustomization {
            namespace: "flux-system".to_string(),
            name: "apps".to_string(),
            ready: ConditionStatus::from(ready),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_ready_true_is_healthy() {
        assert_eq!(make_kustomization("True", None).classify(), HealthVerdict::Healthy);
    }

    #[test]
    fn test_everything_else_fails() {
        assert_eq!(
            make_kustomization("False", Some("kustomize build failed")).classify(),
            HealthVerdict::Failed("kustomize build failed".to_string())
        );
        assert_eq!(
            make_kustomization("Unknown", None).classify(),
            HealthVerdict::Failed("Ready=Unknown".to_string())
        );
        assert_eq!(
            make_kustomization("", None).classify(),
            HealthVerdict::Failed("no Ready condition".to_string())
        );
        assert!(!make_kustomization("true", None).classify().is_healthy());
    }
}
