use pkg_types::health::HealthVerdict;
use pkg_types::namespace::{Namespace, NamespacePhase};

use crate::Classify;

/// Active namespaces are healthy; any other phase is degraded with the phase as reason.
impl Classify for Namespace {
    fn classify(&self) -> HealthVerdict {
        match &self.phase {
            NamespacePhase::Active => HealthVerdict::Healthy,
            phase => HealthVerdict::Degraded(phase.to_string()),
        }
    }
}
