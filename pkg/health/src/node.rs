use pkg_types::health::HealthVerdict;
use pkg_types::node::{Node, NodeCondition};

use crate::Classify;

/// A node that is not `Ready` is always a failure.
impl Classify for Node {
    fn classify(&self) -> HealthVerdict {
        match &self.condition {
            NodeCondition::Ready => HealthVerdict::Healthy,
            NodeCondition::NotReady(raw) => HealthVerdict::Failed(raw.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_node(condition: &str) -> Node {
        Node {
            name: "worker-1".to_string(),
            condition: NodeCondition::from(condition),
            roles: vec![],
            kubelet_version: "v1.30.4".to_string(),
        }
    }

    #[test]
    fn test_ready_node() {
        assert_eq!(make_node("Ready").classify(), HealthVerdict::Healthy);
    }

    #[test]
    fn test_not_ready_nodes_fail() {
        for condition in ["NotReady", "Unknown", "Ready,SchedulingDisabled", ""] {
            assert_eq!(
                make_node(condition).classify(),
                HealthVerdict::Failed(condition.to_string())
            );
        }
    }
}
