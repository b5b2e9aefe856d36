//! Health classification rules, one module per resource domain.
//!
//! Every rule is a pure function of a single record: no I/O, no clock, no
//! cross-record state. Unrecognized status values always map to a defined
//! verdict.

pub mod deployment;
pub mod helm;
pub mod kustomization;
pub mod namespace;
pub mod node;
pub mod pod;

use pkg_types::health::{HealthVerdict, ResourceRecord};

/// A record that can be classified into a [`HealthVerdict`].
pub trait Classify {
    fn classify(&self) -> HealthVerdict;
}

impl Classify for ResourceRecord {
    fn classify(&self) -> HealthVerdict {
        match self {
            ResourceRecord::Namespace(ns) => ns.classify(),
            ResourceRecord::HelmRelease(release) => release.classify(),
            ResourceRecord::Deployment(deploy) => deploy.classify(),
            ResourceRecord::Pod(pod) => pod.classify(),
            ResourceRecord::Kustomization(ks) => ks.classify(),
            ResourceRecord::Node(node) => node.classify(),
        }
    }
}

/// Classify any record.
pub fn classify(record: &ResourceRecord) -> HealthVerdict {
    record.classify()
}
