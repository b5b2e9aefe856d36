//! Per-domain collectors and the run orchestration that drives them.
//!
//! Each collector pulls the records of one domain from a
//! [`pkg_source::ClusterSource`], classifies them and returns its own
//! [`DomainResult`]. Collectors never share state.

pub mod deployment;
pub mod helm;
pub mod ingress;
pub mod kustomization;
pub mod namespace;
pub mod node;
pub mod pod;
pub mod run;

use pkg_health::Classify;
use pkg_types::health::{Domain, ResourceRecord};
use pkg_types::report::DomainResult;
use tracing::debug;

pub use namespace::NamespaceGate;
pub use run::{RunError, RunOptions, run_check};

/// Classify every record and count it into a fresh result for `domain`.
pub(crate) fn tally(
    domain: Domain,
    records: impl IntoIterator<Item = ResourceRecord>,
) -> DomainResult {
    let mut result = DomainResult::new(domain);
    for record in records {
        let id = record.id();
        let verdict = record.classify();
        debug!("{} {}: {:?}", domain.label(), id, verdict);
        result.record(id, &verdict);
    }
    result
}
