use pkg_constants::network::{DEFAULT_PROBE_CONCURRENCY, DEFAULT_PROBE_TIMEOUT_SECS};
use pkg_probe::EndpointProbe;
use pkg_report::aggregate;
use pkg_source::{ClusterSource, SourceError};
use pkg_types::cluster::ClusterIdentity;
use pkg_types::config::UnavailablePolicy;
use pkg_types::health::Domain;
use pkg_types::report::{ClusterReport, DomainResult};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::namespace::NamespaceGate;
use crate::{deployment, helm, ingress, kustomization, namespace, node, pod};

/// Settings of one assessment run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Restrict namespaced domains to this namespace
    pub namespace: Option<String>,
    pub probe_timeout: Duration,
    pub concurrency: usize,
    pub policy: UnavailablePolicy,
    /// Accept invalid TLS certificates during probes
    pub insecure: bool,
    /// Deadline for the whole run
    pub deadline: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            concurrency: DEFAULT_PROBE_CONCURRENCY,
            policy: UnavailablePolicy::default(),
            insecure: false,
            deadline: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("cluster unreachable: {0}")]
    ClusterUnreachable(String),
    #[error("run cancelled")]
    Cancelled,
    #[error("run exceeded deadline of {}s", .0.as_secs())]
    DeadlineExceeded(Duration),
    #[error("failed to build probe client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Collect every domain, probe discovered endpoints and aggregate the report.
///
/// Domains are collected concurrently once the namespace listing is known.
/// A failed domain never aborts the run; only a run where every domain
/// failed is reported as [`RunError::ClusterUnreachable`].
pub async fn run_check(
    source: &dyn ClusterSource,
    opts: &RunOptions,
    cancel: &CancellationToken,
) -> Result<ClusterReport, RunError> {
    let probe = EndpointProbe::new(opts.probe_timeout, opts.insecure)?;
    let cancel = cancel.child_token();

    let deadline = async {
        match opts.deadline {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RunError::Cancelled),
        _ = deadline => {
            cancel.cancel();
            Err(RunError::DeadlineExceeded(opts.deadline.unwrap_or_default()))
        }
        report = collect_all(source, opts, &probe, &cancel) => report,
    }
}

async fn collect_all(
    source: &dyn ClusterSource,
    opts: &RunOptions,
    probe: &EndpointProbe,
    cancel: &CancellationToken,
) -> Result<ClusterReport, RunError> {
    let scope = opts.namespace.as_deref();
    info!(
        "Checking cluster (namespace={})",
        scope.unwrap_or("<all>")
    );

    let namespaces = namespace::collect(source, scope).await;
    let gate = match &namespaces {
        Ok((_, gate)) => gate.clone(),
        Err(_) => NamespaceGate::Open,
    };
    let namespaces = namespaces.map(|(result, _)| result);

    let (helm, deployments, pods, ingress, kustomizations, nodes, identity) = tokio::join!(
        helm::collect(source, scope),
        deployment::collect(source, scope, &gate),
        pod::collect(source, scope, &gate),
        ingress::collect(source, scope, probe, opts.concurrency, cancel),
        kustomization::collect(source, scope),
        node::collect(source),
        identity(source),
    );
    let (ingress, endpoints) = match ingress {
        Ok((result, endpoints)) => (Ok(result), endpoints),
        Err(e) => (Err(e), Vec::new()),
    };

    let outcomes = [
        (Domain::Namespaces, namespaces),
        (Domain::HelmReleases, helm),
        (Domain::Deployments, deployments),
        (Domain::Pods, pods),
        (Domain::Ingress, ingress),
        (Domain::Kustomizations, kustomizations),
        (Domain::Nodes, nodes),
    ];
    if outcomes.iter().all(|(_, outcome)| outcome.is_err()) {
        let reason = outcomes
            .iter()
            .find_map(|(_, outcome)| outcome.as_ref().err())
            .map(|e| e.to_string())
            .unwrap_or_default();
        return Err(RunError::ClusterUnreachable(reason));
    }

    let results: Vec<DomainResult> = outcomes
        .into_iter()
        .map(|(domain, outcome)| settle(domain, outcome, opts.policy))
        .collect();
    let report = aggregate(results, endpoints, identity);
    info!(
        "Check complete: {} issues across {} domains",
        report.total_issues,
        report.domain_results.len()
    );
    Ok(report)
}

/// Apply the unavailability policy to one collector outcome.
fn settle(
    domain: Domain,
    outcome: Result<DomainResult, SourceError>,
    policy: UnavailablePolicy,
) -> DomainResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            warn!("{} unavailable: {}", domain.label(), e);
            match policy {
                UnavailablePolicy::Report => DomainResult::unavailable(domain, &e.to_string()),
                UnavailablePolicy::Silent => DomainResult::new(domain),
            }
        }
    }
}

async fn identity(source: &dyn ClusterSource) -> ClusterIdentity {
    let (name, context, version, mesh_version) = tokio::join!(
        source.cluster_name(),
        source.context(),
        source.cluster_version(),
        source.mesh_version(),
    );
    ClusterIdentity {
        name: known("cluster name", name),
        context: known("context", context),
        version: known("cluster version", version),
        mesh_version: mesh_version.unwrap_or_else(|e| {
            warn!("Failed to read service mesh version: {}", e);
            None
        }),
    }
}

fn known(what: &str, value: Result<String, SourceError>) -> String {
    value.unwrap_or_else(|e| {
        warn!("Failed to read {}: {}", what, e);
        "unknown".to_string()
    })
}
