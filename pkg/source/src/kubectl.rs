use async_trait::async_trait;
use k8s_openapi::api::apps::v1 as appsv1;
use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::api::networking::v1 as netv1;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use pkg_constants::health::{KUSTOMIZATION_RESOURCE, MESH_DEPLOYMENT, MESH_NAMESPACE};
use pkg_constants::paths::{DEFAULT_HELM_BIN, DEFAULT_KUBECTL_BIN};
use pkg_types::deployment::Deployment;
use pkg_types::helm::{HelmRelease, HelmStatus};
use pkg_types::ingress::{Ingress, IngressPath, IngressRule};
use pkg_types::kustomization::{ConditionStatus, Kustomization};
use pkg_types::namespace::{Namespace, NamespacePhase};
use pkg_types::node::{Node, NodeCondition};
use pkg_types::pod::{Pod, PodPhase};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{ClusterSource, SourceError};

/// Reads a live cluster by shelling out to `kubectl` and `helm` with JSON output.
#[derive(Debug, Clone)]
pub struct KubectlSource {
    kubectl: String,
    helm: String,
    /// `None` uses the current kubeconfig context
    context: Option<String>,
}

impl Default for KubectlSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl KubectlSource {
    pub fn new(context: Option<String>) -> Self {
        Self {
            kubectl: DEFAULT_KUBECTL_BIN.to_string(),
            helm: DEFAULT_HELM_BIN.to_string(),
            context,
        }
    }

    pub fn with_binaries(mut self, kubectl: &str, helm: &str) -> Self {
        self.kubectl = kubectl.to_string();
        self.helm = helm.to_string();
        self
    }

    /// Run a program and return its stdout. Non-zero exit is an error.
    async fn run(&self, program: &str, args: &[String]) -> Result<String, SourceError> {
        let command = format!("{} {}", program, args.join(" "));
        debug!("Running {}", command);

        let output = tokio::process::Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SourceError::Spawn {
                command: command.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn kubectl_args(&self, args: &[&str]) -> Vec<String> {
        let mut full: Vec<String> = Vec::with_capacity(args.len() + 2);
        if let Some(ctx) = &self.context {
            full.push("--context".to_string());
            full.push(ctx.clone());
        }
        full.extend(args.iter().map(|a| a.to_string()));
        full
    }

    /// Run kubectl and deserialize its JSON output.
    async fn kubectl_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, SourceError> {
        let args = self.kubectl_args(args);
        let stdout = self.run(&self.kubectl, &args).await?;
        serde_json::from_str(&stdout).map_err(|e| SourceError::Parse {
            command: format!("{} {}", self.kubectl, args.join(" ")),
            source: e,
        })
    }

    /// Arguments for `helm list` covering every release in every state.
    fn helm_list_args(&self, scope: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = vec!["list".to_string(), "-a".to_string()];
        match scope {
            Some(ns) => args.extend(["-n".to_string(), ns.to_string()]),
            None => args.push("-A".to_string()),
        }
        // helm caps the listing at 256 releases unless told otherwise.
        args.extend(["--max", "0", "-o", "json"].map(str::to_string));
        if let Some(ctx) = &self.context {
            args.extend(["--kube-context".to_string(), ctx.clone()]);
        }
        args
    }

    /// `kubectl get <resource>` across all namespaces or within `scope`.
    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        scope: Option<&str>,
    ) -> Result<Vec<T>, SourceError> {
        let list: ObjectList<T> = match scope {
            Some(ns) => self.kubectl_json(&["get", resource, "-n", ns, "-o", "json"]).await?,
            None => self.kubectl_json(&["get", resource, "-A", "-o", "json"]).await?,
        };
        Ok(list.items)
    }
}

#[async_trait]
impl ClusterSource for KubectlSource {
    async fn context(&self) -> Result<String, SourceError> {
        if let Some(ctx) = &self.context {
            return Ok(ctx.clone());
        }
        let args = self.kubectl_args(&["config", "current-context"]);
        Ok(self.run(&self.kubectl, &args).await?.trim().to_string())
    }

    async fn cluster_name(&self) -> Result<String, SourceError> {
        let args = self.kubectl_args(&[
            "config",
            "view",
            "--minify",
            "-o",
            "jsonpath={.clusters[0].name}",
        ]);
        Ok(self.run(&self.kubectl, &args).await?.trim().to_string())
    }

    async fn cluster_version(&self) -> Result<String, SourceError> {
        let version: VersionOutput = self.kubectl_json(&["version", "-o", "json"]).await?;
        Ok(version.server_version.map(|v| v.git_version).unwrap_or_default())
    }

    async fn mesh_version(&self) -> Result<Option<String>, SourceError> {
        let result: Result<appsv1::Deployment, _> = self
            .kubectl_json(&["get", "deployment", MESH_DEPLOYMENT, "-n", MESH_NAMESPACE, "-o", "json"])
            .await;
        match result {
            Ok(deployment) => Ok(mesh_version_from(&deployment)),
            Err(SourceError::CommandFailed { stderr, .. }) if is_not_found(&stderr) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn namespaces(&self, scope: Option<&str>) -> Result<Vec<Namespace>, SourceError> {
        let list: ObjectList<corev1::Namespace> = match scope {
            Some(ns) => {
                let selector = format!("metadata.name={}", ns);
                self.kubectl_json(&["get", "namespaces", "--field-selector", &selector, "-o", "json"])
                    .await?
            }
            None => self.kubectl_json(&["get", "namespaces", "-o", "json"]).await?,
        };
        Ok(list.items.iter().map(namespace_from).collect())
    }

    async fn helm_releases(&self, scope: Option<&str>) -> Result<Vec<HelmRelease>, SourceError> {
        let args = self.helm_list_args(scope);
        let stdout = self.run(&self.helm, &args).await?;
        let entries: Vec<HelmListEntry> =
            serde_json::from_str(&stdout).map_err(|e| SourceError::Parse {
                command: format!("{} {}", self.helm, args.join(" ")),
                source: e,
            })?;
        Ok(entries.into_iter().map(HelmRelease::from).collect())
    }

    async fn deployments(&self, scope: Option<&str>) -> Result<Vec<Deployment>, SourceError> {
        let items: Vec<appsv1::Deployment> = self.list("deployments", scope).await?;
        Ok(items.iter().map(deployment_from).collect())
    }

    async fn pods(&self, scope: Option<&str>) -> Result<Vec<Pod>, SourceError> {
        let items: Vec<corev1::Pod> = self.list("pods", scope).await?;
        Ok(items.iter().map(pod_from).collect())
    }

    async fn ingresses(&self, scope: Option<&str>) -> Result<Vec<Ingress>, SourceError> {
        let items: Vec<netv1::Ingress> = self.list("ingresses", scope).await?;
        Ok(items.iter().map(ingress_from).collect())
    }

    /// A cluster without the Flux CRD has no kustomizations.
    async fn kustomizations(
        &self,
        scope: Option<&str>,
    ) -> Result<Vec<Kustomization>, SourceError> {
        match self.list::<FluxKustomization>(KUSTOMIZATION_RESOURCE, scope).await {
            Ok(items) => Ok(items.iter().map(kustomization_from).collect()),
            Err(SourceError::CommandFailed { stderr, .. }) if is_unknown_resource_type(&stderr) => {
                debug!("{} is not installed: {}", KUSTOMIZATION_RESOURCE, stderr);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn nodes(&self) -> Result<Vec<Node>, SourceError> {
        let list: ObjectList<corev1::Node> = self.kubectl_json(&["get", "nodes", "-o", "json"]).await?;
        Ok(list.items.iter().map(node_from).collect())
    }
}

fn is_not_found(stderr: &str) -> bool {
    stderr.contains("NotFound") || stderr.contains("not found")
}

/// kubectl's message for a resource type the API server does not serve.
fn is_unknown_resource_type(stderr: &str) -> bool {
    stderr.contains("doesn't have a resource type")
        || stderr.contains("the server could not find the requested resource")
}

// --- Output shapes ---

/// `kubectl get ... -o json` list output. kubectl always reports `kind: List`,
/// so only the items are read.
#[derive(Debug, Deserialize)]
struct ObjectList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionOutput {
    server_version: Option<ServerVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerVersion {
    #[serde(default)]
    git_version: String,
}

/// One entry of `helm list -o json`.
#[derive(Debug, Deserialize)]
struct HelmListEntry {
    name: String,
    namespace: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    chart: Option<String>,
}

impl From<HelmListEntry> for HelmRelease {
    fn from(entry: HelmListEntry) -> Self {
        HelmRelease {
            namespace: entry.namespace,
            name: entry.name,
            status: HelmStatus::from(entry.status),
            chart: entry.chart.filter(|c| !c.is_empty()),
        }
    }
}

/// The parts of a Flux `Kustomization` the checker reads.
#[derive(Debug, Deserialize)]
struct FluxKustomization {
    #[serde(default)]
    metadata: ObjectMeta,
    #[serde(default)]
    status: Option<FluxStatus>,
}

#[derive(Debug, Default, Deserialize)]
struct FluxStatus {
    #[serde(default)]
    conditions: Vec<FluxCondition>,
}

#[derive(Debug, Deserialize)]
struct FluxCondition {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
}

// --- Mapping ---

fn name_of(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

fn namespace_of(meta: &ObjectMeta) -> String {
    meta.namespace.clone().unwrap_or_default()
}

fn count(n: Option<i32>) -> u32 {
    n.map_or(0, |n| u32::try_from(n).unwrap_or(0))
}

fn namespace_from(ns: &corev1::Namespace) -> Namespace {
    let phase = ns
        .status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .unwrap_or_default();
    Namespace {
        name: name_of(&ns.metadata),
        phase: NamespacePhase::from(phase),
    }
}

fn deployment_from(deploy: &appsv1::Deployment) -> Deployment {
    let status = deploy.status.as_ref();
    Deployment {
        namespace: namespace_of(&deploy.metadata),
        name: name_of(&deploy.metadata),
        ready_replicas: count(status.and_then(|s| s.ready_replicas)),
        // The API server defaults an unset replica count to 1.
        desired_replicas: count(Some(
            deploy.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1),
        )),
        updated_replicas: count(status.and_then(|s| s.updated_replicas)),
        available_replicas: count(status.and_then(|s| s.available_replicas)),
    }
}

fn container_statuses(pod: &corev1::Pod) -> &[corev1::ContainerStatus] {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default()
}

fn pod_from(pod: &corev1::Pod) -> Pod {
    let statuses = container_statuses(pod);
    let declared = pod.spec.as_ref().map_or(0, |s| s.containers.len());
    let ready = statuses.iter().filter(|cs| cs.ready).count();
    let restarts: u32 = statuses.iter().map(|cs| count(Some(cs.restart_count))).sum();

    Pod {
        namespace: namespace_of(&pod.metadata),
        name: name_of(&pod.metadata),
        phase: PodPhase::from(pod_display_status(pod)),
        containers_ready: ready as u32,
        containers_total: declared.max(statuses.len()) as u32,
        restart_count: restarts,
    }
}

fn waiting_reason(cs: &corev1::ContainerStatus) -> &str {
    cs.state
        .as_ref()
        .and_then(|s| s.waiting.as_ref())
        .and_then(|w| w.reason.as_deref())
        .unwrap_or_default()
}

fn terminated(cs: &corev1::ContainerStatus) -> Option<&corev1::ContainerStateTerminated> {
    cs.state.as_ref().and_then(|s| s.terminated.as_ref())
}

/// Reason printed for a terminated container without an explicit reason.
fn exit_reason(state: &corev1::ContainerStateTerminated, prefix: &str) -> String {
    match (state.reason.as_deref(), state.signal) {
        (Some(reason), _) if !reason.is_empty() => format!("{}{}", prefix, reason),
        (_, Some(signal)) if signal != 0 => format!("{}Signal:{}", prefix, signal),
        _ => format!("{}ExitCode:{}", prefix, state.exit_code),
    }
}

/// Status as printed in the STATUS column of `kubectl get pods`.
fn pod_display_status(pod: &corev1::Pod) -> String {
    let status = pod.status.as_ref();
    let status_reason = status.and_then(|s| s.reason.as_deref()).unwrap_or_default();
    let mut reason = if status_reason.is_empty() {
        status.and_then(|s| s.phase.clone()).unwrap_or_default()
    } else {
        status_reason.to_string()
    };

    let init_statuses = status
        .and_then(|s| s.init_container_statuses.as_deref())
        .unwrap_or_default();
    let init_total = pod
        .spec
        .as_ref()
        .and_then(|s| s.init_containers.as_ref())
        .map_or(0, Vec::len)
        .max(init_statuses.len());
    let mut initializing = false;
    for (i, cs) in init_statuses.iter().enumerate() {
        let waiting = waiting_reason(cs);
        match terminated(cs) {
            Some(t) if t.exit_code == 0 => continue,
            Some(t) => reason = exit_reason(t, "Init:"),
            None if !waiting.is_empty() && waiting != "PodInitializing" => {
                reason = format!("Init:{}", waiting);
            }
            None => reason = format!("Init:{}/{}", i, init_total),
        }
        initializing = true;
        break;
    }

    if !initializing {
        // Iterate backwards so the first container's reason wins.
        for cs in container_statuses(pod).iter().rev() {
            let waiting = waiting_reason(cs);
            if !waiting.is_empty() {
                reason = waiting.to_string();
            } else if let Some(t) = terminated(cs) {
                reason = exit_reason(t, "");
            }
        }
        if reason == "Succeeded" {
            reason = "Completed".to_string();
        }
    }

    if pod.metadata.deletion_timestamp.is_some() {
        reason = if status_reason == "NodeLost" {
            "Unknown".to_string()
        } else {
            "Terminating".to_string()
        };
    }
    reason
}

fn ingress_from(ingress: &netv1::Ingress) -> Ingress {
    let rules = ingress
        .spec
        .as_ref()
        .and_then(|s| s.rules.as_deref())
        .unwrap_or_default()
        .iter()
        .map(|rule| IngressRule {
            host: rule.host.clone(),
            paths: rule
                .http
                .as_ref()
                .map(|http| {
                    http.paths
                        .iter()
                        .map(|p| IngressPath {
                            path: p.path.clone().unwrap_or_default(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();
    Ingress {
        namespace: namespace_of(&ingress.metadata),
        name: name_of(&ingress.metadata),
        rules,
    }
}

fn kustomization_from(ks: &FluxKustomization) -> Kustomization {
    let ready = ks
        .status
        .as_ref()
        .and_then(|s| s.conditions.iter().find(|c| c.type_ == "Ready"));
    Kustomization {
        namespace: namespace_of(&ks.metadata),
        name: name_of(&ks.metadata),
        ready: ready
            .map(|c| ConditionStatus::from(c.status.as_str()))
            .unwrap_or_default(),
        message: ready
            .and_then(|c| c.message.clone())
            .filter(|m| !m.is_empty()),
    }
}

fn node_from(node: &corev1::Node) -> Node {
    let status = node.status.as_ref();
    let ready = status
        .and_then(|s| s.conditions.as_deref())
        .unwrap_or_default()
        .iter()
        .find(|c| c.type_ == "Ready")
        .map(|c| c.status.as_str());
    let mut condition = match ready {
        Some("True") => "Ready".to_string(),
        Some("Unknown") => "Unknown".to_string(),
        _ => "NotReady".to_string(),
    };
    if node.spec.as_ref().and_then(|s| s.unschedulable) == Some(true) {
        condition.push_str(",SchedulingDisabled");
    }

    let roles = node
        .metadata
        .labels
        .as_ref()
        .map(|labels| {
            labels
                .keys()
                .filter_map(|k| k.strip_prefix("node-role.kubernetes.io/"))
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Node {
        name: name_of(&node.metadata),
        condition: NodeCondition::from(condition),
        roles,
        kubelet_version: status
            .and_then(|s| s.node_info.as_ref())
            .map(|info| info.kubelet_version.clone())
            .unwrap_or_default(),
    }
}

/// Image tag of the mesh control plane's first container.
fn mesh_version_from(deployment: &appsv1::Deployment) -> Option<String> {
    let image = deployment
        .spec
        .as_ref()?
        .template
        .spec
        .as_ref()?
        .containers
        .first()?
        .image
        .as_deref()?;
    let name = image.rsplit('/').next().unwrap_or(image);
    name.split_once(':')
        .map(|(_, tag)| tag.split('@').next().unwrap_or(tag).to_string())
        .filter(|tag| !tag.is_empty())
}
