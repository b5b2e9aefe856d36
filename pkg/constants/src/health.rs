//! Well-known resource names and status strings.

/// Namespace holding the service-mesh control plane.
pub const MESH_NAMESPACE: &str = "istio-system";

/// Deployment running the service-mesh control plane.
pub const MESH_DEPLOYMENT: &str = "istiod";

/// Flux Kustomization resource, as addressed by kubectl.
pub const KUSTOMIZATION_RESOURCE: &str = "kustomizations.kustomize.toolkit.fluxcd.io";

/// Placeholder rendered for the vault endpoint, which is never auto-discovered.
pub const VAULT_PLACEHOLDER: &str = "to be configured";

/// Rendered for a role with no healthy matching endpoint.
pub const ENDPOINT_NOT_FOUND: &str = "not found";
