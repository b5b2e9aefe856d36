//! Filesystem and executable path constants.

// ─── Config ────────────────────────────────────────────────────────────────

/// Directory name under the user config dir (`$XDG_CONFIG_HOME`).
pub const CONFIG_DIR_NAME: &str = "kcheck";

/// Config file name inside `CONFIG_DIR_NAME`.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

// ─── External tools ────────────────────────────────────────────────────────

/// Default kubectl binary, resolved through `PATH`.
pub const DEFAULT_KUBECTL_BIN: &str = "kubectl";

/// Default helm binary, resolved through `PATH`.
pub const DEFAULT_HELM_BIN: &str = "helm";
