use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a domain whose retrieval failed is represented in the report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnavailablePolicy {
    /// Surface the domain as `UNKNOWN` and count the outage as an issue.
    #[default]
    Report,
    /// Treat the domain as empty, hiding the outage.
    Silent,
}

impl std::str::FromStr for UnavailablePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "report" => Ok(UnavailablePolicy::Report),
            "silent" => Ok(UnavailablePolicy::Silent),
            other => Err(format!(
                "unknown policy '{}', expected 'report' or 'silent'",
                other
            )),
        }
    }
}

/// Checker configuration file (YAML).
///
/// Example `config.yaml`:
/// ```yaml
/// namespace: prod
/// context: staging
/// timeout: 10
/// concurrency: 8
/// run-timeout: 300
/// on-unavailable: report
/// insecure: false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfigFile {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    /// Per-probe HTTP timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub concurrency: Option<usize>,
    /// Deadline for the whole run in seconds
    #[serde(default, alias = "run-timeout")]
    pub run_timeout: Option<u64>,
    #[serde(default, alias = "on-unavailable")]
    pub on_unavailable: Option<UnavailablePolicy>,
    #[serde(default)]
    pub insecure: Option<bool>,
    #[serde(default)]
    pub kubectl: Option<String>,
    #[serde(default)]
    pub helm: Option<String>,
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(
    path: &Path,
) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    let config: T = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))?;
    Ok(config)
}
