use anyhow::Result;
use clap::{Parser, ValueEnum};
use pkg_collectors::RunOptions;
use pkg_constants::network::{DEFAULT_PROBE_CONCURRENCY, DEFAULT_PROBE_TIMEOUT_SECS};
use pkg_constants::paths::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_HELM_BIN, DEFAULT_KUBECTL_BIN,
};
use pkg_types::config::{CheckConfigFile, UnavailablePolicy};
use pkg_types::validate::{validate_namespace, validate_positive};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "kcheck", about = "Kubernetes cluster delivery health check")]
pub struct Cli {
    /// Path to YAML config file [default: $XDG_CONFIG_HOME/kcheck/config.yaml]
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Only check this namespace
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Per-endpoint probe timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Number of endpoints probed in parallel
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Deadline for the whole run in seconds
    #[arg(long)]
    pub run_timeout: Option<u64>,

    /// How domains that could not be retrieved are reported (report, silent)
    #[arg(long)]
    pub on_unavailable: Option<UnavailablePolicy>,

    /// Accept invalid TLS certificates when probing endpoints
    #[arg(long)]
    pub insecure: bool,

    /// Read cluster state from a YAML snapshot instead of kubectl
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Report format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log progress and list every probed endpoint
    #[arg(long, short)]
    pub verbose: bool,

    /// kubectl binary
    #[arg(long)]
    pub kubectl: Option<String>,

    /// helm binary
    #[arg(long)]
    pub helm: Option<String>,
}

impl Cli {
    /// Explicit `--config`, else the per-user config file if a config dir exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        })
    }
}

/// Effective settings after merging CLI flags, config file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub namespace: Option<String>,
    pub context: Option<String>,
    pub timeout: Duration,
    pub concurrency: usize,
    pub run_timeout: Option<Duration>,
    pub policy: UnavailablePolicy,
    pub insecure: bool,
    pub kubectl: String,
    pub helm: String,
}

impl Settings {
    /// Merge: CLI args > config file > defaults.
    pub fn merge(cli: &Cli, file: CheckConfigFile) -> Result<Self> {
        let namespace = cli.namespace.clone().or(file.namespace);
        if let Some(ns) = &namespace {
            validate_namespace(ns)?;
        }

        let timeout = cli.timeout.or(file.timeout).unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS);
        validate_positive("timeout", timeout)?;
        let concurrency = cli
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_PROBE_CONCURRENCY);
        validate_positive("concurrency", concurrency as u64)?;
        let run_timeout = cli.run_timeout.or(file.run_timeout);
        if let Some(secs) = run_timeout {
            validate_positive("run-timeout", secs)?;
        }

        Ok(Self {
            namespace,
            context: cli.context.clone().or(file.context),
            timeout: Duration::from_secs(timeout),
            concurrency,
            run_timeout: run_timeout.map(Duration::from_secs),
            policy: cli.on_unavailable.or(file.on_unavailable).unwrap_or_default(),
            insecure: cli.insecure || file.insecure.unwrap_or(false),
            kubectl: cli
                .kubectl
                .clone()
                .or(file.kubectl)
                .unwrap_or_else(|| DEFAULT_KUBECTL_BIN.to_string()),
            helm: cli
                .helm
                .clone()
                .or(file.helm)
                .unwrap_or_else(|| DEFAULT_HELM_BIN.to_string()),
        })
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            namespace: self.namespace.clone(),
            probe_timeout: self.timeout,
            concurrency: self.concurrency,
            policy: self.policy,
            insecure: self.insecure,
            deadline: self.run_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::config::load_config_file;
    use std::io::Write;

    fn make_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kcheck").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::merge(&make_cli(&[]), CheckConfigFile::default()).unwrap();
        assert_eq!(settings.namespace, None);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS));
        assert_eq!(settings.concurrency, DEFAULT_PROBE_CONCURRENCY);
        assert_eq!(settings.run_timeout, None);
        assert_eq!(settings.policy, UnavailablePolicy::Report);
        assert!(!settings.insecure);
        assert_eq!(settings.kubectl, "kubectl");
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "namespace: staging\ntimeout: 5\non-unavailable: silent\nhelm: /opt/helm"
        )
        .unwrap();
        let file_cfg: CheckConfigFile = load_config_file(file.path()).unwrap();

        let cli = make_cli(&["--namespace", "prod", "--run-timeout", "60"]);
        let settings = Settings::merge(&cli, file_cfg).unwrap();
        assert_eq!(settings.namespace.as_deref(), Some("prod"));
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.run_timeout, Some(Duration::from_secs(60)));
        assert_eq!(settings.policy, UnavailablePolicy::Silent);
        assert_eq!(settings.helm, "/opt/helm");
    }

    #[test]
    fn test_policy_flag() {
        let cli = make_cli(&["--on-unavailable", "silent", "-o", "json"]);
        assert_eq!(cli.on_unavailable, Some(UnavailablePolicy::Silent));
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(Cli::try_parse_from(["kcheck", "--on-unavailable", "ignore"]).is_err());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Settings::merge(&make_cli(&["--namespace", "Prod_1"]), CheckConfigFile::default()).is_err());
        assert!(Settings::merge(&make_cli(&["--timeout", "0"]), CheckConfigFile::default()).is_err());
        let file = CheckConfigFile {
            concurrency: Some(0),
            ..Default::default()
        };
        assert!(Settings::merge(&make_cli(&[]), file).is_err());
    }

    #[test]
    fn test_run_options() {
        let settings =
            Settings::merge(&make_cli(&["--insecure", "--concurrency", "2"]), CheckConfigFile::default())
                .unwrap();
        let opts = settings.run_options();
        assert!(opts.insecure);
        assert_eq!(opts.concurrency, 2);
        assert_eq!(opts.deadline, None);
    }
}
