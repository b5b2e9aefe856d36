mod settings;

use clap::Parser;
use pkg_collectors::run_check;
use pkg_report::{RenderOptions, render_json, render_text};
use pkg_source::{ClusterSource, FixtureSource, KubectlSource};
use pkg_types::config::{CheckConfigFile, load_config_file};
use settings::{Cli, OutputFormat, Settings};
use std::io::IsTerminal;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Run one check and print the report. Returns whether the cluster is healthy.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    // Load config file (returns defaults if file not found)
    let file_cfg: CheckConfigFile = match cli.config_path() {
        Some(path) => {
            info!("Config file: {}", path.display());
            load_config_file(&path)?
        }
        None => CheckConfigFile::default(),
    };
    let settings = Settings::merge(&cli, file_cfg)?;

    let source: Box<dyn ClusterSource> = match &cli.fixture {
        Some(path) => Box::new(FixtureSource::from_path(path)?),
        None => Box::new(
            KubectlSource::new(settings.context.clone())
                .with_binaries(&settings.kubectl, &settings.helm),
        ),
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling check");
            on_signal.cancel();
        }
    });

    let report = run_check(source.as_ref(), &settings.run_options(), &cancel).await?;

    match cli.output {
        OutputFormat::Json => println!("{}", render_json(&report)?),
        OutputFormat::Text => {
            let opts = RenderOptions {
                verbose: cli.verbose,
                color: !cli.no_color && std::io::stdout().is_terminal(),
            };
            print!("{}", render_text(&report, opts));
        }
    }

    Ok(report.is_healthy())
}
