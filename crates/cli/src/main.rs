//! BibNet command line
//!
//! Builds a co-authorship network from BibTeX files and writes:
//! - Author and collaboration tables (CSV)
//! - Edge list and GraphML exports
//! - The metrics bundle as JSON
//! - A Markdown report
//!
//! Logs go to stderr; stdout only lists the written files.

mod export;
mod pipeline;
mod report;

use bibnet_common::config::ObservabilityConfig;
use bibnet_common::errors::ErrorDetails;
use bibnet_common::metrics::{self, ANALYTICS_BUCKETS, METRICS_PREFIX, PARSE_BUCKETS};
use bibnet_common::{AppConfig, AppError, Result};
use clap::Parser;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use pipeline::RunOutcome;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Create a co-authorship network from BibTeX files
#[derive(Parser, Debug)]
#[command(name = "bibnet")]
#[command(version)]
struct Args {
    /// BibTeX files to analyze
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output prefix; a directory part selects the output directory
    #[arg(short, long)]
    output: Option<String>,

    /// Skip the visualization hand-off
    #[arg(long)]
    no_viz: bool,

    /// Drop authors with fewer publications
    #[arg(long, env = "BIBNET_MIN_PUBLICATIONS")]
    min_publications: Option<usize>,

    /// Configuration file layered over the defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
    };

    init_tracing(&config.observability);
    info!("Starting BibNet v{}", bibnet_common::VERSION);

    match execute(&args.files, &config).await {
        Ok(RunOutcome::Completed {
            nodes,
            edges,
            written,
        }) => {
            info!(nodes, edges, files = written.len(), "Analysis complete");
            for path in &written {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::EmptyNetwork { publications }) => {
            eprintln!(
                "No authors left to analyze ({} publications with authors found); nothing written",
                publications
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let details = ErrorDetails::from(&e);
            error!(code = details.numeric_code, error = %details.message, "Run failed");
            eprintln!("Error: {}", e);
            exit_code(&e)
        }
    }
}

/// Run the pipeline, with a metrics snapshot when enabled
async fn execute(files: &[PathBuf], config: &AppConfig) -> Result<RunOutcome> {
    let handle = if config.observability.metrics_snapshot {
        Some(install_metrics_recorder()?)
    } else {
        None
    };
    metrics::register_metrics();

    let mut outcome = pipeline::run(files, config).await?;

    if let (Some(handle), RunOutcome::Completed { written, .. }) = (handle, &mut outcome) {
        written.push(write_metrics_snapshot(&handle, config)?);
    }

    Ok(outcome)
}

/// Layer configuration sources, then apply command line overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::load_with(args.config.as_deref())?;

    if let Some(prefix) = &args.output {
        apply_output_prefix(&mut config, prefix)?;
    }
    if args.no_viz {
        config.output.visualization = false;
    }
    if let Some(min) = args.min_publications {
        config.filter.min_publications = min;
    }

    Ok(config)
}

/// `-o results/lab` writes `results/lab_*`
fn apply_output_prefix(config: &mut AppConfig, prefix: &str) -> Result<()> {
    let path = Path::new(prefix);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::InvalidArgument {
            argument: "--output".to_string(),
            message: format!("'{}' has no file name part", prefix),
        })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        config.output.directory = parent.to_path_buf();
    }
    config.output.prefix = name;
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logging {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn install_metrics_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_parse_duration_seconds", METRICS_PREFIX)),
            PARSE_BUCKETS,
        )
        .and_then(|b| {
            b.set_buckets_for_metric(
                Matcher::Full(format!("{}_analytics_duration_seconds", METRICS_PREFIX)),
                ANALYTICS_BUCKETS,
            )
        })
        .and_then(|b| b.install_recorder())
        .map_err(anyhow::Error::from)?;
    Ok(handle)
}

fn write_metrics_snapshot(handle: &PrometheusHandle, config: &AppConfig) -> Result<PathBuf> {
    let path = config.output_path("metrics.prom");
    std::fs::write(&path, handle.render())
        .map_err(|e| AppError::io(path.display().to_string(), e))?;
    Ok(path)
}

fn exit_code(err: &AppError) -> ExitCode {
    ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
}
