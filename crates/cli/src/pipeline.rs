//! End-to-end run: load, resolve, build, filter, analyze, export

use crate::export::Exporter;
use crate::report::write_report;
use bibnet_common::{AppConfig, AppError, Result};
use bibnet_ingestion::{resolve_publications, BibliographyLoader};
use bibnet_network::{build_network, AnalyticsEngine, CoauthorNetwork};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What a run produced
#[derive(Debug)]
pub enum RunOutcome {
    /// No authors left after parsing and filtering; nothing was written
    EmptyNetwork { publications: usize },
    Completed {
        nodes: usize,
        edges: usize,
        written: Vec<PathBuf>,
    },
}

/// Fail before any parsing if an input is missing
pub async fn check_inputs(files: &[PathBuf]) -> Result<()> {
    for path in files {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(AppError::InvalidArgument {
                    argument: path.display().to_string(),
                    message: "not a regular file".to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::InputNotFound {
                    path: path.display().to_string(),
                })
            }
            Err(e) => return Err(AppError::io(path.display().to_string(), e)),
        }
    }
    Ok(())
}

/// Run the whole pipeline over `files`
#[instrument(skip_all, fields(files = files.len()))]
pub async fn run(files: &[PathBuf], config: &AppConfig) -> Result<RunOutcome> {
    check_inputs(files).await?;

    let loader = BibliographyLoader::new(&config.parser);
    let parsed = loader.load_all(files).await?;
    let publications = resolve_publications(&parsed);
    let publication_count = publications.len();

    let config = config.clone();
    tokio::task::spawn_blocking(move || {
        let network = build_network(publications);
        analyze_and_export(network, &config, publication_count)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("analysis task failed: {}", e),
    })?
}

/// Filter, analyze, and export an already built network
pub fn analyze_and_export(
    network: CoauthorNetwork,
    config: &AppConfig,
    publications: usize,
) -> Result<RunOutcome> {
    let threshold = config.filter.min_publications;
    let network = if threshold > 1 {
        let filtered = network.filter_min_publications(threshold);
        info!(
            threshold,
            before = network.node_count(),
            after = filtered.node_count(),
            "Authors filtered by publication count"
        );
        filtered
    } else {
        network
    };

    if network.is_empty() {
        warn!(publications, "Network is empty, nothing to analyze");
        return Ok(RunOutcome::EmptyNetwork { publications });
    }

    let bundle = AnalyticsEngine::new(config.analytics.clone()).compute(&network);

    let mut written = Exporter::new(config).write_all(&network, &bundle)?;
    let report_path = config.output_path("coauthorship_report.md");
    written.push(write_report(&report_path, &network, &bundle, &written)?);

    Ok(RunOutcome::Completed {
        nodes: network.node_count(),
        edges: network.edge_count(),
        written,
    })
}
