//! Configuration management for BibNet
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with BIBNET__)
//! - Configuration files (config/default.toml, config/{env}.toml, config/local.toml)
//! - An explicit file passed on the command line
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Record parser configuration
    #[serde(default)]
    pub parser: ParserConfig,

    /// Analytics engine configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Author filtering configuration
    #[serde(default)]
    pub filter: FilterConfig,

    /// Export configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParserConfig {
    /// Lines starting with this marker are skipped
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    /// Largest node count for which betweenness is computed exactly
    #[serde(default = "default_exact_threshold")]
    pub betweenness_exact_threshold: usize,

    /// Number of sampled source nodes above the exact threshold
    #[serde(default = "default_sample_size")]
    pub betweenness_sample_size: usize,

    /// Seed for source sampling, so estimates are reproducible
    #[serde(default = "default_sample_seed")]
    pub sample_seed: u64,

    /// Length of every top-N ranking
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Core order for k-core extraction (None = graph degeneracy)
    #[serde(default)]
    pub kcore_k: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Authors with fewer publications are removed before analysis
    #[serde(default = "default_min_publications")]
    pub min_publications: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Prefix for every exported file
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Directory exported files are written to
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Write the visualization hand-off (k-core subgraph)
    #[serde(default = "default_enabled")]
    pub visualization: bool,

    /// Networks above this size get no visualization hand-off
    #[serde(default = "default_max_visual_nodes")]
    pub max_visual_nodes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logging: bool,

    /// Write a Prometheus exposition snapshot next to the exports
    #[serde(default)]
    pub metrics_snapshot: bool,
}

// Default value functions
fn default_comment_marker() -> String { "%".to_string() }
fn default_exact_threshold() -> usize { 500 }
fn default_sample_size() -> usize { 100 }
fn default_sample_seed() -> u64 { 42 }
fn default_top_n() -> usize { 20 }
fn default_min_publications() -> usize { 1 }
fn default_prefix() -> String { "coauthorship".to_string() }
fn default_directory() -> PathBuf { PathBuf::from(".") }
fn default_enabled() -> bool { true }
fn default_max_visual_nodes() -> usize { 1000 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            comment_marker: default_comment_marker(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            betweenness_exact_threshold: default_exact_threshold(),
            betweenness_sample_size: default_sample_size(),
            sample_seed: default_sample_seed(),
            top_n: default_top_n(),
            kcore_k: None,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_publications: default_min_publications(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            directory: default_directory(),
            visualization: default_enabled(),
            max_visual_nodes: default_max_visual_nodes(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: false,
            metrics_snapshot: false,
        }
    }
}

impl AppConfig {
    /// Load configuration, layering an explicit file over the default sources
    pub fn load_with(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env = std::env::var("BIBNET_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Load from environment variables with BIBNET__ prefix
            // e.g., BIBNET__FILTER__MIN_PUBLICATIONS=2
            .add_source(
                Environment::with_prefix("BIBNET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific file only (plus environment overrides)
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("BIBNET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Path of an exported file: `<directory>/<prefix>_<suffix>`
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        self.output
            .directory
            .join(format!("{}_{}", self.output.prefix, suffix))
    }
}
