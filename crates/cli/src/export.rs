//! Export of the network and its metrics
//!
//! Writes tabular files with `csv`, the metrics bundle as JSON, and
//! GraphML built by hand. Every file lands at
//! `<output.directory>/<output.prefix>_<suffix>`.

use bibnet_common::{AppConfig, AppError, Result};
use bibnet_network::analytics::k_core;
use bibnet_network::{CoauthorNetwork, MetricsBundle};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Networks above this size hand off their largest component only
pub const LARGEST_COMPONENT_CUTOFF: usize = 200;

#[derive(Serialize)]
struct AuthorRow<'a> {
    author: &'a str,
    display_name: &'a str,
    publications: usize,
    degree: usize,
    strength: u64,
    betweenness: f64,
    clustering: f64,
}

#[derive(Serialize)]
struct CollaborationRow<'a> {
    author1: &'a str,
    author2: &'a str,
    weight: u32,
    common_publications: u32,
}

/// Writes export files for one run
pub struct Exporter<'a> {
    config: &'a AppConfig,
}

impl<'a> Exporter<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }

    /// Write every data file; returns the written paths
    pub fn write_all(&self, network: &CoauthorNetwork, bundle: &MetricsBundle) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.config.output.directory)
            .map_err(|e| AppError::io(self.config.output.directory.display().to_string(), e))?;

        let mut written = vec![
            self.write_authors_csv(bundle)?,
            self.write_collaborations_csv(network)?,
            self.write_edge_list(network)?,
            self.write_graphml(&self.config.output_path("coauthorship.graphml"), network, bundle)?,
            self.write_gexf(network, bundle)?,
            self.write_metrics_json(bundle)?,
        ];

        if let Some(path) = self.write_core_handoff(network, bundle)? {
            written.push(path);
        }

        info!(files = written.len(), "Exports written");
        Ok(written)
    }

    /// One row per author with its metrics
    pub fn write_authors_csv(&self, bundle: &MetricsBundle) -> Result<PathBuf> {
        let path = self.config.output_path("authors.csv");
        let mut writer = csv::Writer::from_path(&path).map_err(|e| export_error(&path, e))?;

        for node in &bundle.nodes {
            writer
                .serialize(AuthorRow {
                    author: node.key.as_str(),
                    display_name: &node.display_name,
                    publications: node.publication_count,
                    degree: node.degree,
                    strength: node.strength,
                    betweenness: node.betweenness,
                    clustering: node.clustering,
                })
                .map_err(|e| export_error(&path, e))?;
        }
        writer.flush().map_err(|e| AppError::io(path.display().to_string(), e))?;

        debug!(path = %path.display(), rows = bundle.nodes.len(), "Author list exported");
        Ok(path)
    }

    /// One row per edge
    pub fn write_collaborations_csv(&self, network: &CoauthorNetwork) -> Result<PathBuf> {
        let path = self.config.output_path("collaborations.csv");
        let mut writer = csv::Writer::from_path(&path).map_err(|e| export_error(&path, e))?;

        for edge in network.edges() {
            writer
                .serialize(CollaborationRow {
                    author1: edge.source.as_str(),
                    author2: edge.target.as_str(),
                    weight: edge.weight,
                    common_publications: edge.weight,
                })
                .map_err(|e| export_error(&path, e))?;
        }
        writer.flush().map_err(|e| AppError::io(path.display().to_string(), e))?;

        debug!(path = %path.display(), rows = network.edge_count(), "Collaboration list exported");
        Ok(path)
    }

    /// Tab-separated `source target weight`; keys may contain spaces
    pub fn write_edge_list(&self, network: &CoauthorNetwork) -> Result<PathBuf> {
        let path = self.config.output_path("coauthorship.edgelist");
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(&path)
            .map_err(|e| export_error(&path, e))?;

        for edge in network.edges() {
            let weight = edge.weight.to_string();
            writer
                .write_record([edge.source.as_str(), edge.target.as_str(), weight.as_str()])
                .map_err(|e| export_error(&path, e))?;
        }
        writer.flush().map_err(|e| AppError::io(path.display().to_string(), e))?;

        Ok(path)
    }

    /// GraphML document for `network`, node attributes taken from `bundle`
    pub fn write_graphml(
        &self,
        path: &Path,
        network: &CoauthorNetwork,
        bundle: &MetricsBundle,
    ) -> Result<PathBuf> {
        std::fs::write(path, to_graphml(network, bundle))
            .map_err(|e| AppError::io(path.display().to_string(), e))?;
        debug!(path = %path.display(), nodes = network.node_count(), "GraphML exported");
        Ok(path.to_path_buf())
    }

    /// GEXF document for Gephi
    pub fn write_gexf(&self, network: &CoauthorNetwork, bundle: &MetricsBundle) -> Result<PathBuf> {
        let path = self.config.output_path("coauthorship.gexf");
        std::fs::write(&path, to_gexf(network, bundle))
            .map_err(|e| AppError::io(path.display().to_string(), e))?;
        debug!(path = %path.display(), nodes = network.node_count(), "GEXF exported");
        Ok(path)
    }

    pub fn write_metrics_json(&self, bundle: &MetricsBundle) -> Result<PathBuf> {
        let path = self.config.output_path("metrics.json");
        let json = serde_json::to_string_pretty(bundle)?;
        std::fs::write(&path, json).map_err(|e| AppError::io(path.display().to_string(), e))?;
        Ok(path)
    }

    /// k-core subgraph for external visualization tools, when enabled and
    /// the network is small enough
    pub fn write_core_handoff(
        &self,
        network: &CoauthorNetwork,
        bundle: &MetricsBundle,
    ) -> Result<Option<PathBuf>> {
        let output = &self.config.output;
        if !output.visualization {
            debug!("Visualization hand-off disabled");
            return Ok(None);
        }
        if network.node_count() > output.max_visual_nodes {
            info!(
                nodes = network.node_count(),
                limit = output.max_visual_nodes,
                "Network too large for visualization hand-off"
            );
            return Ok(None);
        }

        let core = if network.node_count() > LARGEST_COMPONENT_CUTOFF {
            let largest = network.largest_component();
            info!(
                nodes = network.node_count(),
                component = largest.len(),
                "Using largest connected component for visualization hand-off"
            );
            k_core(&network.subgraph(largest.iter()), self.config.analytics.kcore_k)
        } else {
            k_core(network, self.config.analytics.kcore_k)
        };

        if core.is_empty() {
            return Ok(None);
        }

        let path = self.config.output_path("core.graphml");
        self.write_graphml(&path, &core, bundle).map(Some)
    }
}

/// Undirected GraphML with author attributes and edge weights
pub fn to_graphml(network: &CoauthorNetwork, bundle: &MetricsBundle) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">
  <key id=\"display_name\" for=\"node\" attr.name=\"display_name\" attr.type=\"string\"/>
  <key id=\"publications\" for=\"node\" attr.name=\"publications\" attr.type=\"int\"/>
  <key id=\"degree\" for=\"node\" attr.name=\"degree\" attr.type=\"int\"/>
  <key id=\"strength\" for=\"node\" attr.name=\"strength\" attr.type=\"long\"/>
  <key id=\"betweenness\" for=\"node\" attr.name=\"betweenness\" attr.type=\"double\"/>
  <key id=\"clustering\" for=\"node\" attr.name=\"clustering\" attr.type=\"double\"/>
  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"int\"/>
  <graph id=\"coauthorship\" edgedefault=\"undirected\">
",
    );

    for node in network.nodes() {
        let _ = writeln!(xml, "    <node id=\"{}\">", xml_escape(node.key.as_str()));
        let _ = writeln!(
            xml,
            "      <data key=\"display_name\">{}</data>",
            xml_escape(&node.display_name)
        );
        let _ = writeln!(
            xml,
            "      <data key=\"publications\">{}</data>",
            node.publication_count
        );
        if let Some(m) = bundle.node(node.key.as_str()) {
            let _ = writeln!(xml, "      <data key=\"degree\">{}</data>", m.degree);
            let _ = writeln!(xml, "      <data key=\"strength\">{}</data>", m.strength);
            let _ = writeln!(xml, "      <data key=\"betweenness\">{}</data>", m.betweenness);
            let _ = writeln!(xml, "      <data key=\"clustering\">{}</data>", m.clustering);
        }
        xml.push_str("    </node>\n");
    }

    for (idx, edge) in network.edges().iter().enumerate() {
        let _ = writeln!(
            xml,
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">\n      <data key=\"weight\">{}</data>\n    </edge>",
            idx,
            xml_escape(edge.source.as_str()),
            xml_escape(edge.target.as_str()),
            edge.weight
        );
    }

    xml.push_str("  </graph>\n</graphml>\n");
    xml
}

/// Undirected GEXF 1.2 with the same node attributes as GraphML
pub fn to_gexf(network: &CoauthorNetwork, bundle: &MetricsBundle) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<gexf xmlns=\"http://www.gexf.net/1.2draft\" version=\"1.2\">
  <graph mode=\"static\" defaultedgetype=\"undirected\">
    <attributes class=\"node\">
      <attribute id=\"display_name\" title=\"display_name\" type=\"string\"/>
      <attribute id=\"publications\" title=\"publications\" type=\"integer\"/>
      <attribute id=\"degree\" title=\"degree\" type=\"integer\"/>
      <attribute id=\"strength\" title=\"strength\" type=\"long\"/>
      <attribute id=\"betweenness\" title=\"betweenness\" type=\"double\"/>
      <attribute id=\"clustering\" title=\"clustering\" type=\"double\"/>
    </attributes>
    <nodes>
",
    );

    for node in network.nodes() {
        let _ = writeln!(
            xml,
            "      <node id=\"{}\" label=\"{}\">\n        <attvalues>",
            xml_escape(node.key.as_str()),
            xml_escape(&node.display_name)
        );
        let _ = writeln!(
            xml,
            "          <attvalue for=\"display_name\" value=\"{}\"/>",
            xml_escape(&node.display_name)
        );
        let _ = writeln!(
            xml,
            "          <attvalue for=\"publications\" value=\"{}\"/>",
            node.publication_count
        );
        if let Some(m) = bundle.node(node.key.as_str()) {
            let _ = writeln!(xml, "          <attvalue for=\"degree\" value=\"{}\"/>", m.degree);
            let _ = writeln!(xml, "          <attvalue for=\"strength\" value=\"{}\"/>", m.strength);
            let _ = writeln!(xml, "          <attvalue for=\"betweenness\" value=\"{}\"/>", m.betweenness);
            let _ = writeln!(xml, "          <attvalue for=\"clustering\" value=\"{}\"/>", m.clustering);
        }
        xml.push_str("        </attvalues>\n      </node>\n");
    }

    xml.push_str("    </nodes>\n    <edges>\n");
    for (idx, edge) in network.edges().iter().enumerate() {
        let _ = writeln!(
            xml,
            "      <edge id=\"{}\" source=\"{}\" target=\"{}\" weight=\"{}\"/>",
            idx,
            xml_escape(edge.source.as_str()),
            xml_escape(edge.target.as_str()),
            edge.weight
        );
    }

    xml.push_str("    </edges>\n  </graph>\n</gexf>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn export_error(path: &Path, err: csv::Error) -> AppError {
    AppError::Export {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibnet_common::{AuthorKey, PublicationRecord};
    use bibnet_network::{AnalyticsEngine, NetworkBuilder};

    fn network(lists: &[&[&str]]) -> CoauthorNetwork {
        let mut builder = NetworkBuilder::new();
        for (i, authors) in lists.iter().enumerate() {
            builder.add_publication(PublicationRecord {
                key: format!("p{}", i),
                title: "T".to_string(),
                year: "2021".to_string(),
                kind: "article".to_string(),
                author_keys: authors.iter().map(|&a| AuthorKey::from(a)).collect(),
            });
        }
        builder.build()
    }

    fn config_in(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.output.directory = dir.to_path_buf();
        config.output.prefix = "test".to_string();
        config
    }

    #[test]
    fn test_write_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let network = network(&[&["Ann Lee", "Bo Chen"], &["Bo Chen", "Cy Diaz"], &["Ann Lee", "Bo Chen", "Cy Diaz"]]);
        let bundle = AnalyticsEngine::default().compute(&network);

        let written = Exporter::new(&config).write_all(&network, &bundle).unwrap();
        assert_eq!(written.len(), 7);
        assert!(dir.path().join("test_coauthorship.gexf").exists());
        assert!(written.iter().all(|p| p.exists()));

        let authors = std::fs::read_to_string(dir.path().join("test_authors.csv")).unwrap();
        let mut lines = authors.lines();
        assert_eq!(
            lines.next(),
            Some("author,display_name,publications,degree,strength,betweenness,clustering")
        );
        assert!(lines.next().unwrap_or_default().starts_with("Ann Lee,Ann Lee,2,2,3,"));

        let edges = std::fs::read_to_string(dir.path().join("test_coauthorship.edgelist")).unwrap();
        assert_eq!(edges.lines().next(), Some("Ann Lee\tBo Chen\t2"));

        let collaborations = std::fs::read_to_string(dir.path().join("test_collaborations.csv")).unwrap();
        assert!(collaborations.contains("Bo Chen,Cy Diaz,2,2"));
    }

    #[test]
    fn test_graphml_escapes_and_counts() {
        let network = network(&[&["A & B", "C <D>"]]);
        let bundle = AnalyticsEngine::default().compute(&network);
        let xml = to_graphml(&network, &bundle);

        assert!(xml.contains("<node id=\"A &amp; B\">"));
        assert!(xml.contains("source=\"A &amp; B\" target=\"C &lt;D&gt;\""));
        assert_eq!(xml.matches("<node ").count(), 2);
        assert_eq!(xml.matches("<edge ").count(), 1);
        assert!(xml.contains("edgedefault=\"undirected\""));
    }

    #[test]
    fn test_gexf_escapes_and_counts() {
        let network = network(&[&["A & B", "C <D>"], &["A & B", "C <D>", "E"]]);
        let bundle = AnalyticsEngine::default().compute(&network);
        let xml = to_gexf(&network, &bundle);

        assert!(xml.contains("defaultedgetype=\"undirected\""));
        assert!(xml.contains("<node id=\"A &amp; B\" label=\"A &amp; B\">"));
        assert!(xml.contains("source=\"A &amp; B\" target=\"C &lt;D&gt;\" weight=\"2\""));
        assert!(xml.contains("<attvalue for=\"publications\" value=\"2\"/>"));
        assert_eq!(xml.matches("<node ").count(), 3);
        assert_eq!(xml.matches("<edge ").count(), 3);
        assert!(xml.trim_end().ends_with("</gexf>"));
    }

    #[test]
    fn test_core_handoff_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        let network = network(&[&["A", "B", "C"], &["C", "D"]]);
        let bundle = AnalyticsEngine::default().compute(&network);

        config.output.visualization = false;
        assert!(Exporter::new(&config).write_core_handoff(&network, &bundle).unwrap().is_none());

        config.output.visualization = true;
        config.output.max_visual_nodes = 3;
        assert!(Exporter::new(&config).write_core_handoff(&network, &bundle).unwrap().is_none());

        config.output.max_visual_nodes = 1000;
        let path = Exporter::new(&config)
            .write_core_handoff(&network, &bundle)
            .unwrap()
            .unwrap();
        let xml = std::fs::read_to_string(path).unwrap();
        assert_eq!(xml.matches("<node ").count(), 3);
        assert!(!xml.contains("<node id=\"D\">"));
    }
}
