//! Markdown report

use bibnet_common::{AppError, Result};
use bibnet_network::analytics::RankedAuthor;
use bibnet_network::{CoauthorNetwork, MetricsBundle};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Rows per ranking table
const REPORT_ROWS: usize = 15;

/// Component sizes listed before the tail is summarized
const LISTED_COMPONENTS: usize = 10;

/// Render the report for a network and its metrics
pub fn render_report(
    network: &CoauthorNetwork,
    bundle: &MetricsBundle,
    exported: &[PathBuf],
) -> String {
    let mut out = String::new();
    let s = &bundle.summary;

    out.push_str("# Co-authorship Network Analysis Report\n\n");
    let _ = writeln!(
        out,
        "_Generated {}_\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
    );

    out.push_str("## Network Overview\n\n");
    let _ = writeln!(out, "- **Number of authors (nodes):** {}", s.num_nodes);
    let _ = writeln!(out, "- **Number of collaborations (edges):** {}", s.num_edges);
    let _ = writeln!(out, "- **Publications indexed:** {}", network.publication_index().len());
    let _ = writeln!(out, "- **Network density:** {:.4}", s.density);
    let _ = writeln!(out, "- **Average degree:** {:.2}", s.avg_degree);
    let _ = writeln!(out, "- **Maximum degree:** {}", s.max_degree);
    let _ = writeln!(out, "- **Average weighted degree (strength):** {:.2}", s.avg_strength);
    let _ = writeln!(out, "- **Maximum strength:** {}", s.max_strength);
    let _ = writeln!(out, "- **Average clustering coefficient:** {:.4}", s.avg_clustering);
    let _ = writeln!(out, "- **Number of connected components:** {}", s.num_components);
    let _ = writeln!(out, "- **Size of largest component:** {}", s.largest_component_size);
    if s.betweenness_exact {
        out.push_str("- **Betweenness centrality:** exact\n\n");
    } else {
        let _ = writeln!(
            out,
            "- **Betweenness centrality:** estimated from {} sampled sources\n",
            s.betweenness_sources
        );
    }

    out.push_str("## Top Authors by Degree\n\n");
    out.push_str("| Rank | Author | Degree | Publications |\n");
    out.push_str("|------|--------|--------|--------------|\n");
    for (i, ranked) in bundle.top_degree.iter().take(REPORT_ROWS).enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.0} | {} |",
            i + 1,
            ranked.display_name,
            ranked.value,
            publications(bundle, ranked)
        );
    }
    out.push('\n');

    out.push_str("## Top Authors by Collaboration Strength\n\n");
    out.push_str("| Rank | Author | Strength | Publications |\n");
    out.push_str("|------|--------|----------|--------------|\n");
    for (i, ranked) in bundle.top_strength.iter().take(REPORT_ROWS).enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.0} | {} |",
            i + 1,
            ranked.display_name,
            ranked.value,
            publications(bundle, ranked)
        );
    }
    out.push('\n');

    out.push_str("## Most Central Authors (Betweenness Centrality)\n\n");
    out.push_str("| Rank | Author | Betweenness |\n");
    out.push_str("|------|--------|-------------|\n");
    for (i, ranked) in bundle.top_betweenness.iter().take(REPORT_ROWS).enumerate() {
        let _ = writeln!(out, "| {} | {} | {:.4} |", i + 1, ranked.display_name, ranked.value);
    }
    out.push('\n');

    out.push_str("## Strongest Collaborations\n\n");
    out.push_str("| Rank | Author 1 | Author 2 | Joint Publications |\n");
    out.push_str("|------|----------|----------|--------------------|\n");
    for (i, collab) in bundle.top_collaborations.iter().take(REPORT_ROWS).enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            i + 1,
            network.display_name(&collab.source),
            network.display_name(&collab.target),
            collab.weight
        );
    }
    out.push('\n');

    out.push_str("## Network Components\n\n");
    let _ = writeln!(out, "- **Total components:** {}", s.num_components);
    let listed: Vec<String> = s
        .component_sizes
        .iter()
        .take(LISTED_COMPONENTS)
        .map(usize::to_string)
        .collect();
    let _ = write!(out, "- **Component sizes:** {}", listed.join(", "));
    if s.component_sizes.len() > LISTED_COMPONENTS {
        let _ = write!(
            out,
            ", ... ({} more)",
            s.component_sizes.len() - LISTED_COMPONENTS
        );
    }
    out.push_str("\n\n");

    if !exported.is_empty() {
        out.push_str("## Exported Files\n\n");
        for path in exported {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let _ = writeln!(out, "- `{}`", name);
        }
    }

    out
}

/// Render and write the report to `path`
pub fn write_report(
    path: &Path,
    network: &CoauthorNetwork,
    bundle: &MetricsBundle,
    exported: &[PathBuf],
) -> Result<PathBuf> {
    std::fs::write(path, render_report(network, bundle, exported))
        .map_err(|e| AppError::io(path.display().to_string(), e))?;
    Ok(path.to_path_buf())
}

fn publications(bundle: &MetricsBundle, ranked: &RankedAuthor) -> usize {
    bundle
        .node(ranked.key.as_str())
        .map(|m| m.publication_count)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibnet_common::{AuthorKey, PublicationRecord};
    use bibnet_network::{AnalyticsEngine, NetworkBuilder};

    fn network(lists: &[Vec<String>]) -> CoauthorNetwork {
        let mut builder = NetworkBuilder::new();
        for (i, authors) in lists.iter().enumerate() {
            builder.add_publication(PublicationRecord {
                key: format!("p{}", i),
                title: "T".to_string(),
                year: "2021".to_string(),
                kind: "article".to_string(),
                author_keys: authors.iter().map(|a| AuthorKey::new(a.clone())).collect(),
            });
        }
        builder.build()
    }

    fn authors(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_report_sections() {
        let network = network(&[
            authors(&["Ann Lee", "Bo Chen"]),
            authors(&["Bo Chen", "Cy Diaz"]),
            authors(&["Ann Lee", "Bo Chen", "Cy Diaz"]),
        ]);
        let bundle = AnalyticsEngine::default().compute(&network);
        let report = render_report(&network, &bundle, &[PathBuf::from("out/x_authors.csv")]);

        assert!(report.starts_with("# Co-authorship Network Analysis Report"));
        assert!(report.contains("- **Number of authors (nodes):** 3"));
        assert!(report.contains("- **Network density:** 1.0000"));
        assert!(report.contains("- **Betweenness centrality:** exact"));
        // Degree ties keep node order; Bo leads on strength
        assert!(report.contains("| 1 | Ann Lee | 2 | 2 |"));
        assert!(report.contains("| 1 | Bo Chen | 4 | 3 |"));
        assert!(report.contains("| 1 | Ann Lee | Bo Chen | 2 |"));
        assert!(report.contains("- **Component sizes:** 3\n"));
        assert!(report.contains("- `x_authors.csv`"));
    }

    #[test]
    fn test_component_tail_summarized() {
        let lists: Vec<Vec<String>> = (0..13)
            .map(|i| vec![format!("A{}", i), format!("B{}", i)])
            .collect();
        let network = network(&lists);
        let bundle = AnalyticsEngine::default().compute(&network);
        let report = render_report(&network, &bundle, &[]);

        assert!(report.contains("- **Total components:** 13"));
        assert!(report.contains("2, 2, 2, 2, 2, 2, 2, 2, 2, 2, ... (3 more)"));
        assert!(!report.contains("## Exported Files"));
    }
}
