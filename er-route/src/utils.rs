//! DOT rendering of a network for visual inspection.
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use anyhow::Result;
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;
use tracing::{
    debug,
    instrument,
};

use crate::contraction_hierarchies::ShortcutIndex;
use crate::network::RoadNetwork;

/// How an edge is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    Open,
    FireRisk,
    Closed,
    Shortcut,
    InvalidShortcut,
}

impl Style {
    const fn attributes(self) -> &'static str {
        match self {
            Self::Open => "color=gray40",
            Self::FireRisk => "color=orange penwidth=2",
            Self::Closed => "color=red style=dotted",
            Self::Shortcut => "color=green style=dashed",
            Self::InvalidShortcut => "color=red style=dashed",
        }
    }
}

struct DotEdge {
    label: String,
    style: Style,
}

impl fmt::Display for DotEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Render the live network, shortcuts included, as a DOT digraph.
///
/// Closed roads and shortcuts they invalidate are drawn in red.
#[must_use]
pub fn network_to_dot(network: &RoadNetwork) -> String {
    let mut graphable: DiGraph<String, DotEdge> = network.graph().map(
        |_, node| format!("{} ({})", node.id, node.label()),
        |_, road| DotEdge {
            label: format!("{}", road.weight),
            style: match (road.closed, road.fire_risk) {
                (true, _) => Style::Closed,
                (false, true) => Style::FireRisk,
                (false, false) => Style::Open,
            },
        },
    );

    for shortcut in network.shortcuts().as_slice() {
        let style = if ShortcutIndex::is_valid(shortcut, network) {
            Style::Shortcut
        } else {
            Style::InvalidShortcut
        };
        let label = format!("{} via {}", shortcut.shortcut_cost, shortcut.via.join(","));
        let (from, to) = network.shortcut_endpoints(shortcut);
        graphable.add_edge(from, to, DotEdge { label, style });
    }

    let dot = Dot::with_attr_getters(
        &graphable,
        &[],
        &|_, edge| edge.weight().style.attributes().to_string(),
        &|_, _| String::new(),
    );
    format!("{dot}")
}

/// Write DOT graph description to a file within `output_dir` and return the path.
#[instrument(skip(dot_content))]
pub fn write_dot_file(output_dir: &Path, filename: &str, dot_content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let file_path = output_dir.join(filename);
    let mut file = File::create(&file_path)?;
    write!(file, "{dot_content}")?;

    debug!("Graph written to: {}", file_path.display());
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::rstest;

    use super::*;
    use crate::testutils::lahaina;

    #[rstest]
    fn test_network_to_dot(mut lahaina: RoadNetwork) {
        lahaina.close_edge("C", "D");
        let dot = network_to_dot(&lahaina);

        assert!(dot.starts_with("digraph {"));
        assert_contains!(dot, "A (Front St & Papalaua (Start))");
        assert_contains!(dot, "color=red style=dotted");
        assert_contains!(dot, "color=red style=dashed");
        assert_contains!(dot, "color=green style=dashed");
    }

    #[rstest]
    fn test_network_to_dot_shortcut_endpoints(lahaina: RoadNetwork) {
        let dot = network_to_dot(&lahaina);

        // B = 1, D = 3, P = 15, R = 17 in declaration order.
        assert_contains!(dot, "1 -> 3 [ label = \"180 via C\"");
        assert_contains!(dot, "15 -> 17 [ label = \"320 via Q,T,S\"");
        assert_eq!(dot.matches("style=dashed").count(), 4);
    }

    #[rstest]
    fn test_write_dot_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("graphs");

        let path = write_dot_file(&output_dir, "lahaina.dot", "digraph {}").unwrap();

        assert_eq!(path, output_dir.join("lahaina.dot"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "digraph {}");
    }
}
