//! Loadable network definitions.
//!
//! A network file lists nodes, directed roads and precomputed shortcuts, in YAML or JSON:
//!
//! ```yaml
//! nodes:
//!   - { id: A, lat: 20.8849, lng: -156.6856, name: "Front St & Papalaua" }
//!   - { id: B, lat: 20.8855, lng: -156.6848 }
//! edges:
//!   - { from: A, to: B, weight: 100, fireRisk: true }
//! shortcuts: []
//! ```
use std::fs;
use std::path::Path;

use anyhow::{
    Context,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    info,
    instrument,
};

use crate::errors::RoutingError;
use crate::model::{
    Edge,
    Node,
    Shortcut,
};
use crate::network::RoadNetwork;

/// On-disk description of a road network.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Intersections; declaration order fixes node indices.
    pub nodes: Vec<Node>,
    /// Directed roads.
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Precomputed shortcuts.
    #[serde(default)]
    pub shortcuts: Vec<Shortcut>,
}

impl NetworkConfig {
    /// Parse a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("could not parse network YAML")
    }

    /// Parse a JSON document.
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("could not parse network JSON")
    }

    /// Read a network file. `.json` files are parsed as JSON first and everything else as YAML
    /// first; if the preferred format fails the other one is tried.
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json(&contents).or_else(|_| Self::from_yaml(&contents))
        } else {
            Self::from_yaml(&contents).or_else(|_| Self::from_json(&contents))
        }
        .with_context(|| format!("{} is not a valid network definition", path.display()))?;

        info!(
            nodes = config.nodes.len(),
            edges = config.edges.len(),
            shortcuts = config.shortcuts.len(),
            "network definition read"
        );
        Ok(config)
    }

    /// Validate and build the network.
    pub fn build(self) -> Result<RoadNetwork, RoutingError> {
        RoadNetwork::load_graph(self.nodes, self.edges, self.shortcuts)
    }
}

impl TryFrom<NetworkConfig> for RoadNetwork {
    type Error = RoutingError;

    fn try_from(config: NetworkConfig) -> Result<Self, Self::Error> {
        config.build()
    }
}

/// Read, validate and build a network from a file.
pub fn load_network(path: &Path) -> Result<RoadNetwork> {
    let network = NetworkConfig::from_path(path)?
        .build()
        .with_context(|| format!("{} does not describe a valid network", path.display()))?;
    Ok(network)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assertables::*;
    use rstest::rstest;

    use super::*;
    use crate::testutils::LAHAINA_YAML;

    #[rstest]
    fn test_from_yaml_lahaina() {
        let config = NetworkConfig::from_yaml(LAHAINA_YAML).unwrap();

        assert_eq!(config.nodes.len(), 20);
        assert_eq!(config.edges.len(), 26);
        assert_eq!(config.shortcuts.len(), 4);
        assert_eq!(config.edges.iter().filter(|e| e.fire_risk).count(), 3);
        assert_eq!(config.shortcuts[3].via, vec!["Q", "T", "S"]);
        assert_eq!(config.shortcuts[3].shortcut_cost.into_inner(), 320.0);
    }

    #[rstest]
    fn test_json_matches_yaml() {
        let config = NetworkConfig::from_yaml(LAHAINA_YAML).unwrap();
        let json = serde_json::to_string(&config).unwrap();

        assert_contains!(json, "\"fireRisk\":true");
        assert_contains!(json, "\"shortcutCost\":180.0");
        let parsed = NetworkConfig::from_json(&json).unwrap();
        assert_eq!(parsed.edges, config.edges);
        assert_eq!(parsed.shortcuts, config.shortcuts);
        assert_eq!(parsed.nodes.iter().map(|n| &n.id).collect::<Vec<_>>(), config.nodes.iter().map(|n| &n.id).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_from_yaml_defaults() {
        let config = NetworkConfig::from_yaml("nodes:\n  - id: A\n  - id: B\n").unwrap();

        assert_eq!(config.nodes[0], Node::bare("A"));
        assert!(config.edges.is_empty());
        assert!(config.shortcuts.is_empty());
    }

    #[rstest]
    fn test_from_yaml_garbage() {
        assert!(NetworkConfig::from_yaml("edges: 12").is_err());
    }

    #[rstest]
    #[case::json(".json")]
    #[case::yaml(".yaml")]
    fn test_load_network_from_path(#[case] suffix: &str) {
        let config = NetworkConfig::from_yaml(LAHAINA_YAML).unwrap();
        let contents = match suffix {
            ".json" => serde_json::to_string_pretty(&config).unwrap(),
            _ => LAHAINA_YAML.to_string(),
        };
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();

        let network = load_network(file.path()).unwrap();

        assert_eq!(network.node_count(), 20);
        assert_eq!(network.edge_count(), 26);
        assert_eq!(network.shortcuts().len(), 4);
    }

    #[rstest]
    fn test_load_network_json_with_yaml_extension() {
        let config = NetworkConfig::from_yaml(LAHAINA_YAML).unwrap();
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(serde_json::to_string(&config).unwrap().as_bytes()).unwrap();

        assert_eq!(NetworkConfig::from_path(file.path()).unwrap().edges, config.edges);
    }

    #[rstest]
    fn test_load_network_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"nodes: [{ id: A }]\nedges: [{ from: A, to: Z, weight: 1 }]\n").unwrap();

        let err = load_network(file.path()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<RoutingError>(),
            Some(&RoutingError::InvalidGraph("road references unknown node Z".into()))
        );
    }

    #[rstest]
    fn test_load_network_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_network(&dir.path().join("absent.yaml")).unwrap_err();

        assert_contains!(err.to_string(), "could not read");
    }
}
