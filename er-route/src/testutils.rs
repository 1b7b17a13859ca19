#![allow(missing_docs)]
//! Fixtures shared by tests across the workspace.
use rstest::fixture;

use crate::config::NetworkConfig;
use crate::model::{
    Edge,
    Node,
    Shortcut,
};
use crate::network::RoadNetwork;

/// The Lahaina evacuation network shipped in `data/`.
pub const LAHAINA_YAML: &str = include_str!("../../data/lahaina.yaml");

#[fixture]
pub fn lahaina() -> RoadNetwork {
    NetworkConfig::from_yaml(LAHAINA_YAML).unwrap().build().unwrap()
}

pub fn shortcut(from: &str, via: &[&str], to: &str, original_cost: f64, shortcut_cost: f64) -> Shortcut {
    Shortcut {
        from: from.into(),
        to: to.into(),
        via: via.iter().map(|&id| id.into()).collect(),
        original_cost: original_cost.into(),
        shortcut_cost: shortcut_cost.into(),
    }
}

/// A → B → C → D → E → F with a discounted shortcut B → D via C.
#[fixture]
pub fn six_node_chain() -> RoadNetwork {
    let nodes = ["A", "B", "C", "D", "E", "F"].map(Node::bare).to_vec();
    let edges = vec![
        Edge::new("A", "B", 100.0),
        Edge::new("B", "C", 80.0),
        Edge::new("C", "D", 120.0).with_fire_risk(),
        Edge::new("D", "E", 90.0),
        Edge::new("E", "F", 70.0),
    ];
    RoadNetwork::load_graph(nodes, edges, vec![shortcut("B", &["C"], "D", 200.0, 180.0)]).unwrap()
}

/// Random directed network with `num_nodes` nodes (`n0`, `n1`, …) and up to `num_edges` distinct
/// roads. Road weights are distinct powers of two, so every simple path has a unique cost and
/// shortest paths are unique.
#[cfg(test)]
pub fn random_network<R: rand::Rng>(rng: &mut R, num_nodes: usize, num_edges: usize) -> RoadNetwork {
    use rand::seq::SliceRandom;

    assert!(num_edges < 52, "weights must stay exactly representable");
    let nodes: Vec<Node> = (0..num_nodes).map(|i| Node::bare(format!("n{i}"))).collect();

    let mut pairs: Vec<(usize, usize)> = (0..num_nodes)
        .flat_map(|from| (0..num_nodes).map(move |to| (from, to)))
        .filter(|(from, to)| from != to)
        .collect();
    pairs.shuffle(rng);
    pairs.truncate(num_edges);

    let mut exponents: Vec<i32> = (0..).take(pairs.len()).collect();
    exponents.shuffle(rng);

    let edges = pairs
        .into_iter()
        .zip(exponents)
        .map(|((from, to), exponent)| Edge::new(format!("n{from}"), format!("n{to}"), 2f64.powi(exponent)))
        .collect();
    RoadNetwork::load_graph(nodes, edges, vec![]).unwrap()
}
