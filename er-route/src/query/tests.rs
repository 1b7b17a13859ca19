use assertables::*;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::model::{
    Edge,
    Node,
};
use crate::network::RoadNetwork;
use crate::testutils::{
    lahaina,
    shortcut,
    six_node_chain,
};

fn ids(path: &[&str]) -> Vec<NodeId> {
    path.iter().map(|&id| id.into()).collect()
}

#[rstest]
fn test_query_takes_discounted_shortcut(six_node_chain: RoadNetwork) {
    let snapshot = six_node_chain.snapshot();
    let result = HierarchicalQuery::new(&snapshot).query("A", "F").unwrap();

    assert_eq!(result.route.cost.into_inner(), 440.0);
    assert_eq!(result.route.path, ids(&["A", "B", "D", "E", "F"]));
    assert_eq!(result.expanded_path, ids(&["A", "B", "C", "D", "E", "F"]));
    assert_eq!(result.tier, Tier::Shortcut);
    assert_eq!(result.shortcuts_used, vec![shortcut("B", &["C"], "D", 200.0, 180.0)]);
    assert_eq!(result.route.nodes_visited, 6);
}

#[rstest]
fn test_query_closed_leg_disables_shortcut(mut six_node_chain: RoadNetwork) {
    six_node_chain.close_edge("C", "D");
    let snapshot = six_node_chain.snapshot();
    let engine = HierarchicalQuery::new(&snapshot);

    assert_eq!(engine.query("A", "F").unwrap_err(), RoutingError::no_path("A", "F"));
    assert!(engine.usable_shortcuts().is_empty());
    assert_eq!(engine.invalidated_shortcuts(), vec![&shortcut("B", &["C"], "D", 200.0, 180.0)]);

    // Still reachable without the shortcut.
    let result = engine.query("A", "C").unwrap();
    assert_eq!(result.tier, Tier::Fallback);
    assert_eq!(result.route.cost.into_inner(), 180.0);
}

#[rstest]
fn test_query_reopened_road_restores_shortcut(mut six_node_chain: RoadNetwork) {
    six_node_chain.close_edge("C", "D");
    six_node_chain.open_edge("C", "D");

    let result = six_node_chain.query("A", "F").unwrap();
    assert_eq!(result.tier, Tier::Shortcut);
    assert_eq!(result.route.cost.into_inner(), 440.0);
}

#[rstest]
fn test_query_lahaina_open(lahaina: RoadNetwork) {
    let result = lahaina.query("A", "F").unwrap();

    assert_eq!(result.route.cost.into_inner(), 440.0);
    assert_eq!(result.route.path, ids(&["A", "B", "D", "E", "F"]));
    assert_eq!(result.expanded_path, ids(&["A", "B", "C", "D", "E", "F"]));
    assert_eq!(result.tier, Tier::Shortcut);
    // Both searches end up settling the whole network before F.
    assert_eq!(result.route.nodes_visited, 20);
    assert_eq!(lahaina.shortest_path("A", "F").unwrap().nodes_visited, 20);
}

#[rstest]
#[case::open_to_d(&[], "A", "D", 14, 13)]
#[case::fire_to_n(&[("C", "D"), ("H", "I"), ("I", "M")], "A", "N", 11, 10)]
fn test_query_settles_fewer_nodes_on_lahaina(
    mut lahaina: RoadNetwork,
    #[case] closed: &[(&str, &str)],
    #[case] start: &str,
    #[case] end: &str,
    #[case] dijkstra_visited: usize,
    #[case] hierarchy_visited: usize,
) {
    for (from, to) in closed {
        lahaina.close_edge(from, to);
    }

    let full = lahaina.shortest_path(start, end).unwrap();
    let hier = lahaina.query(start, end).unwrap();

    assert_eq!(hier.tier, Tier::Shortcut);
    assert_eq!(full.nodes_visited, dijkstra_visited);
    assert_eq!(hier.route.nodes_visited, hierarchy_visited);
}

#[rstest]
fn test_query_long_shortcut_skips_chain() {
    let names = ["A", "B", "C", "D", "E", "F"];
    let roads = names.windows(2).map(|pair| Edge::new(pair[0], pair[1], 10.0)).collect();
    let network = RoadNetwork::load_graph(
        names.map(Node::bare).to_vec(),
        roads,
        vec![shortcut("A", &["B", "C", "D", "E"], "F", 50.0, 20.0)],
    )
    .unwrap();

    let full = network.shortest_path("A", "F").unwrap();
    let hier = network.query("A", "F").unwrap();

    assert_eq!(full.nodes_visited, 6);
    assert_eq!(hier.route.nodes_visited, 3);
    assert_lt!(hier.route.nodes_visited, full.nodes_visited);
    assert_eq!(hier.route.path, ids(&["A", "F"]));
}

#[rstest]
fn test_query_lahaina_fire(mut lahaina: RoadNetwork) {
    lahaina.close_fire_risk_roads(3);
    let snapshot = lahaina.snapshot();
    let engine = HierarchicalQuery::new(&snapshot);

    let result = engine.query("A", "F").unwrap();
    assert_eq!(result.route.cost.into_inner(), 475.0);
    assert_eq!(result.route.path, ids(&["A", "G", "H", "L", "N", "O", "F"]));
    assert_eq!(result.expanded_path, ids(&["A", "G", "H", "L", "M", "N", "O", "F"]));
    assert_eq!(result.shortcuts_used, vec![shortcut("L", &["M"], "N", 105.0, 95.0)]);

    let invalidated: Vec<(&str, &str)> =
        engine.invalidated_shortcuts().iter().map(|s| (s.from.as_str(), s.to.as_str())).collect();
    assert_eq!(invalidated, vec![("B", "D"), ("H", "J")]);
    assert_eq!(engine.usable_shortcuts().len(), 2);
}

#[rstest]
fn test_query_without_shortcut_is_fallback(lahaina: RoadNetwork) {
    let result = lahaina.query("A", "G").unwrap();

    assert_eq!(result.tier, Tier::Fallback);
    assert_eq!(result.route.cost.into_inner(), 60.0);
    assert_eq!(result.expanded_path, result.route.path);
    assert!(result.shortcuts_used.is_empty());
}

#[rstest]
fn test_query_same_node(six_node_chain: RoadNetwork) {
    let result = six_node_chain.query("D", "D").unwrap();

    assert_eq!(result.route.cost.into_inner(), 0.0);
    assert_eq!(result.route.path, ids(&["D"]));
    assert_eq!(result.expanded_path, ids(&["D"]));
    assert_eq!(result.tier, Tier::Fallback);
}

#[rstest]
#[case::start("Z", "F")]
#[case::end("A", "Z")]
fn test_query_unknown_node(six_node_chain: RoadNetwork, #[case] start: &str, #[case] end: &str) {
    assert_eq!(six_node_chain.query(start, end).unwrap_err(), RoutingError::UnknownNode("Z".into()));
}

#[rstest]
fn test_query_snapshot_is_isolated(mut six_node_chain: RoadNetwork) {
    let snapshot = six_node_chain.snapshot();
    six_node_chain.close_edge("C", "D");

    let engine = HierarchicalQuery::new(&snapshot);
    assert_eq!(engine.query("A", "F").unwrap().route.cost.into_inner(), 440.0);
    assert_err!(six_node_chain.query("A", "F"));
}

#[rstest]
fn test_query_many_preserves_order(lahaina: RoadNetwork) {
    let snapshot = lahaina.snapshot();
    let engine = HierarchicalQuery::new(&snapshot);
    let pairs: Vec<(NodeId, NodeId)> =
        [("A", "F"), ("A", "Z"), ("A", "G"), ("F", "A")].map(|(s, e)| (s.into(), e.into())).to_vec();

    let results = engine.query_many(&pairs);

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().route.cost.into_inner(), 440.0);
    assert_eq!(results[1].as_ref().unwrap_err(), &RoutingError::UnknownNode("Z".into()));
    assert_eq!(results[2].as_ref().unwrap().route.cost.into_inner(), 60.0);
    assert_eq!(results[3].as_ref().unwrap_err(), &RoutingError::no_path("F", "A"));
    for ((start, end), result) in pairs.iter().zip(&results) {
        assert_eq!(result, &engine.query(start, end));
    }
}

#[rstest]
fn test_query_serializes_camel_case(six_node_chain: RoadNetwork) {
    let value = serde_json::to_value(six_node_chain.query("A", "F").unwrap()).unwrap();

    assert_eq!(value["cost"], json!(440.0));
    assert_eq!(value["tier"], json!("shortcut"));
    assert_eq!(value["nodesVisited"], json!(6));
    assert_eq!(value["expandedPath"], json!(["A", "B", "C", "D", "E", "F"]));
    assert_eq!(value["shortcutsUsed"][0]["shortcutCost"], json!(180.0));
}
