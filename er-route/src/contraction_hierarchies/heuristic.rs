use itertools::Itertools;
use petgraph::graph::{
    Graph,
    NodeIndex,
};
use petgraph::Direction;

use super::builder::{
    core_edges,
    CHEdge,
    CHNode,
    ContractionHeuristic,
};

/// Contract the core node with the smallest edge difference next.
///
/// The edge difference of a node is the number of shortcuts its contraction could add (one per
/// in-neighbor/out-neighbor pair, before any witness search) minus the number of core edges it
/// removes. Ties go to the lowest node index. Recomputed from the current core graph on every
/// call, so earlier contractions shape later choices.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDifference;

impl EdgeDifference {
    /// Edge difference of `node` in the current core graph.
    #[allow(clippy::cast_possible_wrap)] // degrees of a road network are nowhere near isize::MAX
    #[must_use]
    pub fn score(graph: &Graph<CHNode, CHEdge>, node: NodeIndex) -> isize {
        let incoming = core_edges(graph, node, Direction::Incoming);
        let outgoing = core_edges(graph, node, Direction::Outgoing);

        let added = incoming
            .iter()
            .cartesian_product(&outgoing)
            .filter(|((x, _), (y, _))| x != y)
            .count();
        added as isize - (incoming.len() + outgoing.len()) as isize
    }
}

impl ContractionHeuristic for EdgeDifference {
    fn next_contraction(&mut self, graph: &Graph<CHNode, CHEdge>) -> Option<NodeIndex> {
        graph
            .node_indices()
            .filter(|&node| !graph[node].is_contracted())
            .min_by_key(|&node| Self::score(graph, node))
    }
}
