use itertools::Itertools;
use petgraph::graph::{
    EdgeIndex,
    NodeIndex,
};
use petgraph::visit::EdgeRef;
use petgraph::{
    Direction,
    Graph,
};
use tracing::{
    debug,
    info,
    instrument,
    warn,
};

use crate::model::{
    Cost,
    NodeId,
    Shortcut,
};
use crate::network::NetworkSnapshot;
use crate::search::dijkstra;

/// A wrapper on a network node which lets us mark it as contracted during a particular iteration.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum CHNode {
    /// A node still present in the core graph.
    Original {
        /// The node id.
        id: NodeId,
    },
    /// A node that has been contracted during the hierarchy construction.
    Contracted {
        /// The node id.
        id: NodeId,
        /// The iteration number when the node was contracted.
        iteration: usize,
    },
}

impl CHNode {
    /// The wrapped node id.
    #[must_use]
    pub const fn id(&self) -> &NodeId {
        match self {
            Self::Original { id } | Self::Contracted { id, .. } => id,
        }
    }

    /// True once the node has left the core graph.
    #[must_use]
    pub const fn is_contracted(&self) -> bool {
        matches!(self, Self::Contracted { .. })
    }
}

/// A wrapper on a road which lets us mark it as a shortcut or as orphaned during a particular
/// iteration.
///
/// Rather than allocating a new graph on each contraction iteration, we annotate at which
/// iteration each shortcut was formed or road orphaned.
#[derive(Clone, Debug, PartialEq)]
pub enum CHEdge {
    /// An open road from the input snapshot.
    Original {
        /// Road weight.
        cost: Cost,
    },
    /// A shortcut formed by merging two edges when their shared node was contracted.
    Shortcut {
        /// Sum of the weights of every road the shortcut stands for.
        cost: Cost,
        /// The full road chain, endpoints included.
        nodes: Vec<NodeIndex>,
        /// The iteration number when the shortcut was formed.
        iteration: usize,
    },
    /// A road that has been orphaned because one of its endpoints was contracted.
    Orphaned {
        /// Road weight.
        cost: Cost,
        /// The iteration number when the road was orphaned.
        iteration: usize,
    },
}

impl CHEdge {
    /// Traversal cost of the edge.
    #[must_use]
    pub const fn cost(&self) -> Cost {
        match self {
            Self::Original { cost } | Self::Shortcut { cost, .. } | Self::Orphaned { cost, .. } => *cost,
        }
    }
}

/// Trait for determining the order in which nodes should be contracted.
pub trait ContractionHeuristic {
    /// Returns the next node to contract based on the current graph state.
    ///
    /// Should only be called after the previously returned node (if any) has been contracted.
    fn next_contraction(&mut self, graph: &Graph<CHNode, CHEdge>) -> Option<NodeIndex>;
}

impl<I> ContractionHeuristic for I
where
    I: Iterator<Item = NodeIndex>,
{
    fn next_contraction(&mut self, _graph: &Graph<CHNode, CHEdge>) -> Option<NodeIndex> {
        self.next()
    }
}

/// Edges of `node` in `direction` that still belong to the core graph, as `(neighbor, edge)`.
///
/// Skips orphaned edges, edges to contracted neighbors and self-loops. Sorted by edge index.
pub(super) fn core_edges(
    graph: &Graph<CHNode, CHEdge>,
    node: NodeIndex,
    direction: Direction,
) -> Vec<(NodeIndex, EdgeIndex)> {
    graph
        .edges_directed(node, direction)
        .map(|e| {
            let neighbor = match direction {
                Direction::Outgoing => e.target(),
                Direction::Incoming => e.source(),
            };
            (neighbor, e.id())
        })
        .filter(|&(neighbor, edge)| {
            neighbor != node && !graph[neighbor].is_contracted() && !matches!(graph[edge], CHEdge::Orphaned { .. })
        })
        .sorted_by_key(|&(_, edge)| edge)
        .collect()
}

// In the context of representing every intermediate core graph of the contraction, facing the need
// to keep memory flat, we decided for a single continuously growing graph whose nodes and edges are
// annotated with the iteration that contracted, orphaned or created them, and neglected copying
// each core graph, accepting that every witness search has to skip edges to contracted nodes.

/// Builds a shortcut set by contracting the nodes of an open-road snapshot.
///
/// Every shortcut produced costs exactly as much as the roads it stands for, so a network loaded
/// with them answers hierarchy queries at true shortest-path cost.
#[derive(Clone, Debug)]
pub struct ShortcutBuilder<H>
where
    H: ContractionHeuristic,
{
    /// The snapshot's open roads with contraction annotations.
    graph: Graph<CHNode, CHEdge>,
    /// Picks the next node to contract.
    heuristic: H,
    /// The number of contractions performed so far.
    num_contractions: usize,
}

impl<H> ShortcutBuilder<H>
where
    H: ContractionHeuristic,
{
    /// Annotate the snapshot's open roads for contraction.
    pub fn new(snapshot: &NetworkSnapshot, heuristic: H) -> Self {
        let graph = snapshot
            .graph()
            .map(|_, id| CHNode::Original { id: id.clone() }, |_, &cost| CHEdge::Original { cost });

        Self { graph, heuristic, num_contractions: 0 }
    }

    /// The number of contractions performed so far.
    #[must_use]
    pub const fn num_contractions(&self) -> usize {
        self.num_contractions
    }

    /// The annotated graph in its current state.
    #[must_use]
    pub const fn graph(&self) -> &Graph<CHNode, CHEdge> {
        &self.graph
    }

    /// Cost of the cheapest core-graph path from `x` to `y`, if one costs at most `limit`.
    fn core_distance(&self, x: NodeIndex, y: NodeIndex, limit: Cost) -> Option<Cost> {
        let graph = &self.graph;
        dijkstra(graph.node_count(), x, y, Some(limit), move |node| {
            core_edges(graph, node, Direction::Outgoing)
                .into_iter()
                .map(move |(next, edge)| (next, graph[edge].cost(), ()))
        })
        .map(|result| result.cost)
    }

    /// The road chain an edge stands for, endpoints included.
    fn chain(&self, edge: EdgeIndex) -> Vec<NodeIndex> {
        match &self.graph[edge] {
            CHEdge::Shortcut { nodes, .. } => nodes.clone(),
            CHEdge::Original { .. } | CHEdge::Orphaned { .. } => {
                self.graph.edge_endpoints(edge).map(|(s, t)| vec![s, t]).unwrap_or_default()
            },
        }
    }

    /// Contract a node, adding the shortcuts needed to preserve distances between its neighbors.
    /// Returns the number of shortcuts added or replaced.
    fn contract(&mut self, node: NodeIndex) -> usize {
        if self.graph[node].is_contracted() {
            warn!(?node, "node already contracted, skipping");
            return 0;
        }

        // First, collect all incident edges before we change any of them
        let incoming = core_edges(&self.graph, node, Direction::Incoming);
        let outgoing = core_edges(&self.graph, node, Direction::Outgoing);

        let in_out_pairs: Vec<_> = incoming
            .iter()
            .cartesian_product(outgoing.iter())
            .filter(|((x, _), (y, _))| x != y)
            .map(|(&(x, in_edge), &(y, out_edge))| {
                (x, y, in_edge, out_edge, self.graph[in_edge].cost() + self.graph[out_edge].cost())
            })
            .sorted_by_key(|&(.., cost)| cost)
            .collect();

        let iteration = self.num_contractions;
        let id = self.graph[node].id().clone();
        self.graph[node] = CHNode::Contracted { id, iteration };

        for &(_, edge) in incoming.iter().chain(&outgoing) {
            if let CHEdge::Original { cost } = self.graph[edge] {
                self.graph[edge] = CHEdge::Orphaned { cost, iteration };
            }
        }

        // witness search -- does removing `node` destroy the shortest path between x and y?
        let mut added = 0;
        for (x, y, in_edge, out_edge, cost) in in_out_pairs {
            if self.core_distance(x, y, cost).is_some() {
                continue;
            }

            let mut nodes = self.chain(in_edge);
            nodes.extend(self.chain(out_edge).into_iter().skip(1));
            let shortcut = CHEdge::Shortcut { cost, nodes, iteration };
            debug!(?x, ?y, %cost, "adding shortcut");

            // An existing core edge x → y must be dearer, or it would have been a witness.
            let existing = self
                .graph
                .edges_connecting(x, y)
                .find(|e| !matches!(e.weight(), CHEdge::Orphaned { .. }))
                .map(|e| e.id());
            match existing {
                Some(edge) => self.graph[edge] = shortcut,
                None => {
                    self.graph.add_edge(x, y, shortcut);
                },
            }
            added += 1;
        }

        self.num_contractions += 1;
        added
    }

    /// Contracts nodes until `iteration` contractions have been performed or the heuristic runs
    /// out of nodes.
    #[instrument(skip(self), fields(nodes = self.graph.node_count()))]
    pub fn contract_to(&mut self, iteration: usize) -> &mut Self {
        while self.num_contractions < iteration {
            let Some(next) = self.heuristic.next_contraction(&self.graph) else {
                debug!(contracted = self.num_contractions, "no more contractions to perform");
                break;
            };
            self.contract(next);
        }
        self
    }

    /// Contract up to `limit` nodes (every node when `None`) and return the resulting shortcuts.
    pub fn build(mut self, limit: Option<usize>) -> Vec<Shortcut> {
        let limit = limit.unwrap_or_else(|| self.graph.node_count());
        self.contract_to(limit);
        let shortcuts = self.shortcuts();
        info!(contracted = self.num_contractions, shortcuts = shortcuts.len(), "shortcut set built");
        shortcuts
    }

    /// Every shortcut formed so far, in edge order.
    #[must_use]
    pub fn shortcuts(&self) -> Vec<Shortcut> {
        self.graph
            .edge_references()
            .filter_map(|e| match e.weight() {
                CHEdge::Shortcut { cost, nodes, .. } => Some(Shortcut {
                    from: self.graph[e.source()].id().clone(),
                    to: self.graph[e.target()].id().clone(),
                    via: nodes
                        .iter()
                        .skip(1)
                        .take(nodes.len().saturating_sub(2))
                        .map(|&n| self.graph[n].id().clone())
                        .collect(),
                    original_cost: *cost,
                    shortcut_cost: *cost,
                }),
                CHEdge::Original { .. } | CHEdge::Orphaned { .. } => None,
            })
            .collect()
    }
}
