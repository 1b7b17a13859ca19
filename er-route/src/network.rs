//! The graph store: intersections, closable roads and the shortcut set.
//!
//! Road `closed` flags are the only mutable state. Searches never read a [`RoadNetwork`]
//! directly; they run against a [`NetworkSnapshot`], an owned copy of the open-road topology
//! taken when the search starts.
use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use petgraph::graph::{
    DiGraph,
    EdgeIndex,
    NodeIndex,
};
use petgraph::visit::EdgeRef;
use tracing::{
    debug,
    info,
    instrument,
    warn,
};

use crate::contraction_hierarchies::ShortcutIndex;
use crate::errors::RoutingError;
use crate::model::{
    Cost,
    Edge,
    Node,
    NodeId,
    Road,
    Route,
    Shortcut,
};
use crate::query::{
    HierarchicalQuery,
    HierarchyRoute,
};
use crate::search;

/// Relative slack allowed between a shortcut's `original_cost` and the sum of its road weights.
const COST_TOLERANCE: f64 = 1e-9;

/// Read access to the open/closed state of roads, keyed by endpoint ids.
pub trait EdgeState {
    /// True iff a road `from → to` exists and is currently open.
    fn is_open(&self, from: &str, to: &str) -> bool;
}

/// Owner of the live network state.
#[derive(Clone, Debug)]
pub struct RoadNetwork {
    /// Intersections and roads; node and edge indices follow declaration order.
    graph: DiGraph<Node, Road>,
    node_to_index: HashMap<NodeId, NodeIndex>,
    /// Shared with every snapshot; shortcuts never change after construction.
    shortcuts: Arc<ShortcutIndex>,
}

fn check_cost(cost: Cost, what: impl FnOnce() -> String) -> Result<(), RoutingError> {
    if cost.into_inner().is_finite() && cost.into_inner() >= 0.0 {
        Ok(())
    } else {
        Err(RoutingError::invalid_graph(format!("{} has invalid cost {cost}", what())))
    }
}

impl RoadNetwork {
    /// Build and validate a network.
    ///
    /// Fails with [`RoutingError::InvalidGraph`] on duplicate node ids or roads, references to
    /// unknown nodes, negative or non-finite costs, or shortcuts that do not describe a chain of
    /// existing roads whose weights add up to `original_cost`.
    #[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len(), shortcuts = shortcuts.len()))]
    pub fn load_graph(nodes: Vec<Node>, edges: Vec<Edge>, shortcuts: Vec<Shortcut>) -> Result<Self, RoutingError> {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut node_to_index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if node_to_index.contains_key(&node.id) {
                return Err(RoutingError::invalid_graph(format!("duplicate node id {}", node.id)));
            }
            let id = node.id.clone();
            let idx = graph.add_node(node);
            node_to_index.insert(id, idx);
        }

        for edge in &edges {
            check_cost(edge.weight, || format!("road {} -> {}", edge.from, edge.to))?;
            let from = lookup(&node_to_index, &edge.from, "road")?;
            let to = lookup(&node_to_index, &edge.to, "road")?;
            if graph.find_edge(from, to).is_some() {
                return Err(RoutingError::invalid_graph(format!("duplicate road {} -> {}", edge.from, edge.to)));
            }
            graph.add_edge(from, to, Road::from(edge));
        }

        for shortcut in &shortcuts {
            validate_shortcut(&graph, &node_to_index, shortcut)?;
        }

        info!(nodes = graph.node_count(), roads = graph.edge_count(), shortcuts = shortcuts.len(), "network loaded");
        Ok(Self {
            graph,
            node_to_index,
            shortcuts: Arc::new(ShortcutIndex::new(shortcuts)),
        })
    }

    /// Number of intersections.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of roads, open or closed.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up an intersection by id.
    pub fn node(&self, id: &str) -> Result<&Node, RoutingError> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// All intersections in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_weights()
    }

    /// All roads in declaration order as `(from, to, state)`.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId, &Road)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()].id, &self.graph[e.target()].id, e.weight()))
    }

    /// The precomputed shortcut set.
    #[must_use]
    pub fn shortcuts(&self) -> &ShortcutIndex {
        &self.shortcuts
    }

    pub(crate) const fn graph(&self) -> &DiGraph<Node, Road> {
        &self.graph
    }

    fn index_of(&self, id: &str) -> Result<NodeIndex, RoutingError> {
        self.node_to_index
            .get(id)
            .copied()
            .ok_or_else(|| RoutingError::UnknownNode(id.into()))
    }

    /// Graph indices of a shortcut's endpoints. Shortcuts are validated against the node map at
    /// load, so both ids are present.
    pub(crate) fn shortcut_endpoints(&self, shortcut: &Shortcut) -> (NodeIndex, NodeIndex) {
        (self.node_to_index[shortcut.from.as_str()], self.node_to_index[shortcut.to.as_str()])
    }

    fn edge_index(&self, from: &str, to: &str) -> Option<EdgeIndex> {
        let from = self.node_to_index.get(from)?;
        let to = self.node_to_index.get(to)?;
        self.graph.find_edge(*from, *to)
    }

    /// Open or close the road `from → to`. Idempotent.
    ///
    /// Returns [`RoutingError::EdgeNotFound`] when no such road exists; nothing is changed in
    /// that case.
    #[instrument(skip(self))]
    pub fn set_edge_state(&mut self, from: &str, to: &str, closed: bool) -> Result<(), RoutingError> {
        let idx = self
            .edge_index(from, to)
            .ok_or_else(|| RoutingError::EdgeNotFound { from: from.into(), to: to.into() })?;

        let road = &mut self.graph[idx];
        if road.closed != closed {
            debug!(closed, "road state changed");
            road.closed = closed;
        }
        Ok(())
    }

    /// Close a road, logging and ignoring unknown roads.
    pub fn close_edge(&mut self, from: &str, to: &str) {
        self.set_edge_state_or_warn(from, to, true);
    }

    /// Reopen a road, logging and ignoring unknown roads.
    pub fn open_edge(&mut self, from: &str, to: &str) {
        self.set_edge_state_or_warn(from, to, false);
    }

    fn set_edge_state_or_warn(&mut self, from: &str, to: &str, closed: bool) {
        if let Err(err) = self.set_edge_state(from, to, closed) {
            warn!("ignoring road state change: {err}");
        }
    }

    /// Open roads leaving `id`, as `(neighbor, weight)`, in declaration order. Closed roads never
    /// appear.
    pub fn neighbors(&self, id: &str) -> Result<impl Iterator<Item = (&NodeId, Cost)> + '_, RoutingError> {
        let idx = self.index_of(id)?;
        Ok(self
            .graph
            .edges(idx)
            .filter(|e| !e.weight().closed)
            .sorted_by_key(|e| e.id())
            .map(|e| (&self.graph[e.target()].id, e.weight().weight)))
    }

    /// Roads tagged as fire-prone, in declaration order.
    pub fn fire_risk_roads(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> + '_ {
        self.edges().filter(|(_, _, road)| road.fire_risk).map(|(from, to, _)| (from, to))
    }

    /// Roads currently closed, in declaration order.
    #[must_use]
    pub fn closed_roads(&self) -> Vec<(NodeId, NodeId)> {
        self.edges()
            .filter(|(_, _, road)| road.closed)
            .map(|(from, to, _)| (from.clone(), to.clone()))
            .collect()
    }

    /// Close the first `limit` fire-prone roads and return them.
    #[instrument(skip(self))]
    pub fn close_fire_risk_roads(&mut self, limit: usize) -> Vec<(NodeId, NodeId)> {
        let burning: Vec<(EdgeIndex, NodeId, NodeId)> = self
            .graph
            .edge_references()
            .filter(|e| e.weight().fire_risk)
            .take(limit)
            .map(|e| (e.id(), self.graph[e.source()].id.clone(), self.graph[e.target()].id.clone()))
            .collect();

        burning
            .into_iter()
            .map(|(e, from, to)| {
                self.graph[e].closed = true;
                info!(%from, %to, "road closed by fire");
                (from, to)
            })
            .collect()
    }

    /// Reopen every road.
    pub fn reopen_all(&mut self) {
        for road in self.graph.edge_weights_mut() {
            road.closed = false;
        }
        debug!("all roads reopened");
    }

    /// Take an owned copy of the current open-road topology.
    #[must_use]
    pub fn snapshot(&self) -> NetworkSnapshot {
        // Every node is kept, so node indices carry over unchanged.
        let graph = self
            .graph
            .filter_map(|_, node| Some(node.id.clone()), |_, road| (!road.closed).then_some(road.weight));

        // petgraph walks a node's edges newest first; searches want declaration order.
        let mut adjacency = vec![Vec::new(); graph.node_count()];
        for e in graph.edge_references() {
            adjacency[e.source().index()].push((e.target(), *e.weight()));
        }

        NetworkSnapshot {
            graph,
            adjacency,
            node_to_index: self.node_to_index.clone(),
            shortcuts: Arc::clone(&self.shortcuts),
        }
    }

    /// Plain Dijkstra over the current open roads.
    pub fn shortest_path(&self, start: &str, end: &str) -> Result<Route, RoutingError> {
        search::shortest_path(&self.snapshot(), start, end)
    }

    /// Hierarchy query over the current open roads and usable shortcuts.
    pub fn query(&self, start: &str, end: &str) -> Result<HierarchyRoute, RoutingError> {
        HierarchicalQuery::new(&self.snapshot()).query(start, end)
    }
}

impl EdgeState for RoadNetwork {
    fn is_open(&self, from: &str, to: &str) -> bool {
        self.edge_index(from, to).is_some_and(|e| !self.graph[e].closed)
    }
}

fn lookup(node_to_index: &HashMap<NodeId, NodeIndex>, id: &str, what: &str) -> Result<NodeIndex, RoutingError> {
    node_to_index
        .get(id)
        .copied()
        .ok_or_else(|| RoutingError::invalid_graph(format!("{what} references unknown node {id}")))
}

fn validate_shortcut(
    graph: &DiGraph<Node, Road>,
    node_to_index: &HashMap<NodeId, NodeIndex>,
    shortcut: &Shortcut,
) -> Result<(), RoutingError> {
    let name = || format!("shortcut {} -> {}", shortcut.from, shortcut.to);

    check_cost(shortcut.original_cost, || format!("{} original", name()))?;
    check_cost(shortcut.shortcut_cost, name)?;
    if shortcut.shortcut_cost > shortcut.original_cost {
        return Err(RoutingError::invalid_graph(format!("{} costs more than the roads it replaces", name())));
    }
    if shortcut.via.is_empty() || shortcut.from == shortcut.to {
        return Err(RoutingError::invalid_graph(format!("{} does not skip any node", name())));
    }

    let mut total = 0.0;
    for (from, to) in shortcut.legs() {
        let from_idx = lookup(node_to_index, from, "shortcut")?;
        let to_idx = lookup(node_to_index, to, "shortcut")?;
        let road = graph
            .find_edge(from_idx, to_idx)
            .ok_or_else(|| RoutingError::invalid_graph(format!("{} uses missing road {from} -> {to}", name())))?;
        total += graph[road].weight.into_inner();
    }

    let original = shortcut.original_cost.into_inner();
    if (total - original).abs() > COST_TOLERANCE * original.max(1.0) {
        return Err(RoutingError::invalid_graph(format!(
            "{} claims original cost {original} but its roads sum to {total}",
            name()
        )));
    }
    Ok(())
}

/// Immutable copy of a network's open-road topology plus its shortcut set.
///
/// Closed roads are absent entirely, so nothing searching a snapshot can traverse one.
#[derive(Clone, Debug)]
pub struct NetworkSnapshot {
    graph: DiGraph<NodeId, Cost>,
    /// Open roads leaving each node, in declaration order.
    adjacency: Vec<Vec<(NodeIndex, Cost)>>,
    node_to_index: HashMap<NodeId, NodeIndex>,
    shortcuts: Arc<ShortcutIndex>,
}

impl NetworkSnapshot {
    /// Number of intersections.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of open roads.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Resolve a node id, failing with [`RoutingError::UnknownNode`].
    pub fn index_of(&self, id: &str) -> Result<NodeIndex, RoutingError> {
        self.node_to_index
            .get(id)
            .copied()
            .ok_or_else(|| RoutingError::UnknownNode(id.into()))
    }

    /// The id of a node index taken from this snapshot.
    #[must_use]
    pub fn id_of(&self, idx: NodeIndex) -> &NodeId {
        &self.graph[idx]
    }

    /// Open roads leaving `idx`, as `(neighbor, weight)`, in declaration order so that
    /// equal-cost routes resolve toward the road declared first.
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, Cost)> + '_ {
        self.adjacency[idx.index()].iter().copied()
    }

    /// Weight of the open road `from → to`, if there is one.
    #[must_use]
    pub fn edge_cost(&self, from: NodeIndex, to: NodeIndex) -> Option<Cost> {
        self.graph.find_edge(from, to).map(|e| self.graph[e])
    }

    /// The shortcut set this snapshot was taken with.
    #[must_use]
    pub fn shortcuts(&self) -> &ShortcutIndex {
        &self.shortcuts
    }

    /// The open-road graph itself.
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<NodeId, Cost> {
        &self.graph
    }
}

impl EdgeState for NetworkSnapshot {
    fn is_open(&self, from: &str, to: &str) -> bool {
        match (self.node_to_index.get(from), self.node_to_index.get(to)) {
            (Some(&from), Some(&to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }
}
