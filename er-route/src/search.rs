//! Single-source shortest paths (Dijkstra) over open roads.
//!
//! [`dijkstra`] is shared by every engine in the crate: the plain engine feeds it open roads, the
//! hierarchy engine feeds it open roads plus usable shortcuts, and the shortcut builder feeds it the
//! remaining core graph. Callers choose what an edge is by the `successors` closure and tag each
//! edge with a label that comes back on the reconstructed path.
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;
use tracing::{
    debug,
    instrument,
};

use crate::errors::RoutingError;
use crate::model::{
    Cost,
    Route,
};
use crate::network::NetworkSnapshot;

/// Frontier entry.
///
/// `BinaryHeap` is a max-heap, so the ordering is reversed: the smallest tentative cost pops first
/// and, among equal costs, the entry pushed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HeapItem {
    cost: Cost,
    seq: usize,
    node: NodeIndex,
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A settled path in index space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult<L> {
    /// Total cost from the source to the target.
    pub cost: Cost,
    /// Node indices from source to target, inclusive.
    pub path: Vec<NodeIndex>,
    /// `hops[i]` is the label of the edge `path[i] → path[i + 1]`.
    pub hops: Vec<L>,
    /// Nodes permanently settled before the search stopped, target included.
    pub settled: usize,
}

impl<L> SearchResult<L> {
    /// Translate the index path into node ids.
    #[must_use]
    pub fn to_route(&self, snapshot: &NetworkSnapshot) -> Route {
        Route {
            cost: self.cost,
            path: self.path.iter().map(|&idx| snapshot.id_of(idx).clone()).collect(),
            nodes_visited: self.settled,
        }
    }
}

/// Dijkstra from `source` until `target` is settled.
///
/// `successors(node)` yields `(next, weight, label)` for every edge the caller wants traversable
/// from `node`; weights must be non-negative. Stops early (returning `None`) once the cheapest
/// frontier entry exceeds `limit`, if one is given. Equal-cost entries are settled in the order
/// they were pushed, and a node's predecessor only changes on a strictly cheaper relaxation, so
/// results are deterministic.
pub fn dijkstra<L, F, I>(
    node_count: usize,
    source: NodeIndex,
    target: NodeIndex,
    limit: Option<Cost>,
    mut successors: F,
) -> Option<SearchResult<L>>
where
    L: Copy,
    F: FnMut(NodeIndex) -> I,
    I: IntoIterator<Item = (NodeIndex, Cost, L)>,
{
    let mut best: Vec<Option<Cost>> = vec![None; node_count];
    let mut predecessors: Vec<Option<(NodeIndex, L)>> = vec![None; node_count];
    let mut settled = vec![false; node_count];
    let mut settled_count = 0;
    let mut seq = 0;
    let mut heap = BinaryHeap::new();

    best[source.index()] = Some(OrderedFloat(0.0));
    heap.push(HeapItem { cost: OrderedFloat(0.0), seq, node: source });

    while let Some(HeapItem { cost, node, .. }) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        if limit.is_some_and(|limit| cost > limit) {
            break;
        }
        settled[node.index()] = true;
        settled_count += 1;

        if node == target {
            return Some(reconstruct(source, target, cost, &predecessors, settled_count));
        }

        for (next, weight, label) in successors(node) {
            if settled[next.index()] {
                continue;
            }
            debug_assert!(weight.into_inner() >= 0.0, "negative edge weight {weight}");
            let candidate = cost + weight;
            if best[next.index()].map_or(true, |known| candidate < known) {
                best[next.index()] = Some(candidate);
                predecessors[next.index()] = Some((node, label));
                seq += 1;
                heap.push(HeapItem { cost: candidate, seq, node: next });
            }
        }
    }

    None
}

/// Walk predecessor back-pointers from `target` to `source`.
fn reconstruct<L: Copy>(
    source: NodeIndex,
    target: NodeIndex,
    cost: Cost,
    predecessors: &[Option<(NodeIndex, L)>],
    settled: usize,
) -> SearchResult<L> {
    let mut path = vec![target];
    let mut hops = Vec::new();
    let mut current = target;

    while current != source {
        let Some((prev, label)) = predecessors[current.index()] else {
            break;
        };
        hops.push(label);
        path.push(prev);
        current = prev;
    }

    path.reverse();
    hops.reverse();
    SearchResult { cost, path, hops, settled }
}

/// True shortest path from `start` to `end` over the snapshot's open roads.
///
/// Fails with [`RoutingError::UnknownNode`] for ids outside the network and
/// [`RoutingError::NoPathFound`] when no chain of open roads connects the two.
#[instrument(skip(snapshot), fields(nodes = snapshot.node_count(), open_roads = snapshot.edge_count()))]
pub fn shortest_path(snapshot: &NetworkSnapshot, start: &str, end: &str) -> Result<Route, RoutingError> {
    let source = snapshot.index_of(start)?;
    let target = snapshot.index_of(end)?;

    let result = dijkstra(snapshot.node_count(), source, target, None, move |node| {
        snapshot.neighbors(node).map(|(next, weight)| (next, weight, ()))
    })
    .ok_or_else(|| RoutingError::no_path(start, end))?;

    debug!(cost = %result.cost, settled = result.settled, "shortest path found");
    Ok(result.to_route(snapshot))
}
