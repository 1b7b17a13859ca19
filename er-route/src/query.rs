//! Hierarchy queries: Dijkstra over open roads plus currently usable shortcuts.
//!
//! A query never repairs or recomputes shortcuts. If closures have knocked out every shortcut
//! and road that could join the endpoints, the query fails with
//! [`RoutingError::NoPathFound`] and the caller decides whether to fall back to
//! [`crate::search::shortest_path`].
use std::fmt;

use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{
    debug,
    instrument,
};

use crate::contraction_hierarchies::ShortcutIndex;
use crate::errors::RoutingError;
use crate::model::{
    Cost,
    NodeId,
    Route,
    Shortcut,
};
use crate::network::NetworkSnapshot;
use crate::search::dijkstra;

/// Which layer of the hierarchy produced a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// The path takes at least one shortcut.
    Shortcut,
    /// The path uses base roads only.
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shortcut => write!(f, "shortcut"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Result of a hierarchy query.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyRoute {
    /// Cost, hierarchy-level path (shortcuts appear as single hops) and settle count.
    #[serde(flatten)]
    pub route: Route,
    /// Which layer produced the path.
    pub tier: Tier,
    /// The path with every shortcut unpacked into the roads it stands for.
    pub expanded_path: Vec<NodeId>,
    /// Shortcuts taken, in travel order.
    pub shortcuts_used: Vec<Shortcut>,
}

/// How the search crossed one hop of the augmented graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hop {
    Road,
    /// Position of the shortcut in the snapshot's [`ShortcutIndex`].
    Shortcut(usize),
}

/// Query engine bound to one snapshot.
///
/// The augmented adjacency (open roads plus usable shortcuts) is built once in [`Self::new`]; every
/// query against the engine sees the same road state, and independent queries may run in
/// parallel.
#[derive(Debug)]
pub struct HierarchicalQuery<'a> {
    snapshot: &'a NetworkSnapshot,
    /// Usable shortcuts leaving each node, as `(head, cost, position in the index)`.
    shortcut_adjacency: Vec<Vec<(NodeIndex, Cost, usize)>>,
}

impl<'a> HierarchicalQuery<'a> {
    /// Build the augmented view for `snapshot`.
    #[instrument(skip_all, fields(shortcuts = snapshot.shortcuts().len()))]
    pub fn new(snapshot: &'a NetworkSnapshot) -> Self {
        let mut shortcut_adjacency = vec![Vec::new(); snapshot.node_count()];
        for (position, shortcut) in snapshot.shortcuts().usable(snapshot) {
            // Endpoints were validated at load time.
            if let (Ok(from), Ok(to)) = (snapshot.index_of(&shortcut.from), snapshot.index_of(&shortcut.to)) {
                shortcut_adjacency[from.index()].push((to, shortcut.shortcut_cost, position));
            }
        }
        debug!(usable = shortcut_adjacency.iter().map(Vec::len).sum::<usize>(), "augmented view built");

        Self { snapshot, shortcut_adjacency }
    }

    /// The shortcut set behind this view.
    #[must_use]
    pub fn index(&self) -> &ShortcutIndex {
        self.snapshot.shortcuts()
    }

    /// Shortcuts the view is using.
    #[must_use]
    pub fn usable_shortcuts(&self) -> Vec<&Shortcut> {
        self.index().usable_shortcuts(self.snapshot)
    }

    /// Shortcuts left out because a road they represent is closed.
    #[must_use]
    pub fn invalidated_shortcuts(&self) -> Vec<&Shortcut> {
        self.index().invalidated_shortcuts(self.snapshot)
    }

    /// Shortest path from `start` to `end` over open roads and usable shortcuts.
    ///
    /// `nodes_visited` counts nodes settled on the augmented graph. Fails with
    /// [`RoutingError::NoPathFound`] when the augmented graph does not connect the two; no
    /// internal retry is attempted.
    #[instrument(skip(self))]
    pub fn query(&self, start: &str, end: &str) -> Result<HierarchyRoute, RoutingError> {
        let source = self.snapshot.index_of(start)?;
        let target = self.snapshot.index_of(end)?;

        let snapshot = self.snapshot;
        let shortcut_adjacency = &self.shortcut_adjacency;
        let result = dijkstra(snapshot.node_count(), source, target, None, move |node| {
            let roads = snapshot.neighbors(node).map(|(next, cost)| (next, cost, Hop::Road));
            let shortcuts = shortcut_adjacency[node.index()]
                .iter()
                .map(|&(next, cost, position)| (next, cost, Hop::Shortcut(position)));
            roads.chain(shortcuts)
        })
        .ok_or_else(|| RoutingError::no_path(start, end))?;

        let shortcuts = self.index().as_slice();
        let shortcuts_used: Vec<Shortcut> = result
            .hops
            .iter()
            .filter_map(|hop| match hop {
                Hop::Shortcut(position) => shortcuts.get(*position).cloned(),
                Hop::Road => None,
            })
            .collect();

        let mut expanded_path = Vec::with_capacity(result.path.len());
        if let Some(&first) = result.path.first() {
            expanded_path.push(self.snapshot.id_of(first).clone());
        }
        for (&next, hop) in result.path.iter().skip(1).zip(&result.hops) {
            if let Hop::Shortcut(position) = *hop {
                if let Some(shortcut) = shortcuts.get(position) {
                    expanded_path.extend(shortcut.via.iter().cloned());
                }
            }
            expanded_path.push(self.snapshot.id_of(next).clone());
        }

        let tier = if shortcuts_used.is_empty() { Tier::Fallback } else { Tier::Shortcut };
        debug!(cost = %result.cost, settled = result.settled, %tier, "hierarchy query answered");

        Ok(HierarchyRoute {
            route: result.to_route(self.snapshot),
            tier,
            expanded_path,
            shortcuts_used,
        })
    }

    /// Answer many independent queries in parallel against the same snapshot.
    pub fn query_many(&self, pairs: &[(NodeId, NodeId)]) -> Vec<Result<HierarchyRoute, RoutingError>> {
        pairs.par_iter().map(|(start, end)| self.query(start, end)).collect()
    }
}

#[cfg(test)]
mod tests;
