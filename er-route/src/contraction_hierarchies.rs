//! Contraction hierarchies over a closable road network.
//!
//! A contraction hierarchy augments a road graph with shortcuts: each shortcut stands for a chain
//! of roads through one or more suppressed ("contracted") intersections, so a search can cross the
//! chain in a single step. Our shortcuts are precomputed once and never repaired. When a fire
//! closes any road a shortcut stands for, the shortcut simply stops being usable until the road
//! reopens; queries then have to make do with the roads and the shortcuts that remain.
//!
//! Two pieces live here:
//! * [`ShortcutIndex`]: the fixed shortcut set and the live validity rule.
//! * [`ShortcutBuilder`]: derives a shortcut set by contracting the nodes of an open-road
//!   snapshot in the order a [`ContractionHeuristic`] picks, with a witness search deciding which
//!   shortcuts are needed to preserve shortest-path distances. Nothing calls it implicitly; its
//!   output can be fed back into [`crate::RoadNetwork::load_graph`].

/// Node contraction and shortcut extraction
mod builder;
/// Heuristics for determining node contraction order
mod heuristic;
/// The precomputed shortcut set and its validity rule
mod index;

pub use builder::{
    CHEdge,
    CHNode,
    ContractionHeuristic,
    ShortcutBuilder,
};
pub use heuristic::EdgeDifference;
pub use index::ShortcutIndex;
