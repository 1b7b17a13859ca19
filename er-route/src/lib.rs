#![deny(
    // This is overly strict, of course. The intent is somewhat of a "quality seal," less to fix everything, and more to force us to add inline allows, which are even more needlessly verbose, but give us a mechanism to say "we think this is okay, but you might want to take a second look here."
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
)]

//! # er-route: evacuation routing over a road network with closable roads
//!
//! er-route answers "how do I get from here to there" on a small directed road network whose
//! roads can be closed (and reopened) at any time by an outside event such as a fire. Two engines
//! answer the same question so callers can compare them side by side:
//!
//! 1. Graph store ([`RoadNetwork`]): nodes, directed roads with an open/closed flag, and the
//!    precomputed shortcut set. Every search runs against an immutable [`NetworkSnapshot`] so no
//!    road can flip state mid-search.
//! 2. Shortest-path engine ([`search::shortest_path`]): plain Dijkstra over the open roads,
//!    counting how many nodes it settles.
//! 3. Contraction hierarchy index ([`contraction_hierarchies::ShortcutIndex`]): the shortcut set
//!    and the rule that a shortcut is usable only while every road it stands for is open. The
//!    optional [`contraction_hierarchies::ShortcutBuilder`] derives a fresh shortcut set by
//!    contracting nodes of a snapshot.
//! 4. Hierarchical query engine ([`query::HierarchicalQuery`]): Dijkstra over open roads plus
//!    usable shortcuts, reporting which [`query::Tier`] produced the answer.
//!
//! Networks are loaded from YAML or JSON through [`config::NetworkConfig`] and validated at the
//! boundary; malformed input is rejected with [`RoutingError::InvalidGraph`].

pub mod config;
pub mod contraction_hierarchies;
pub mod errors;
pub mod model;
pub mod network;
pub mod query;
pub mod search;
pub mod utils;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use errors::RoutingError;
pub use model::{
    Cost,
    Edge,
    Node,
    NodeId,
    Route,
    Shortcut,
};
pub use network::{
    EdgeState,
    NetworkSnapshot,
    RoadNetwork,
};
pub use query::{
    HierarchicalQuery,
    HierarchyRoute,
    Tier,
};
