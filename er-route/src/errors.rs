//! Error taxonomy shared by every engine in the crate.
use thiserror::Error;

use crate::model::NodeId;

/// Failures surfaced to callers of the routing engines.
///
/// None of these are used for control flow inside a search; each one is returned as-is to the
/// caller, which decides whether to retry, fall back or give up.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// Malformed construction input: dangling references, bad costs, duplicate ids.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// `start` and `end` are disconnected under the current open-road state.
    #[error("no path found from {start} to {end}")]
    NoPathFound {
        /// Search origin.
        start: NodeId,
        /// Search destination.
        end: NodeId,
    },

    /// A mutation named a road that is not part of the network.
    #[error("no road from {from} to {to}")]
    EdgeNotFound {
        /// Tail of the requested road.
        from: NodeId,
        /// Head of the requested road.
        to: NodeId,
    },

    /// A query named a node id that is not part of the network.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

impl RoutingError {
    pub(crate) fn invalid_graph(msg: impl Into<String>) -> Self {
        Self::InvalidGraph(msg.into())
    }

    pub(crate) fn no_path(start: &str, end: &str) -> Self {
        Self::NoPathFound { start: start.into(), end: end.into() }
    }
}
