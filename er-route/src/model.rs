//! Data model for road networks, shortcuts and search results.
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{
    Deserialize,
    Serialize,
};

/// Unique key of an intersection in the network.
pub type NodeId = String;

/// Travel cost along a road, shortcut or route. Always finite and non-negative once a network has
/// been loaded.
pub type Cost = OrderedFloat<f64>;

/// An intersection. Coordinates are display metadata and play no part in routing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node key.
    pub id: NodeId,
    /// Latitude in degrees.
    #[serde(default)]
    pub lat: f64,
    /// Longitude in degrees.
    #[serde(default)]
    pub lng: f64,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Node {
    /// A node with no coordinates or label, handy for tests and generated networks.
    #[must_use]
    pub fn bare(id: impl Into<NodeId>) -> Self {
        Self { id: id.into(), lat: 0.0, lng: 0.0, name: None }
    }

    /// The display name, falling back to the id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A directed road as supplied at construction. Identity is the `(from, to)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Tail node.
    pub from: NodeId,
    /// Head node.
    pub to: NodeId,
    /// Travel cost.
    pub weight: Cost,
    /// Whether the road starts out closed.
    #[serde(default)]
    pub closed: bool,
    /// Metadata flag for roads exposed to fire. Does not affect search.
    #[serde(default)]
    pub fire_risk: bool,
}

impl Edge {
    /// An open road without a risk tag.
    #[must_use]
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: OrderedFloat(weight),
            closed: false,
            fire_risk: false,
        }
    }

    /// Builder-style helper that tags the road as fire-prone.
    #[must_use]
    pub fn with_fire_risk(mut self) -> Self {
        self.fire_risk = true;
        self
    }
}

/// Per-road state stored in the graph; the endpoints live in the graph structure itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Road {
    /// Travel cost.
    pub weight: Cost,
    /// Closed roads are never traversed.
    pub closed: bool,
    /// Metadata only.
    pub fire_risk: bool,
}

impl From<&Edge> for Road {
    fn from(edge: &Edge) -> Self {
        Self { weight: edge.weight, closed: edge.closed, fire_risk: edge.fire_risk }
    }
}

/// A precomputed edge `from → to` standing in for the road chain `from, via…, to`.
///
/// Validity is never stored: a shortcut is usable exactly while every road in its chain is open
/// (see [`crate::contraction_hierarchies::ShortcutIndex::is_valid`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    /// First node of the represented chain.
    pub from: NodeId,
    /// Last node of the represented chain.
    pub to: NodeId,
    /// Suppressed intermediate nodes, in travel order.
    pub via: Vec<NodeId>,
    /// Sum of the weights of the represented roads.
    pub original_cost: Cost,
    /// Cost charged when a search takes the shortcut; never more than `original_cost`.
    pub shortcut_cost: Cost,
}

impl Shortcut {
    /// Every node on the represented chain, endpoints included.
    pub fn chain(&self) -> impl Iterator<Item = &NodeId> + '_ {
        std::iter::once(&self.from).chain(&self.via).chain(std::iter::once(&self.to))
    }

    /// The `(from, to)` pairs of the roads this shortcut represents.
    pub fn legs(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> + '_ {
        self.chain().tuple_windows()
    }
}

/// Result of a successful search.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Total cost of the route.
    pub cost: Cost,
    /// Node ids from start to end, inclusive.
    pub path: Vec<NodeId>,
    /// Number of nodes permanently settled (popped from the frontier) by the search.
    pub nodes_visited: usize,
}
