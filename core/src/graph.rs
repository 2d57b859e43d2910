use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseDirectionError;

/// Opaque node identifier. Supplied by the environment, never generated here.
pub trait NodeKey: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> NodeKey for T {}

/// A labelled edge type with a defined inverse.
///
/// `Ord` fixes the order in which a node's exits are enumerated, which in
/// turn fixes every tie-break that depends on exit order.
pub trait Direction: Copy + Eq + Hash + Ord + fmt::Debug {
    fn opposite(self) -> Self;
}

/// Compass directions, ordered n, e, s, w. Serialized as one-letter labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cardinal {
    #[serde(rename = "n")]
    North,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "w")]
    West,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::East,
        Cardinal::South,
        Cardinal::West,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Cardinal::North => "n",
            Cardinal::East => "e",
            Cardinal::South => "s",
            Cardinal::West => "w",
        }
    }

    /// Grid offset of one step in this direction (north is +y).
    pub fn offset(self) -> (i32, i32) {
        match self {
            Cardinal::North => (0, 1),
            Cardinal::East => (1, 0),
            Cardinal::South => (0, -1),
            Cardinal::West => (-1, 0),
        }
    }
}

impl Direction for Cardinal {
    fn opposite(self) -> Self {
        match self {
            Cardinal::North => Cardinal::South,
            Cardinal::South => Cardinal::North,
            Cardinal::East => Cardinal::West,
            Cardinal::West => Cardinal::East,
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Cardinal {
    type Err = ParseDirectionError;

    /// Accepts "n"/"north" and friends, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "n" | "north" => Ok(Cardinal::North),
            "e" | "east" => Ok(Cardinal::East),
            "s" | "south" => Ok(Cardinal::South),
            "w" | "west" => Ok(Cardinal::West),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Fully known, symmetric adjacency: node → set of neighbors.
pub type KnownGraph<N> = HashMap<N, HashSet<N>>;

/// Insert an undirected edge into both adjacency sets.
pub fn add_undirected_edge<N: NodeKey>(graph: &mut KnownGraph<N>, a: N, b: N) {
    graph.entry(a.clone()).or_default().insert(b.clone());
    graph.entry(b).or_default().insert(a);
}

/// Bulk load a symmetric graph from an edge list.
pub fn known_graph_from_edges<N, I>(edges: I) -> KnownGraph<N>
where
    N: NodeKey,
    I: IntoIterator<Item = (N, N)>,
{
    let mut graph = KnownGraph::new();
    for (a, b) in edges {
        add_undirected_edge(&mut graph, a, b);
    }
    graph
}

/// Number of undirected edges in a symmetric graph. Self-loops count once.
pub fn undirected_edge_count<N: NodeKey>(graph: &KnownGraph<N>) -> usize {
    let mut loops = 0;
    let mut ends = 0;
    for (node, neighbors) in graph {
        for n in neighbors {
            if n == node {
                loops += 1;
            } else {
                ends += 1;
            }
        }
    }
    ends / 2 + loops
}
