//! maze-explore-core: incremental maze exploration and shortest-path search.
//!
//! Two related engines built on breadth-first search:
//!
//! - an [`Explorer`] that walks an initially unknown [`Environment`],
//!   recording what it discovers in a [`FrontierGraph`] and backtracking to
//!   the nearest unexplored exit until every reachable node has been seen;
//! - a bidirectional [`shortest_path`] search over a fully known, symmetric
//!   adjacency map, including one exported from a finished exploration.
//!
//! Single-threaded and synchronous. The search functions are pure and may be
//! called concurrently on shared, read-only graphs.

mod backtrack;
mod config;
mod environment;
mod error;
mod explorer;
mod frontier;
mod graph;
mod policy;
mod traversal;

pub use backtrack::{nearest_frontier, BacktrackPath, BacktrackStep};
pub use config::ExplorerConfig;
pub use environment::{replay, CoverageReport, Environment, Room, RoomMap, RoomWalker};
pub use error::{ExploreError, ParseDirectionError, Result};
pub use explorer::{Exploration, Explorer, ExplorerState, TraversalLog};
pub use frontier::{Exit, FrontierGraph};
pub use graph::{
    add_undirected_edge, known_graph_from_edges, undirected_edge_count, Cardinal, Direction,
    KnownGraph, NodeKey,
};
pub use policy::{DirectionPolicy, FirstUnknown, PolicyKind, SeededRandom};
pub use traversal::{
    bfs_shortest_path, bidirectional_search, extended_network, shortest_path, SearchOutcome,
};
