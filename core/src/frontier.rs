use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::warn;

use crate::error::{show, ExploreError, Result};
use crate::graph::{add_undirected_edge, Direction, KnownGraph, NodeKey};

/// What lies behind one exit of a discovered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Exit<N> {
    /// The exit exists but has not been walked yet.
    Unknown,
    Known(N),
}

impl<N> Exit<N> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Exit::Unknown)
    }

    pub fn known(&self) -> Option<&N> {
        match self {
            Exit::Known(n) => Some(n),
            Exit::Unknown => None,
        }
    }
}

/// Incrementally discovered map: node → direction → exit.
///
/// Append-only. A node's exit set is fixed when it is first recorded, and an
/// exit that points at a concrete node never changes target. Exits are kept
/// in direction order so enumeration is deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct FrontierGraph<N: NodeKey, D: Direction> {
    nodes: HashMap<N, BTreeMap<D, Exit<N>>>,
}

impl<N: NodeKey, D: Direction> FrontierGraph<N, D> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Record a node with every reported exit marked unknown.
    ///
    /// Returns `true` if the node was new. Re-recording with the same exit set
    /// is a no-op; a different exit set is an integrity fault.
    pub fn record_node<I>(&mut self, node: N, exits: I) -> Result<bool>
    where
        I: IntoIterator<Item = D>,
    {
        let reported: BTreeSet<D> = exits.into_iter().collect();

        if let Some(existing) = self.nodes.get(&node) {
            if existing.keys().eq(reported.iter()) {
                return Ok(false);
            }
            let recorded: BTreeSet<D> = existing.keys().copied().collect();
            warn!(node = ?node, "exit set changed for a recorded node");
            return Err(ExploreError::InconsistentExitSet {
                node: show(&node),
                recorded: show(&recorded),
                reported: show(&reported),
            });
        }

        let entry = reported.into_iter().map(|d| (d, Exit::Unknown)).collect();
        self.nodes.insert(node, entry);
        Ok(true)
    }

    /// Point `direction` of `node` at `target`.
    ///
    /// Setting an unknown exit or confirming an existing target succeeds;
    /// redirecting a concrete exit to a different node fails.
    pub fn record_edge(&mut self, node: &N, direction: D, target: N) -> Result<()> {
        let exits = self
            .nodes
            .get_mut(node)
            .ok_or_else(|| ExploreError::UnknownNode { node: show(node) })?;

        let exit = exits
            .get_mut(&direction)
            .ok_or_else(|| ExploreError::UnknownExit {
                node: show(node),
                direction: show(&direction),
            })?;

        match exit {
            Exit::Unknown => {
                *exit = Exit::Known(target);
                Ok(())
            }
            Exit::Known(existing) if *existing == target => Ok(()),
            Exit::Known(existing) => {
                warn!(node = ?node, direction = ?direction, "edge target changed");
                Err(ExploreError::InconsistentEdge {
                    node: show(node),
                    direction: show(&direction),
                    recorded: show(existing),
                    reported: show(&target),
                })
            }
        }
    }

    /// Directions still unknown at `node`, in direction order. Empty for
    /// fully explored or unrecorded nodes.
    pub fn unknown_directions(&self, node: &N) -> Vec<D> {
        self.nodes
            .get(node)
            .map(|exits| {
                exits
                    .iter()
                    .filter(|(_, exit)| exit.is_unknown())
                    .map(|(&d, _)| d)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_unknown(&self, node: &N) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|exits| exits.values().any(Exit::is_unknown))
    }

    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains_key(node)
    }

    /// All exits of a recorded node.
    pub fn exits(&self, node: &N) -> Option<&BTreeMap<D, Exit<N>>> {
        self.nodes.get(node)
    }

    /// Whether `node` was recorded with an exit in `direction`.
    pub fn has_exit(&self, node: &N, direction: D) -> bool {
        self.nodes
            .get(node)
            .is_some_and(|exits| exits.contains_key(&direction))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.keys()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of exits holding a concrete target (each direction counted).
    pub fn known_edge_count(&self) -> usize {
        self.nodes
            .values()
            .flat_map(|exits| exits.values())
            .filter(|exit| !exit.is_unknown())
            .count()
    }

    pub fn unknown_count(&self) -> usize {
        self.nodes
            .values()
            .flat_map(|exits| exits.values())
            .filter(|exit| exit.is_unknown())
            .count()
    }

    /// True when no recorded node has an unknown exit.
    pub fn is_complete(&self) -> bool {
        self.unknown_count() == 0
    }

    /// Export the discovered concrete edges as a symmetric adjacency map.
    /// Every recorded node appears as a key, even without edges.
    pub fn to_known_graph(&self) -> KnownGraph<N> {
        let mut graph = KnownGraph::with_capacity(self.nodes.len());
        for (node, exits) in &self.nodes {
            graph.entry(node.clone()).or_default();
            for target in exits.values().filter_map(Exit::known) {
                add_undirected_edge(&mut graph, node.clone(), target.clone());
            }
        }
        graph
    }
}

impl<N: NodeKey, D: Direction> Default for FrontierGraph<N, D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Cardinal::{self, East, North, South, West};

    fn graph() -> FrontierGraph<u64, Cardinal> {
        FrontierGraph::new()
    }

    #[test]
    fn test_record_node_marks_exits_unknown() {
        let mut g = graph();
        assert!(g.record_node(0, [North, East]).unwrap());
        assert_eq!(g.unknown_directions(&0), vec![North, East]);
        assert!(g.has_unknown(&0));
        assert_eq!(g.unknown_count(), 2);
    }

    #[test]
    fn test_record_node_idempotent() {
        let mut g = graph();
        g.record_node(0, [East, North]).unwrap();
        g.record_edge(&0, North, 1).unwrap();
        assert!(!g.record_node(0, [North, East]).unwrap());
        // Re-recording must not reset the known edge.
        assert_eq!(g.unknown_directions(&0), vec![East]);
    }

    #[test]
    fn test_record_node_inconsistent_exit_set() {
        let mut g = graph();
        g.record_node(0, [North]).unwrap();
        let err = g.record_node(0, [North, South]).unwrap_err();
        assert!(matches!(err, ExploreError::InconsistentExitSet { .. }));
        assert_eq!(g.unknown_directions(&0), vec![North]);
    }

    #[test]
    fn test_record_edge_sets_target() {
        let mut g = graph();
        g.record_node(0, [North, South]).unwrap();
        g.record_edge(&0, North, 7).unwrap();
        assert_eq!(g.exits(&0).unwrap()[&North], Exit::Known(7));
        assert_eq!(g.unknown_directions(&0), vec![South]);
        assert_eq!(g.known_edge_count(), 1);
    }

    #[test]
    fn test_record_edge_same_target_ok() {
        let mut g = graph();
        g.record_node(0, [North]).unwrap();
        g.record_edge(&0, North, 7).unwrap();
        g.record_edge(&0, North, 7).unwrap();
        assert!(!g.has_unknown(&0));
    }

    #[test]
    fn test_record_edge_conflict() {
        let mut g = graph();
        g.record_node(0, [North]).unwrap();
        g.record_edge(&0, North, 7).unwrap();
        let err = g.record_edge(&0, North, 8).unwrap_err();
        assert!(matches!(err, ExploreError::InconsistentEdge { .. }));
        assert_eq!(g.exits(&0).unwrap()[&North], Exit::Known(7));
    }

    #[test]
    fn test_record_edge_unknown_node() {
        let mut g = graph();
        let err = g.record_edge(&3, North, 4).unwrap_err();
        assert!(matches!(err, ExploreError::UnknownNode { .. }));
    }

    #[test]
    fn test_record_edge_missing_exit() {
        let mut g = graph();
        g.record_node(0, [North]).unwrap();
        let err = g.record_edge(&0, West, 4).unwrap_err();
        assert!(matches!(err, ExploreError::UnknownExit { .. }));
    }

    #[test]
    fn test_unrecorded_node_has_no_unknowns() {
        let g = graph();
        assert!(g.unknown_directions(&42).is_empty());
        assert!(!g.has_unknown(&42));
    }

    #[test]
    fn test_dead_end_is_complete() {
        let mut g = graph();
        g.record_node(0, []).unwrap();
        assert!(g.is_complete());
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_export_known_graph() {
        let mut g = graph();
        g.record_node(0, [North, East]).unwrap();
        g.record_node(1, [South]).unwrap();
        g.record_edge(&0, North, 1).unwrap();
        g.record_edge(&1, South, 0).unwrap();

        let known = g.to_known_graph();
        assert_eq!(known.len(), 2);
        assert!(known[&0].contains(&1));
        assert!(known[&1].contains(&0));
        // The unknown east exit contributes nothing.
        assert_eq!(known[&0].len(), 1);
    }

    #[test]
    fn test_serialize_snapshot() {
        let mut g = graph();
        g.record_node(5, [East]).unwrap();
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["nodes"]["5"]["e"], serde_json::json!("Unknown"));
    }
}
