use std::collections::{HashMap, VecDeque};

use crate::frontier::{Exit, FrontierGraph};
use crate::graph::{Direction, NodeKey};

/// One hop of a backtrack route: the direction walked and where it leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktrackStep<N, D> {
    pub direction: D,
    pub node: N,
}

/// Route over discovered edges from `start` to the nearest frontier node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktrackPath<N, D> {
    pub start: N,
    pub steps: Vec<BacktrackStep<N, D>>,
}

impl<N, D: Copy> BacktrackPath<N, D> {
    /// The frontier node this route ends at.
    pub fn target(&self) -> &N {
        self.steps.last().map(|s| &s.node).unwrap_or(&self.start)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn directions(&self) -> impl Iterator<Item = D> + '_ {
        self.steps.iter().map(|s| s.direction)
    }
}

/// Shortest route from `start` to the nearest node that still has an
/// unknown exit, walking concrete edges only.
///
/// Returns `None` when `start` is unrecorded or when no node reachable over
/// discovered edges has an unknown exit. A node named as a concrete target but
/// never recorded also counts as frontier, since nothing is known about it.
///
/// Exits are expanded in direction order, so among equally near frontier
/// nodes the one dequeued first wins. That choice is implementation-defined.
pub fn nearest_frontier<N, D>(graph: &FrontierGraph<N, D>, start: &N) -> Option<BacktrackPath<N, D>>
where
    N: NodeKey,
    D: Direction,
{
    if !graph.contains(start) {
        return None;
    }

    // node → (parent, direction walked from parent). Start has no parent.
    let mut visited: HashMap<N, Option<(N, D)>> = HashMap::new();
    let mut queue: VecDeque<N> = VecDeque::new();

    visited.insert(start.clone(), None);
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        let Some(exits) = graph.exits(&current) else {
            return Some(reconstruct(&visited, start, current));
        };
        if exits.values().any(Exit::is_unknown) {
            return Some(reconstruct(&visited, start, current));
        }

        for (&direction, exit) in exits {
            if let Exit::Known(next) = exit {
                if !visited.contains_key(next) {
                    visited.insert(next.clone(), Some((current.clone(), direction)));
                    queue.push_back(next.clone());
                }
            }
        }
    }

    None
}

/// Walk parent pointers from `target` back to `start`.
fn reconstruct<N: NodeKey, D: Direction>(
    visited: &HashMap<N, Option<(N, D)>>,
    start: &N,
    target: N,
) -> BacktrackPath<N, D> {
    let mut steps = Vec::new();
    let mut current = target;

    while let Some(Some((parent, direction))) = visited.get(&current) {
        steps.push(BacktrackStep {
            direction: *direction,
            node: current,
        });
        current = parent.clone();
    }

    steps.reverse();
    BacktrackPath {
        start: start.clone(),
        steps,
    }
}
