use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::NodeKey;

/// Result of a bidirectional search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<N> {
    /// Start-to-goal node sequence including both endpoints, or `None` when
    /// the two nodes are in different components.
    pub path: Option<Vec<N>>,
    /// Active endpoints expanded before the frontiers met or ran dry.
    pub nodes_expanded: usize,
}

/// Which end of the query a partial path is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Root {
    Start,
    Goal,
}

/// Neighbors of `node`, empty if it has no adjacency entry.
fn neighbors<'a, N, S>(adjacency: &'a HashMap<N, S>, node: &N) -> impl Iterator<Item = &'a N>
where
    N: NodeKey + 'a,
    &'a S: IntoIterator<Item = &'a N>,
{
    adjacency.get(node).into_iter().flatten()
}

/// Shortest path over a symmetric adjacency map, searching from both ends.
///
/// Two frontiers grow in lock-step rounds, one rooted at `start` and one at
/// `goal`. Each active endpoint remembers its root and its parent, so the
/// path back to its root can be rebuilt without cloning paths per node.
/// Within a round the start-rooted endpoints are expanded first, in the
/// order they were discovered, which keeps the first meeting a shortest one.
///
/// A neighbor that is active under the *other* root is a meeting and ends the
/// search. A neighbor active under the same root is not a solution and is
/// skipped. Expanded endpoints are retired and never revisited.
pub fn bidirectional_search<N, S>(adjacency: &HashMap<N, S>, start: &N, goal: &N) -> SearchOutcome<N>
where
    N: NodeKey,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    if start == goal {
        return SearchOutcome {
            path: Some(vec![start.clone()]),
            nodes_expanded: 0,
        };
    }

    // Every node ever activated → (root, parent). Roots have no parent.
    let mut tree: HashMap<N, (Root, Option<N>)> = HashMap::new();
    let mut active: HashSet<N> = HashSet::new();
    let mut retired: HashSet<N> = HashSet::new();

    tree.insert(start.clone(), (Root::Start, None));
    tree.insert(goal.clone(), (Root::Goal, None));
    active.insert(start.clone());
    active.insert(goal.clone());

    let mut frontier = vec![start.clone(), goal.clone()];
    let mut nodes_expanded = 0;

    while !frontier.is_empty() {
        let mut next = Vec::new();

        for node in frontier {
            let root = tree[&node].0;
            nodes_expanded += 1;

            for neighbor in neighbors(adjacency, &node) {
                if retired.contains(neighbor) {
                    continue;
                }
                if active.contains(neighbor) {
                    if tree[neighbor].0 != root {
                        let path = stitch(&tree, &node, neighbor, start);
                        return SearchOutcome {
                            path: Some(path),
                            nodes_expanded,
                        };
                    }
                    // Same root: both halves lead back to the same end.
                    continue;
                }

                tree.insert(neighbor.clone(), (root, Some(node.clone())));
                active.insert(neighbor.clone());
                next.push(neighbor.clone());
            }

            active.remove(&node);
            retired.insert(node);
        }

        frontier = next;
    }

    SearchOutcome {
        path: None,
        nodes_expanded,
    }
}

/// Shortest path from `start` to `goal`, or `None` if they are disconnected.
/// `shortest_path(g, x, x)` is `[x]`.
pub fn shortest_path<N, S>(adjacency: &HashMap<N, S>, start: &N, goal: &N) -> Option<Vec<N>>
where
    N: NodeKey,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    bidirectional_search(adjacency, start, goal).path
}

/// Path from a node back to its root, root first.
fn path_to_root<N: NodeKey>(tree: &HashMap<N, (Root, Option<N>)>, node: &N) -> Vec<N> {
    let mut path = vec![node.clone()];
    let mut current = node;
    while let Some((_, Some(parent))) = tree.get(current) {
        path.push(parent.clone());
        current = parent;
    }
    path.reverse();
    path
}

/// Join the half-paths of two endpoints that met across one edge into a
/// single start→goal path.
fn stitch<N: NodeKey>(tree: &HashMap<N, (Root, Option<N>)>, node: &N, neighbor: &N, start: &N) -> Vec<N> {
    let mut joined = path_to_root(tree, node);
    let mut other = path_to_root(tree, neighbor);
    other.reverse();
    joined.extend(other);

    if joined.first() != Some(start) {
        joined.reverse();
    }
    joined
}

/// Plain breadth-first shortest path from `start` to `goal`.
///
/// Reference implementation for the bidirectional search: same contract,
/// single frontier.
pub fn bfs_shortest_path<N, S>(adjacency: &HashMap<N, S>, start: &N, goal: &N) -> Option<Vec<N>>
where
    N: NodeKey,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    if start == goal {
        return Some(vec![start.clone()]);
    }

    let mut parents: HashMap<N, Option<N>> = HashMap::new();
    let mut queue: VecDeque<N> = VecDeque::new();

    parents.insert(start.clone(), None);
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        for next in neighbors(adjacency, &current) {
            if parents.contains_key(next) {
                continue;
            }
            parents.insert(next.clone(), Some(current.clone()));
            if next == goal {
                return Some(walk_parents(&parents, goal));
            }
            queue.push_back(next.clone());
        }
    }

    None
}

/// Every node reachable from `start`, each with one shortest path from
/// `start` (the start maps to `[start]`).
pub fn extended_network<N, S>(adjacency: &HashMap<N, S>, start: &N) -> HashMap<N, Vec<N>>
where
    N: NodeKey,
    for<'a> &'a S: IntoIterator<Item = &'a N>,
{
    let mut parents: HashMap<N, Option<N>> = HashMap::new();
    let mut queue: VecDeque<N> = VecDeque::new();
    let mut order = Vec::new();

    parents.insert(start.clone(), None);
    queue.push_back(start.clone());

    while let Some(current) = queue.pop_front() {
        for next in neighbors(adjacency, &current) {
            if !parents.contains_key(next) {
                parents.insert(next.clone(), Some(current.clone()));
                queue.push_back(next.clone());
            }
        }
        order.push(current);
    }

    order
        .into_iter()
        .map(|node| {
            let path = walk_parents(&parents, &node);
            (node, path)
        })
        .collect()
}

fn walk_parents<N: NodeKey>(parents: &HashMap<N, Option<N>>, target: &N) -> Vec<N> {
    let mut path = vec![target.clone()];
    let mut current = target;
    while let Some(Some(parent)) = parents.get(current) {
        path.push(parent.clone());
        current = parent;
    }
    path.reverse();
    path
}
