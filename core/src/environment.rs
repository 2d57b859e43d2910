//! The environment an explorer walks through, plus an in-memory room map
//! that implements it.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::de::DeserializeOwned;

use crate::error::{show, ExploreError, Result};
use crate::graph::{add_undirected_edge, Cardinal, Direction, KnownGraph, NodeKey};

/// Capability surface an explorer needs: where am I, which exits are here,
/// and a move primitive. Moves mutate environment state, so calls are
/// strictly sequential.
pub trait Environment {
    type Node: NodeKey;
    type Dir: Direction;

    fn current_node(&self) -> Self::Node;

    /// Directions available at `node`.
    fn exits(&self, node: &Self::Node) -> BTreeSet<Self::Dir>;

    /// Move one step. Fails with `InvalidMove` if `direction` is not offered
    /// at the current node.
    fn travel(&mut self, direction: Self::Dir) -> Result<()>;
}

/// A room: grid coordinates plus its exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room<N: Ord, D: Ord> {
    pub coords: (i32, i32),
    pub exits: BTreeMap<D, N>,
}

/// Serialized room entry: `[[x, y], {"n": id, ...}]`.
type RoomEntry<N, D> = ((i32, i32), BTreeMap<D, N>);

/// In-memory room table.
///
/// The starting room is the first room inserted, or the lowest id when the
/// map was parsed from JSON.
#[derive(Debug, Clone)]
pub struct RoomMap<N: NodeKey, D: Direction> {
    rooms: BTreeMap<N, Room<N, D>>,
    start: Option<N>,
}

impl<N: NodeKey, D: Direction> RoomMap<N, D> {
    pub fn new() -> Self {
        Self {
            rooms: BTreeMap::new(),
            start: None,
        }
    }

    /// Add a room with no exits. Re-inserting only updates coordinates.
    pub fn insert_room(&mut self, id: N, coords: (i32, i32)) {
        if self.start.is_none() {
            self.start = Some(id.clone());
        }
        self.rooms
            .entry(id)
            .and_modify(|room| room.coords = coords)
            .or_insert_with(|| Room {
                coords,
                exits: BTreeMap::new(),
            });
    }

    /// Two-way passage: `from -direction-> to` and `to -opposite-> from`.
    /// Missing rooms are created at the origin.
    pub fn connect(&mut self, from: N, direction: D, to: N) {
        self.connect_one_way(to.clone(), direction.opposite(), from.clone());
        self.connect_one_way(from, direction, to);
    }

    pub fn connect_one_way(&mut self, from: N, direction: D, to: N) {
        if !self.rooms.contains_key(&to) {
            self.insert_room(to.clone(), (0, 0));
        }
        if !self.rooms.contains_key(&from) {
            self.insert_room(from.clone(), (0, 0));
        }
        if let Some(room) = self.rooms.get_mut(&from) {
            room.exits.insert(direction, to);
        }
    }

    pub fn set_start(&mut self, id: N) -> Result<()> {
        if !self.rooms.contains_key(&id) {
            return Err(ExploreError::UnknownNode { node: show(&id) });
        }
        self.start = Some(id);
        Ok(())
    }

    pub fn starting_room(&self) -> Option<&N> {
        self.start.as_ref()
    }

    pub fn room(&self, id: &N) -> Option<&Room<N, D>> {
        self.rooms.get(id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (&N, &Room<N, D>)> {
        self.rooms.iter()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Total number of exits across all rooms.
    pub fn exit_count(&self) -> usize {
        self.rooms.values().map(|r| r.exits.len()).sum()
    }

    /// Symmetric adjacency of the whole map, for shortest-path queries.
    pub fn to_known_graph(&self) -> KnownGraph<N> {
        let mut graph = KnownGraph::with_capacity(self.rooms.len());
        for (id, room) in &self.rooms {
            graph.entry(id.clone()).or_default();
            for target in room.exits.values() {
                add_undirected_edge(&mut graph, id.clone(), target.clone());
            }
        }
        graph
    }

    /// A walker positioned at the starting room.
    pub fn walker(&self) -> Result<RoomWalker<'_, N, D>> {
        let start = self.start.clone().ok_or(ExploreError::EmptyMap)?;
        Ok(RoomWalker {
            map: self,
            current: start,
        })
    }
}

impl<N, D> RoomMap<N, D>
where
    N: NodeKey + DeserializeOwned,
    D: Direction + DeserializeOwned,
{
    /// Parse `{"0": [[3, 5], {"n": 1, "s": 2}], ...}`.
    ///
    /// Every exit must lead to a room present in the table.
    pub fn from_json(input: &str) -> Result<Self> {
        let raw: BTreeMap<N, RoomEntry<N, D>> = serde_json::from_str(input)?;

        for (id, (_, exits)) in &raw {
            for (direction, target) in exits {
                if !raw.contains_key(target) {
                    return Err(ExploreError::UnknownExit {
                        node: show(id),
                        direction: show(direction),
                    });
                }
            }
        }

        let start = raw.keys().next().cloned();
        let rooms = raw
            .into_iter()
            .map(|(id, (coords, exits))| (id, Room { coords, exits }))
            .collect();
        Ok(Self { rooms, start })
    }
}

impl RoomMap<u64, Cardinal> {
    /// Fully open `width × height` grid. Room `(x, y)` has id `y * width + x`
    /// and the starting room is `(0, 0)`.
    pub fn grid(width: u32, height: u32) -> Self {
        let mut map = Self::new();
        let id = |x: u32, y: u32| (y as u64) * (width as u64) + x as u64;
        for y in 0..height {
            for x in 0..width {
                map.insert_room(id(x, y), (x as i32, y as i32));
            }
        }
        for y in 0..height {
            for x in 0..width {
                if x + 1 < width {
                    map.connect(id(x, y), Cardinal::East, id(x + 1, y));
                }
                if y + 1 < height {
                    map.connect(id(x, y), Cardinal::North, id(x, y + 1));
                }
            }
        }
        map
    }
}

impl<N: NodeKey, D: Direction> Default for RoomMap<N, D> {
    fn default() -> Self {
        Self::new()
    }
}

/// A player walking a `RoomMap`.
#[derive(Debug, Clone)]
pub struct RoomWalker<'a, N: NodeKey, D: Direction> {
    map: &'a RoomMap<N, D>,
    current: N,
}

impl<N: NodeKey, D: Direction> Environment for RoomWalker<'_, N, D> {
    type Node = N;
    type Dir = D;

    fn current_node(&self) -> N {
        self.current.clone()
    }

    fn exits(&self, node: &N) -> BTreeSet<D> {
        self.map
            .room(node)
            .map(|room| room.exits.keys().copied().collect())
            .unwrap_or_default()
    }

    fn travel(&mut self, direction: D) -> Result<()> {
        let map = self.map;
        let next = map
            .room(&self.current)
            .and_then(|room| room.exits.get(&direction))
            .ok_or_else(|| ExploreError::InvalidMove {
                node: show(&self.current),
                direction: show(&direction),
            })?;
        self.current = next.clone();
        Ok(())
    }
}

/// Rooms visited by replaying a traversal log, against the map's size.
#[derive(Debug, Clone)]
pub struct CoverageReport<N> {
    pub visited: HashSet<N>,
    pub expected: usize,
    pub moves: usize,
}

impl<N> CoverageReport<N> {
    pub fn is_complete(&self) -> bool {
        self.visited.len() >= self.expected
    }

    /// Rooms never entered.
    pub fn missing(&self) -> usize {
        self.expected.saturating_sub(self.visited.len())
    }
}

/// Replay `moves` from the starting room and report which rooms were seen.
///
/// An impossible step is an `InvalidMove` error; incomplete coverage is not
/// an error, check `CoverageReport::is_complete`.
pub fn replay<N, D>(map: &RoomMap<N, D>, moves: &[D]) -> Result<CoverageReport<N>>
where
    N: NodeKey,
    D: Direction,
{
    let mut walker = map.walker()?;
    let mut visited = HashSet::with_capacity(map.len());
    visited.insert(walker.current_node());

    for &direction in moves {
        walker.travel(direction)?;
        visited.insert(walker.current_node());
    }

    Ok(CoverageReport {
        visited,
        expected: map.len(),
        moves: moves.len(),
    })
}
