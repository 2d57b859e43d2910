//! Property tests: exploration coverage and shortest-path agreement on
//! randomly generated mazes and graphs.

use std::collections::HashSet;

use maze_explore_core::{
    bfs_shortest_path, known_graph_from_edges, nearest_frontier, replay, shortest_path, Cardinal,
    Explorer, FirstUnknown, KnownGraph, RoomMap, SeededRandom,
};
use proptest::prelude::*;

/// Binary-tree maze on a `width × height` grid: every cell except the origin
/// opens either west or south, which always yields a spanning tree. Each
/// entry of `loops` that is true knocks one extra wall out, adding a cycle.
fn make_maze(width: u32, height: u32, carve: &[bool], loops: &[bool]) -> RoomMap<u64, Cardinal> {
    let id = |x: u32, y: u32| (y as u64) * (width as u64) + x as u64;
    let mut map = RoomMap::new();
    for y in 0..height {
        for x in 0..width {
            map.insert_room(id(x, y), (x as i32, y as i32));
        }
    }

    let mut bit = 0;
    let mut extra = 0;
    for y in 0..height {
        for x in 0..width {
            let toss = carve.get(bit).copied().unwrap_or(false);
            bit += 1;
            let go_west = x > 0 && (y == 0 || toss);
            if go_west {
                map.connect(id(x, y), Cardinal::West, id(x - 1, y));
            } else if y > 0 {
                map.connect(id(x, y), Cardinal::South, id(x, y - 1));
            }

            // Optionally open the wall the tree did not use.
            if x > 0 && y > 0 && loops.get(extra).copied().unwrap_or(false) {
                if go_west {
                    map.connect(id(x, y), Cardinal::South, id(x, y - 1));
                } else {
                    map.connect(id(x, y), Cardinal::West, id(x - 1, y));
                }
            }
            extra += 1;
        }
    }
    map
}

fn bfs_distance(g: &KnownGraph<u32>, a: u32, b: u32) -> Option<usize> {
    bfs_shortest_path(g, &a, &b).map(|p| p.len() - 1)
}

proptest! {
    #[test]
    fn tree_maze_fully_covered_within_twice_edges(
        width in 1u32..7,
        height in 1u32..7,
        carve in prop::collection::vec(any::<bool>(), 49),
    ) {
        let map = make_maze(width, height, &carve, &[]);
        let result = Explorer::new(map.walker().unwrap(), FirstUnknown).run().unwrap();

        let report = replay(&map, result.log.as_slice()).unwrap();
        prop_assert!(report.is_complete());
        let edges = map.exit_count() / 2;
        prop_assert!(result.moves() <= 2 * edges);
    }

    #[test]
    fn looped_maze_fully_covered(
        width in 1u32..7,
        height in 1u32..7,
        carve in prop::collection::vec(any::<bool>(), 49),
        loops in prop::collection::vec(any::<bool>(), 49),
        seed in any::<u64>(),
    ) {
        let map = make_maze(width, height, &carve, &loops);
        let result = Explorer::new(map.walker().unwrap(), SeededRandom::new(seed)).run().unwrap();

        let report = replay(&map, result.log.as_slice()).unwrap();
        prop_assert!(report.is_complete(), "missed {} rooms", report.missing());
        prop_assert!(result.graph.is_complete());
        prop_assert_eq!(result.graph.node_count(), map.len());

        // The discovered map agrees edge for edge with the real one.
        for (id, room) in map.rooms() {
            let exits = result.graph.exits(id).unwrap();
            for (direction, target) in &room.exits {
                prop_assert_eq!(exits[direction].known(), Some(target));
            }
        }
    }

    #[test]
    fn backtrack_finds_nearest_frontier(
        width in 2u32..6,
        height in 2u32..6,
        carve in prop::collection::vec(any::<bool>(), 36),
        stop in 1usize..40,
    ) {
        // Explore part of a maze, then check backtrack distances against a
        // BFS over the discovered edges.
        let map = make_maze(width, height, &carve, &[]);
        let mut explorer = Explorer::new(map.walker().unwrap(), FirstUnknown);
        for _ in 0..stop {
            explorer.step().unwrap();
        }

        // A node named as a target but not yet recorded is frontier too.
        let graph = explorer.graph();
        let known = graph.to_known_graph();
        for node in graph.nodes() {
            let nearest = known
                .keys()
                .filter(|n| !graph.contains(n) || graph.has_unknown(n))
                .filter_map(|n| bfs_shortest_path(&known, node, n).map(|p| p.len() - 1))
                .min();
            match nearest_frontier(graph, node) {
                Some(path) => prop_assert_eq!(Some(path.len()), nearest),
                None => prop_assert_eq!(None, nearest),
            }
        }
    }

    #[test]
    fn bidirectional_matches_bfs(
        n in 2u32..40,
        raw_edges in prop::collection::vec((0u32..40, 0u32..40), 0..80),
        queries in prop::collection::vec((0u32..40, 0u32..40), 1..10),
    ) {
        let edges: Vec<(u32, u32)> = raw_edges
            .into_iter()
            .map(|(a, b)| (a % n, b % n))
            .collect();
        let g = known_graph_from_edges(edges);

        for (a, b) in queries {
            let (a, b) = (a % n, b % n);
            let found = shortest_path(&g, &a, &b);
            match (found, bfs_distance(&g, a, b)) {
                (Some(path), Some(dist)) => {
                    prop_assert_eq!(path.len() - 1, dist);
                    prop_assert_eq!(path[0], a);
                    prop_assert_eq!(*path.last().unwrap(), b);
                    for pair in path.windows(2) {
                        prop_assert!(g[&pair[0]].contains(&pair[1]));
                    }
                    let distinct: HashSet<&u32> = path.iter().collect();
                    prop_assert_eq!(distinct.len(), path.len());
                }
                (None, None) => {}
                (found, dist) => prop_assert!(false, "{a} -> {b}: {found:?} vs {dist:?}"),
            }
        }
    }
}
