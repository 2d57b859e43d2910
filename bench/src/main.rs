use std::collections::VecDeque;
use std::time::Instant;

use maze_explore_core::{
    add_undirected_edge, bfs_shortest_path, bidirectional_search, replay, undirected_edge_count,
    Cardinal, Exploration, Explorer, ExplorerConfig, KnownGraph, RoomMap,
};
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("maze_explore_bench=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");

    if mode == "help" || mode == "--help" {
        print_usage();
        return;
    }

    let config = match flag_value(&args, "--config") {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                error!("failed to load config {}: {}", path, e);
                return;
            }
        },
        None => ExplorerConfig::default(),
    };
    let dump = args.iter().any(|a| a == "--dump");

    if mode == "map" {
        let Some(path) = args.get(2) else {
            eprintln!("map mode needs a file. Use --help for options.");
            return;
        };
        run_map_file(path, &config, dump);
        return;
    }

    let size: u64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(250_000)
        .max(2);

    println!("maze-explore-bench");
    println!("==================");
    println!();

    let mazes: Vec<(&str, fn(u64) -> RoomMap<u64, Cardinal>)> = vec![
        ("Open grid", gen_open_grid),
        ("Binary-tree maze", gen_tree_maze),
        ("Braided maze (10% loops)", gen_braided_maze),
    ];
    let graphs: Vec<(&str, fn(u64) -> KnownGraph<u64>)> = vec![
        ("Small-world (Watts-Strogatz)", gen_small_world),
        ("Erdos-Renyi random", gen_random),
        ("Barbell (clique-bridge-clique)", gen_barbell),
        ("DLA (organic branching)", gen_dla),
    ];

    match mode {
        "maze" => mazes
            .into_iter()
            .for_each(|(name, g)| run_exploration(name, g, size, &config)),
        "search" => graphs
            .into_iter()
            .for_each(|(name, g)| run_search(name, g, size)),
        "all" => {
            for (name, g) in mazes {
                run_exploration(name, g, size, &config);
            }
            for (name, g) in graphs {
                run_search(name, g, size);
            }
        }
        _ => eprintln!("Unknown mode: {}. Use --help for options.", mode),
    }
}

fn print_usage() {
    println!("Usage: maze-explore-bench [mode] [size] [--config file.json]");
    println!("       maze-explore-bench map <rooms.json> [--config file.json] [--dump]");
    println!();
    println!("Modes:");
    println!("  all      Explore every maze generator, then run every path search (default)");
    println!("  maze     Explore generated mazes and verify full coverage");
    println!("  search   Bidirectional vs plain BFS shortest path on generated graphs");
    println!("  map      Explore a room map file: {{\"0\": [[x, y], {{\"n\": 1}}], ...}}");
    println!();
    println!("Default size: 250000 rooms / nodes");
    println!("RUST_LOG controls tracing output (default maze_explore_bench=info)");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn load_config(path: &str) -> Result<ExplorerConfig, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(ExplorerConfig::from_json(&text)?)
}

fn run_map_file(path: &str, config: &ExplorerConfig, dump: bool) {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            error!("failed to read {}: {}", path, e);
            return;
        }
    };
    let map = match RoomMap::<u64, Cardinal>::from_json(&text) {
        Ok(m) => m,
        Err(e) => {
            error!(code = e.code(), "failed to parse {}: {}", path, e);
            return;
        }
    };
    info!(rooms = map.len(), "loaded room map");
    let Some(exploration) = explore_and_check(&map, config) else {
        return;
    };

    if dump {
        match serde_json::to_string_pretty(&exploration.graph) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("failed to serialize discovered map: {}", e),
        }
    }
}

/// Explore `map` from its starting room and print the coverage line.
fn explore_and_check(
    map: &RoomMap<u64, Cardinal>,
    config: &ExplorerConfig,
) -> Option<Exploration<u64, Cardinal>> {
    let walker = match map.walker() {
        Ok(w) => w,
        Err(e) => {
            error!("{}", e);
            return None;
        }
    };

    let t = Instant::now();
    let result = Explorer::from_config(walker, config.clone()).run();
    let elapsed = t.elapsed();

    let exploration = match result {
        Ok(x) => x,
        Err(e) => {
            error!(code = e.code(), "exploration failed: {}", e);
            return None;
        }
    };

    match replay(map, exploration.log.as_slice()) {
        Ok(report) if report.is_complete() => println!(
            "TESTS PASSED: {} moves, {} rooms visited, {} backtracks in {:.1}ms",
            exploration.moves(),
            report.visited.len(),
            exploration.backtracks,
            elapsed.as_secs_f64() * 1000.0
        ),
        Ok(report) => println!(
            "TESTS FAILED: INCOMPLETE TRAVERSAL, {} unvisited rooms",
            report.missing()
        ),
        Err(e) => error!("replay failed: {}", e),
    }
    Some(exploration)
}

fn run_exploration(
    name: &str,
    generator: fn(u64) -> RoomMap<u64, Cardinal>,
    size: u64,
    config: &ExplorerConfig,
) {
    println!("--- {} ---", name);
    println!("Target: {} rooms", size);

    let t = Instant::now();
    let map = generator(size);
    let gen_time = t.elapsed();
    let edges = map.exit_count() / 2;
    println!(
        "Generated in {:.2}s: {} rooms, {} passages",
        gen_time.as_secs_f64(),
        map.len(),
        edges
    );

    if let Some(exploration) = explore_and_check(&map, config) {
        println!(
            "Moves per passage: {:.2} (depth-first floor is 2.00 for a tree)",
            exploration.moves() as f64 / edges.max(1) as f64
        );

        // Shortest path across the discovered map, corner to corner.
        let known = exploration.graph.to_known_graph();
        let far = map.len() as u64 - 1;
        time_paths(&known, 0, far);
    }
    println!();
}

fn run_search(name: &str, generator: fn(u64) -> KnownGraph<u64>, node_count: u64) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} nodes, {} edges",
        gen_time.as_secs_f64(),
        graph.len(),
        undirected_edge_count(&graph)
    );

    let far = node_count - 1;
    for target in [1, node_count / 100, node_count / 2, far] {
        time_paths(&graph, 0, target);
    }
    println!();
}

fn time_paths(graph: &KnownGraph<u64>, start: u64, target: u64) {
    let t = Instant::now();
    let outcome = bidirectional_search(graph, &start, &target);
    let bidi_time = t.elapsed();

    let t = Instant::now();
    let plain = bfs_shortest_path(graph, &start, &target);
    let bfs_time = t.elapsed();

    let bfs_hops = plain.map(|p| p.len());
    let bidi_hops = outcome.path.as_ref().map(Vec::len);
    if bfs_hops != bidi_hops {
        error!(?bfs_hops, ?bidi_hops, "bidirectional and BFS path lengths disagree");
    }

    match outcome.path {
        Some(p) => println!(
            "Shortest path {} → {}: {} hops, bidirectional {:.1}ms ({} expanded), BFS {:.1}ms",
            start,
            target,
            p.len() - 1,
            bidi_time.as_secs_f64() * 1000.0,
            outcome.nodes_expanded,
            bfs_time.as_secs_f64() * 1000.0
        ),
        None => println!(
            "Shortest path {} → {}: no path ({:.1}ms)",
            start,
            target,
            bidi_time.as_secs_f64() * 1000.0
        ),
    }
}

// ---------------------------------------------------------------------------
// Generators: O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Square-ish grid side for a target room count.
fn side_for(room_count: u64) -> u32 {
    ((room_count as f64).sqrt().ceil() as u32).max(1)
}

/// Every wall open. Many equally short routes; stresses backtrack BFS.
fn gen_open_grid(room_count: u64) -> RoomMap<u64, Cardinal> {
    let side = side_for(room_count);
    RoomMap::grid(side, side)
}

/// Binary-tree maze: each cell opens west or south. A spanning tree, so
/// depth-first exploration walks every passage exactly twice.
fn gen_tree_maze(room_count: u64) -> RoomMap<u64, Cardinal> {
    carve_maze(side_for(room_count), 0.0, 31337)
}

/// Binary-tree maze with one in ten spare walls knocked out, adding loops.
fn gen_braided_maze(room_count: u64) -> RoomMap<u64, Cardinal> {
    carve_maze(side_for(room_count), 0.1, 4242)
}

fn carve_maze(side: u32, loop_rate: f64, seed: u64) -> RoomMap<u64, Cardinal> {
    let mut rng = FastRng::new(seed);
    let id = |x: u32, y: u32| (y as u64) * (side as u64) + x as u64;
    let mut map = RoomMap::new();

    for y in 0..side {
        for x in 0..side {
            map.insert_room(id(x, y), (x as i32, y as i32));
        }
    }

    for y in 0..side {
        for x in 0..side {
            let go_west = x > 0 && (y == 0 || rng.next(2) == 0);
            if go_west {
                map.connect(id(x, y), Cardinal::West, id(x - 1, y));
            } else if y > 0 {
                map.connect(id(x, y), Cardinal::South, id(x, y - 1));
            }

            if x > 0 && y > 0 && rng.next_f64() < loop_rate {
                if go_west {
                    map.connect(id(x, y), Cardinal::South, id(x, y - 1));
                } else {
                    map.connect(id(x, y), Cardinal::West, id(x - 1, y));
                }
            }
        }
    }

    map
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Start with each node connected to K nearest neighbors on a ring,
/// then rewire each edge with probability p. High clustering with short
/// path lengths.
fn gen_small_world(node_count: u64) -> KnownGraph<u64> {
    let k = 5u64;
    let p = 0.05f64;
    let mut graph = KnownGraph::with_capacity(node_count as usize);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            let target = if rng.next_f64() < p {
                rng.next(node_count)
            } else {
                neighbor
            };
            if target != i {
                add_undirected_edge(&mut graph, i, target);
            }
        }
    }

    graph
}

/// Erdos-Renyi: uniform random edges, ~3 per node. Sparse enough to leave
/// small disconnected islands, which exercises the no-path case.
fn gen_random(node_count: u64) -> KnownGraph<u64> {
    let target_edges = node_count * 3 / 2;
    let mut graph = KnownGraph::with_capacity(node_count as usize);
    let mut rng = FastRng::new(54321);

    for i in 0..node_count {
        graph.entry(i).or_default();
    }
    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            add_undirected_edge(&mut graph, from, to);
        }
    }

    graph
}

/// Barbell: two dense clusters joined by a thin bridge.
///
/// Worst case for "find path through bottleneck": both frontiers flood their
/// own cluster before meeting on the bridge.
fn gen_barbell(node_count: u64) -> KnownGraph<u64> {
    let bridge_len = 10u64;
    let cluster = (node_count.max(bridge_len + 4) - bridge_len) / 2;
    let mut graph = KnownGraph::with_capacity(node_count as usize);
    let mut rng = FastRng::new(99999);

    let b_start = cluster + bridge_len;
    for base in [0, b_start] {
        for i in 0..cluster {
            for _ in 0..8u64.min(cluster - 1) {
                let target = rng.next(cluster);
                if target != i {
                    add_undirected_edge(&mut graph, base + i, base + target);
                }
            }
        }
    }

    // Chain from the last node of A through the bridge to the first of B.
    for id in cluster - 1..b_start {
        add_undirected_edge(&mut graph, id, id + 1);
    }
    // Make sure the far end exists even when rounding left a gap.
    for id in b_start + cluster..node_count {
        add_undirected_edge(&mut graph, id - 1, id);
    }

    graph
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Each new node attaches to a random recent "surface" node, with occasional
/// long-range jumps. Tree-like topology with winding paths.
fn gen_dla(node_count: u64) -> KnownGraph<u64> {
    let mut graph = KnownGraph::with_capacity(node_count as usize);
    let mut rng = FastRng::new(77777);

    graph.entry(0).or_default();

    let mut surface: VecDeque<u64> = VecDeque::with_capacity(10001);
    surface.push_back(0);
    let surface_max = 10000usize;

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        add_undirected_edge(&mut graph, new_node, attach_to);

        // 10% chance of a second connection (creates loops / shortcuts)
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                add_undirected_edge(&mut graph, new_node, other);
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    graph
}
