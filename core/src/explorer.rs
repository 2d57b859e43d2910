//! Depth-first exploration of an unknown environment.
//!
//! The explorer walks unknown exits until it reaches a node with none left,
//! then backtracks over discovered edges to the nearest node that still has
//! one. It stops once no reachable discovered node has an unknown exit. The
//! loop is an explicit state machine, so arbitrarily large environments never
//! grow the call stack.

use tracing::{debug, info_span, trace, warn};

use crate::backtrack::nearest_frontier;
use crate::config::ExplorerConfig;
use crate::environment::Environment;
use crate::error::{show, ExploreError, Result};
use crate::frontier::FrontierGraph;
use crate::graph::{Direction, NodeKey};
use crate::policy::DirectionPolicy;

/// Where the explorer is in its walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerState {
    /// Standing on a node, about to record it and pick an exit.
    AtNode,
    /// Current node is exhausted; next step walks to the nearest frontier.
    Backtracking,
    /// Every reachable discovered node is fully explored.
    Done,
}

/// Append-only sequence of moves made during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalLog<D> {
    moves: Vec<D>,
}

impl<D: Copy> TraversalLog<D> {
    pub fn new() -> Self {
        Self { moves: Vec::new() }
    }

    pub fn push(&mut self, direction: D) {
        self.moves.push(direction);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = D> + '_ {
        self.moves.iter().copied()
    }

    pub fn as_slice(&self) -> &[D] {
        &self.moves
    }

    pub fn into_vec(self) -> Vec<D> {
        self.moves
    }
}

impl<D: Copy> Default for TraversalLog<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a finished session.
#[derive(Debug, Clone)]
pub struct Exploration<N: NodeKey, D: Direction> {
    pub start: N,
    pub log: TraversalLog<D>,
    pub graph: FrontierGraph<N, D>,
    /// Number of backtrack walks taken.
    pub backtracks: usize,
}

impl<N: NodeKey, D: Direction> Exploration<N, D> {
    pub fn moves(&self) -> usize {
        self.log.len()
    }
}

/// Exploration session over one environment.
///
/// Owns the discovered map and the traversal log for the duration of the
/// session. The policy decides which unknown exit to take; inject
/// [`crate::FirstUnknown`] or a seeded policy for reproducible logs.
pub struct Explorer<E: Environment, P> {
    env: E,
    policy: P,
    config: ExplorerConfig,
    graph: FrontierGraph<E::Node, E::Dir>,
    log: TraversalLog<E::Dir>,
    state: ExplorerState,
    start: E::Node,
    /// Node we just left and the direction taken, when the last move walked
    /// an unknown exit.
    arrival: Option<(E::Node, E::Dir)>,
    backtracks: usize,
}

impl<E: Environment> Explorer<E, Box<dyn DirectionPolicy<E::Dir>>>
where
    E::Dir: 'static,
{
    /// Build an explorer whose policy comes from `config.policy`.
    pub fn from_config(env: E, config: ExplorerConfig) -> Self {
        let policy = config.policy.build();
        Self::with_config(env, policy, config)
    }
}

impl<E: Environment, P: DirectionPolicy<E::Dir>> Explorer<E, P> {
    pub fn new(env: E, policy: P) -> Self {
        Self::with_config(env, policy, ExplorerConfig::default())
    }

    /// `config.policy` is ignored here; `policy` is used as given.
    pub fn with_config(env: E, policy: P, config: ExplorerConfig) -> Self {
        let start = env.current_node();
        Self {
            env,
            policy,
            config,
            graph: FrontierGraph::new(),
            log: TraversalLog::new(),
            state: ExplorerState::AtNode,
            start,
            arrival: None,
            backtracks: 0,
        }
    }

    pub fn state(&self) -> ExplorerState {
        self.state
    }

    pub fn graph(&self) -> &FrontierGraph<E::Node, E::Dir> {
        &self.graph
    }

    pub fn log(&self) -> &TraversalLog<E::Dir> {
        &self.log
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Advance the state machine by one step and return the new state.
    ///
    /// At a node this records it, links it back to where we came from, and
    /// walks one unknown exit if there is any. While backtracking it walks
    /// the whole route to the nearest frontier node, or finishes.
    pub fn step(&mut self) -> Result<ExplorerState> {
        self.state = match self.state {
            ExplorerState::AtNode => self.step_at_node()?,
            ExplorerState::Backtracking => self.step_backtrack()?,
            ExplorerState::Done => ExplorerState::Done,
        };
        Ok(self.state)
    }

    /// Step until done.
    pub fn run(mut self) -> Result<Exploration<E::Node, E::Dir>> {
        let span = info_span!("explore", start = ?self.start);
        let _guard = span.enter();

        while self.state != ExplorerState::Done {
            self.step()?;
        }

        debug!(
            moves = self.log.len(),
            nodes = self.graph.node_count(),
            backtracks = self.backtracks,
            "exploration complete"
        );

        Ok(Exploration {
            start: self.start,
            log: self.log,
            graph: self.graph,
            backtracks: self.backtracks,
        })
    }

    fn step_at_node(&mut self) -> Result<ExplorerState> {
        let current = self.env.current_node();
        let exits = self.env.exits(&current);
        self.graph.record_node(current.clone(), exits)?;

        if let Some((previous, direction)) = self.arrival.take() {
            let back = direction.opposite();
            if self.graph.has_exit(&current, back) {
                self.graph.record_edge(&current, back, previous)?;
            } else {
                trace!(node = ?current, direction = ?direction, "one-way passage");
            }
        }

        let unknown = self.graph.unknown_directions(&current);
        if unknown.is_empty() {
            return Ok(ExplorerState::Backtracking);
        }

        let direction = self.policy.choose(&unknown);
        self.walk(direction)?;
        let arrived = self.env.current_node();
        trace!(from = ?current, to = ?arrived, direction = ?direction, "explored exit");
        self.graph.record_edge(&current, direction, arrived)?;
        self.arrival = Some((current, direction));

        Ok(ExplorerState::AtNode)
    }

    fn step_backtrack(&mut self) -> Result<ExplorerState> {
        let current = self.env.current_node();
        let Some(path) = nearest_frontier(&self.graph, &current) else {
            return Ok(ExplorerState::Done);
        };

        debug!(from = ?current, to = ?path.target(), hops = path.len(), "backtracking");
        let mut previous = current;
        for step in &path.steps {
            self.walk(step.direction)?;
            let arrived = self.env.current_node();
            if arrived != step.node {
                warn!(node = ?previous, direction = ?step.direction, "environment diverged from map");
                return Err(ExploreError::InconsistentEdge {
                    node: show(&previous),
                    direction: show(&step.direction),
                    recorded: show(&step.node),
                    reported: show(&arrived),
                });
            }
            previous = arrived;
        }

        self.backtracks += 1;
        self.arrival = None;
        Ok(ExplorerState::AtNode)
    }

    /// Move once, enforcing the move budget and logging the direction.
    fn walk(&mut self, direction: E::Dir) -> Result<()> {
        if let Some(limit) = self.config.max_moves {
            if self.log.len() >= limit {
                warn!(limit, "move budget exhausted");
                return Err(ExploreError::BudgetExceeded {
                    moves: self.log.len(),
                    limit,
                });
            }
        }
        self.env.travel(direction)?;
        self.log.push(direction);
        Ok(())
    }
}
