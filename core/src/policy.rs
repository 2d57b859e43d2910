use serde::{Deserialize, Serialize};

/// Chooses which unknown exit to walk next.
///
/// `choose` is only called with a non-empty slice, sorted in direction order,
/// and must return one of its elements.
pub trait DirectionPolicy<D> {
    fn choose(&mut self, unknown: &[D]) -> D;
}

impl<D, P: DirectionPolicy<D> + ?Sized> DirectionPolicy<D> for Box<P> {
    fn choose(&mut self, unknown: &[D]) -> D {
        (**self).choose(unknown)
    }
}

/// Always the lowest direction. Fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstUnknown;

impl<D: Copy> DirectionPolicy<D> for FirstUnknown {
    fn choose(&mut self, unknown: &[D]) -> D {
        unknown[0]
    }
}

/// Uniform choice driven by a seeded LCG, reproducible per seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self, max: u64) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) % max
    }
}

impl<D: Copy> DirectionPolicy<D> for SeededRandom {
    fn choose(&mut self, unknown: &[D]) -> D {
        unknown[self.next(unknown.len() as u64) as usize]
    }
}

/// Policy selection for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    First,
    Random {
        seed: u64,
    },
}

impl PolicyKind {
    pub fn build<D: Copy + 'static>(self) -> Box<dyn DirectionPolicy<D>> {
        match self {
            PolicyKind::First => Box::new(FirstUnknown),
            PolicyKind::Random { seed } => Box::new(SeededRandom::new(seed)),
        }
    }
}
