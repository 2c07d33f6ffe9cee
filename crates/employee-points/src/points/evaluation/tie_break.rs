use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform choice among `candidates` employees tied for first place.
///
/// Implementations must return an index in `[0, candidates)` with every index
/// equally likely. `candidates` is always at least 2.
pub trait TieBreaker: Send + Sync {
    fn pick(&self, candidates: usize) -> usize;
}

/// Draws from the thread-local generator; not reproducible across runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformTieBreaker;

impl TieBreaker for UniformTieBreaker {
    fn pick(&self, candidates: usize) -> usize {
        rand::rng().random_range(0..candidates)
    }
}

/// Deterministic sequence of draws for a given seed.
#[derive(Debug)]
pub struct SeededTieBreaker {
    rng: Mutex<StdRng>,
}

impl SeededTieBreaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TieBreaker for SeededTieBreaker {
    fn pick(&self, candidates: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.random_range(0..candidates),
            Err(poisoned) => poisoned.into_inner().random_range(0..candidates),
        }
    }
}

/// Either tie-breaker, chosen at startup from configuration.
#[derive(Debug)]
pub enum ConfiguredTieBreaker {
    Uniform(UniformTieBreaker),
    Seeded(SeededTieBreaker),
}

impl ConfiguredTieBreaker {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Seeded(SeededTieBreaker::new(seed)),
            None => Self::Uniform(UniformTieBreaker),
        }
    }
}

impl TieBreaker for ConfiguredTieBreaker {
    fn pick(&self, candidates: usize) -> usize {
        match self {
            Self::Uniform(inner) => inner.pick(candidates),
            Self::Seeded(inner) => inner.pick(candidates),
        }
    }
}

impl<T: TieBreaker + ?Sized> TieBreaker for std::sync::Arc<T> {
    fn pick(&self, candidates: usize) -> usize {
        (**self).pick(candidates)
    }
}
