//! Random sources for reel stops

use rand::prelude::*;

/// Uniform integer source
pub trait RandomSource {
    /// Uniform index in `0..upper`
    fn next_index(&mut self, upper: usize) -> usize;
}

/// `StdRng`-backed source
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded from OS entropy
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seed RNG for reproducible results
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_os()
    }
}

impl RandomSource for StdRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        self.rng.random_range(0..upper)
    }
}

/// Replays a fixed list of indices, cycling when exhausted
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// One entry per spin, three reels each
    pub fn spins(spins: &[[usize; 3]]) -> Self {
        Self::new(spins.concat())
    }
}

impl RandomSource for ScriptedRandom {
    fn next_index(&mut self, _upper: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value
    }
}
