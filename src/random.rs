//! The engine's single source of randomness.
//!
//! Role shuffles and vote tie-breaks both draw from a `RandomSource`, so tests
//! can swap in a scripted sequence and make every draw explicit.

use std::collections::VecDeque;

use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, SeedableRng};

/// Uniform index draws plus per-game seeding.
pub trait RandomSource {
    /// Returns an index uniformly distributed in `0..bound`. `bound` is never zero.
    fn below(&mut self, bound: usize) -> usize;

    /// Re-seeds the source at the start of a game. `None` asks for entropy.
    /// Sources without a seed concept ignore this.
    fn reseed(&mut self, _seed: Option<u64>) {}

    /// Uniformly permutes `items` (Fisher-Yates, last index first).
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

impl RandomSource for SmallRng {
    fn below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }

    fn reseed(&mut self, seed: Option<u64>) {
        *self = match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_entropy(),
        };
    }
}

impl RandomSource for StdRng {
    fn below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }

    fn reseed(&mut self, seed: Option<u64>) {
        *self = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
    }
}

/// Replays a fixed list of draws. Each draw is reduced modulo its bound;
/// once the script runs out every draw returns 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new<I: IntoIterator<Item = usize>>(draws: I) -> Self {
        ScriptedSource {
            draws: draws.into_iter().collect(),
        }
    }

    /// Draws that make `shuffle` leave a slice of length `len` untouched.
    pub fn identity_shuffle(len: usize) -> Self {
        ScriptedSource::new((1..len).rev())
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn below(&mut self, bound: usize) -> usize {
        self.draws.pop_front().map_or(0, |d| d % bound)
    }
}
