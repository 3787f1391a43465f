//! Randomness capability for the meal-plan generator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random draws a meal plan needs
pub trait RandomSource {
    /// A value drawn uniformly from `[low, high]`
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// An index drawn uniformly from `0..len`; `len` is never zero
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Adapter putting any `rand` generator behind [`RandomSource`]
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Fresh generator per call site, so concurrent requests never share state
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len.max(1))
    }
}

/// Replays a fixed sequence of unit fractions.
///
/// Each fraction `t` in `[0, 1]` maps to `low + t * (high - low)` for
/// `uniform` and to `floor(t * len)` for `choose_index`. The sequence wraps.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    position: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, position: 0 }
    }

    /// Always draws the midpoint of every range
    pub fn midpoint() -> Self {
        Self::new(vec![0.5])
    }

    fn next(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value.clamp(0.0, 1.0)
    }
}

impl RandomSource for SequenceRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next() * (high - low)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        let t = self.next();
        ((t * len as f64) as usize).min(len.saturating_sub(1))
    }
}
