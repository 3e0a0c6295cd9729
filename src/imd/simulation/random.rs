//! Random source implementations
//! Location: src/imd/simulation/random.rs

use std::collections::VecDeque;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ImdError, ImdResult};
use crate::imd::traits::RandomSource;

/// [`RandomSource`] backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Reproducible source: the same seed yields the same session
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Non-reproducible source seeded from the OS
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform_real(&mut self, lo: f64, hi: f64) -> ImdResult<f64> {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(ImdError::RandomSource(format!(
                "invalid uniform range [{}, {}]",
                lo, hi
            )));
        }

        if lo == hi {
            return Ok(lo);
        }
        Ok(self.rng.gen_range(lo..=hi))
    }

    fn weighted_index(&mut self, weights: &[f64]) -> ImdResult<usize> {
        let distribution = WeightedIndex::new(weights)
            .map_err(|e| ImdError::RandomSource(format!("invalid weights: {}", e)))?;
        Ok(distribution.sample(&mut self.rng))
    }
}

/// Replays a fixed script of draws
///
/// `uniform_real` returns queued reals verbatim (the requested range is
/// ignored) and `weighted_index` returns queued indices, so tests can force an
/// exact mode/branch/duty/duration sequence. Running out of script is an error.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    reals: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedSource {
    /// Empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a value for the next `uniform_real` call
    pub fn real(mut self, value: f64) -> Self {
        self.reals.push_back(value);
        self
    }

    /// Queue an index for the next `weighted_index` call
    pub fn index(mut self, index: usize) -> Self {
        self.indices.push_back(index);
        self
    }

    /// Queued reals not yet drawn
    pub fn reals_remaining(&self) -> usize {
        self.reals.len()
    }

    /// Queued indices not yet drawn
    pub fn indices_remaining(&self) -> usize {
        self.indices.len()
    }

    /// True once every queued draw has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.reals.is_empty() && self.indices.is_empty()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_real(&mut self, lo: f64, hi: f64) -> ImdResult<f64> {
        self.reals.pop_front().ok_or_else(|| {
            ImdError::RandomSource(format!("script exhausted (uniform draw in [{}, {}])", lo, hi))
        })
    }

    fn weighted_index(&mut self, weights: &[f64]) -> ImdResult<usize> {
        let index = self
            .indices
            .pop_front()
            .ok_or_else(|| ImdError::RandomSource("script exhausted (weighted draw)".to_string()))?;

        if index >= weights.len() {
            return Err(ImdError::RandomSource(format!(
                "scripted index {} outside {} weights",
                index,
                weights.len()
            )));
        }
        Ok(index)
    }
}
