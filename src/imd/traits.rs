// src/imd/traits.rs
//! Core seam between the generator and its source of randomness

use crate::error::{ImdError, ImdResult};

/// Pseudorandom capability consumed by the mode scheduler
///
/// The generator never seeds or constructs a source itself; reproducibility is
/// decided by whoever builds the implementation.
pub trait RandomSource {
    /// Uniform real in `[lo, hi]`
    fn uniform_real(&mut self, lo: f64, hi: f64) -> ImdResult<f64>;

    /// Index drawn with probability proportional to `weights[i]`
    fn weighted_index(&mut self, weights: &[f64]) -> ImdResult<usize>;

    /// Candidate drawn with probability proportional to its weight
    fn weighted_choice<'a, T>(&mut self, candidates: &'a [T], weights: &[f64]) -> ImdResult<&'a T>
    where
        Self: Sized,
    {
        if candidates.len() != weights.len() {
            return Err(ImdError::RandomSource(format!(
                "{} candidates but {} weights",
                candidates.len(),
                weights.len()
            )));
        }

        let index = self.weighted_index(weights)?;
        candidates.get(index).ok_or_else(|| {
            ImdError::RandomSource(format!(
                "drawn index {} outside {} candidates",
                index,
                candidates.len()
            ))
        })
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform_real(&mut self, lo: f64, hi: f64) -> ImdResult<f64> {
        (**self).uniform_real(lo, hi)
    }

    fn weighted_index(&mut self, weights: &[f64]) -> ImdResult<usize> {
        (**self).weighted_index(weights)
    }
}
