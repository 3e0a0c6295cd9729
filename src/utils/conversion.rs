//! Conversion utilities for the IMD simulator
//!
//! Time/sample-count conversions and voltage rounding shared by the scheduler
//! and the renderer. Constants come from the config module.

use crate::config::constants::signal;
use crate::error::{ImdError, ImdResult};

/// Number of samples covering `duration_s` at `sample_rate_hz`, rounded to nearest
pub fn sample_count(duration_s: f64, sample_rate_hz: u32) -> usize {
    let samples = (duration_s * sample_rate_hz as f64).round();
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Simulated seconds spanned by `samples` at `sample_rate_hz`
pub fn samples_to_seconds(samples: usize, sample_rate_hz: u32) -> f64 {
    samples as f64 / sample_rate_hz as f64
}

/// Whole-millisecond spacing between consecutive samples
///
/// Fails when the rate is zero or does not divide one second evenly, since
/// timestamps are emitted as integer milliseconds.
pub fn sampling_interval_ms(sample_rate_hz: u32) -> ImdResult<u64> {
    if sample_rate_hz == 0 {
        return Err(ImdError::domain(
            "sample_rate_hz",
            "must be greater than zero (sampling interval undefined)",
        ));
    }

    let rate = sample_rate_hz as u64;
    if rate > signal::MAX_SAMPLE_RATE_HZ as u64 || signal::MILLIS_PER_SECOND % rate != 0 {
        return Err(ImdError::domain(
            "sample_rate_hz",
            format!(
                "{} Hz does not give a whole-millisecond interval (must divide {})",
                sample_rate_hz,
                signal::MILLIS_PER_SECOND
            ),
        ));
    }

    Ok(signal::MILLIS_PER_SECOND / rate)
}

/// Round a voltage to a fixed number of decimals
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
