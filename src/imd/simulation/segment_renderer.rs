//! PWM segment rendering
//! Location: src/imd/simulation/segment_renderer.rs
//!
//! Turns one fully specified segment into per-sample MHS/OKHS records using
//! phase accumulation. Pure and deterministic: no randomness, no clock.

use crate::config::constants::session::MAX_SESSION_SAMPLES;
use crate::config::SignalConfig;
use crate::error::{ImdError, ImdResult};
use crate::imd::types::{RenderedSegment, SampleRecord, SegmentSpec};
use crate::utils::conversion::{round_to_decimals, sample_count};

/// Render `segment` starting at `start_ms`
///
/// Produces `round(duration_s * sample_rate_hz)` records spaced by the
/// sampling interval and returns the instant right after the last one.
///
/// MHS is high while the cycle phase lies in `[0, duty/100)`. Elapsed time is
/// accumulated sample by sample, so floating-point error can move an edge by
/// one sample on long segments.
pub fn render_segment(
    segment: &SegmentSpec,
    start_ms: u64,
    signal: &SignalConfig,
) -> ImdResult<RenderedSegment> {
    validate_segment(segment)?;
    let interval_ms = signal.sampling_interval_ms()?;

    let n_samples = sample_count(segment.duration_s, signal.sample_rate_hz);
    if n_samples > MAX_SESSION_SAMPLES {
        return Err(ImdError::domain(
            "duration_s",
            format!(
                "{} s at {} Hz exceeds the limit of {} samples",
                segment.duration_s, signal.sample_rate_hz, MAX_SESSION_SAMPLES
            ),
        ));
    }
    let next_start_ms = (n_samples as u64)
        .checked_mul(interval_ms)
        .and_then(|span| start_ms.checked_add(span))
        .ok_or_else(|| ImdError::domain("start_ms", "segment end overflows the timestamp range"))?;

    let decimals = signal.voltage_decimals;
    let v_high = round_to_decimals(signal.v_high, decimals);
    let v_low = round_to_decimals(signal.v_low, decimals);
    let okhs_voltage = round_to_decimals(signal.level(segment.okhs), decimals);

    let period_s = 1.0 / segment.frequency_hz;
    let dt = 1.0 / signal.sample_rate_hz as f64;
    let duty_fraction = segment.duty_cycle_percent / 100.0;

    let mut records = Vec::with_capacity(n_samples);
    let mut elapsed = 0.0f64;
    let mut timestamp = start_ms;

    for _ in 0..n_samples {
        // phase runs 0 -> 1 across each PWM cycle
        let phase = (elapsed % period_s) / period_s;
        let mhs_voltage = if phase < duty_fraction { v_high } else { v_low };

        records.push(SampleRecord {
            timestamp,
            mhs_voltage,
            okhs_voltage,
        });

        elapsed += dt;
        timestamp += interval_ms;
    }

    Ok(RenderedSegment {
        records,
        next_start_ms,
    })
}

fn validate_segment(segment: &SegmentSpec) -> ImdResult<()> {
    if !segment.frequency_hz.is_finite() || segment.frequency_hz <= 0.0 {
        return Err(ImdError::domain(
            "frequency_hz",
            format!("{} must be positive (PWM period undefined)", segment.frequency_hz),
        ));
    }

    if !(0.0..=100.0).contains(&segment.duty_cycle_percent) {
        return Err(ImdError::domain(
            "duty_cycle_percent",
            format!("{} is outside [0, 100]", segment.duty_cycle_percent),
        ));
    }

    if !segment.duration_s.is_finite() || segment.duration_s < 0.0 {
        return Err(ImdError::domain(
            "duration_s",
            format!("{} must be a non-negative number of seconds", segment.duration_s),
        ));
    }

    Ok(())
}
