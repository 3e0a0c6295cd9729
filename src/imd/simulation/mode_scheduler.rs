//! Mode scheduling for a full IMD session
//! Location: src/imd/simulation/mode_scheduler.rs

use tracing::{debug, info, warn};

use super::modes::{derive_parameters, mode_candidates, self_test_parameters, ModeCandidate};
use super::segment_renderer::render_segment;
use crate::config::SimulationConfig;
use crate::error::{ImdError, ImdResult};
use crate::imd::traits::RandomSource;
use crate::imd::types::{OperatingMode, SegmentSpec, SegmentSummary, SessionTrace};
use crate::utils::conversion::{sample_count, samples_to_seconds};

/// Drives a session: startup self-test, then weighted random modes until the
/// budget is spent
///
/// Durations are accounted in whole samples. The budget is
/// `round(total_duration_s * sample_rate_hz)` samples and every segment is
/// clipped to the remaining samples before it is rendered, so the session
/// never overshoots and never renders an empty segment.
pub struct ModeScheduler<R> {
    config: SimulationConfig,
    candidates: Vec<ModeCandidate>,
    weights: Vec<f64>,
    rng: R,
}

impl<R: RandomSource> ModeScheduler<R> {
    /// Validate `config` and build a scheduler; no draws happen here
    pub fn new(config: SimulationConfig, rng: R) -> ImdResult<Self> {
        config.validate()?;

        let candidates = mode_candidates(&config);
        let weights = candidates.iter().map(|c| c.weight).collect();

        Ok(Self {
            config,
            candidates,
            weights,
            rng,
        })
    }

    /// Validated configuration driving this scheduler
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Candidates in the order used for the weighted draw
    pub fn candidates(&self) -> &[ModeCandidate] {
        &self.candidates
    }

    /// Hand the random source back, e.g. to check a script was consumed
    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Generate the whole session starting at `start_ms`
    pub fn run(&mut self, start_ms: u64) -> ImdResult<SessionTrace> {
        let rate = self.config.signal.sample_rate_hz;
        let budget_samples = sample_count(self.config.session.total_duration_s, rate);

        info!(
            total_duration_s = self.config.session.total_duration_s,
            sample_rate_hz = rate,
            start_ms,
            "starting IMD session"
        );

        let mut trace = SessionTrace::with_capacity(budget_samples, start_ms);
        let mut elapsed_samples = self.startup_segment(&mut trace, budget_samples)?;

        while elapsed_samples < budget_samples {
            let remaining = budget_samples - elapsed_samples;
            elapsed_samples += self.next_segment(&mut trace, remaining)?;
        }

        info!(
            segments = trace.segments.len(),
            samples = trace.sample_count(),
            end_ms = trace.end_ms,
            "IMD session complete"
        );
        Ok(trace)
    }

    fn startup_segment(&mut self, trace: &mut SessionTrace, budget_samples: usize) -> ImdResult<usize> {
        let self_test = &self.config.self_test;
        let rate = self.config.signal.sample_rate_hz;

        let mut samples = sample_count(self_test.startup_duration_s, rate);
        if samples > budget_samples {
            warn!(
                startup_duration_s = self_test.startup_duration_s,
                total_duration_s = self.config.session.total_duration_s,
                "session shorter than startup self-test; clipping"
            );
            samples = budget_samples;
        }

        let params = self_test_parameters(self_test, &mut self.rng)?;
        let segment = params.into_segment(
            OperatingMode::SelfTest,
            self_test.frequency_hz,
            samples_to_seconds(samples, rate),
        );

        self.append(trace, segment, samples)?;
        Ok(samples)
    }

    fn next_segment(&mut self, trace: &mut SessionTrace, remaining: usize) -> ImdResult<usize> {
        let candidate = *self.rng.weighted_choice(&self.candidates, &self.weights)?;
        let params = derive_parameters(candidate.mode, &self.config, &mut self.rng)?;

        let rate = self.config.signal.sample_rate_hz;
        let band = self.config.session.segment_duration_s;
        let drawn_s = self.rng.uniform_real(band.min, band.max)?;

        let drawn_samples = sample_count(drawn_s, rate);
        if drawn_samples == 0 {
            return Err(ImdError::RandomSource(format!(
                "drawn segment duration {} s is shorter than one sample",
                drawn_s
            )));
        }
        let samples = drawn_samples.min(remaining);

        let segment = params.into_segment(
            candidate.mode,
            candidate.frequency_hz,
            samples_to_seconds(samples, rate),
        );

        self.append(trace, segment, samples)?;
        Ok(samples)
    }

    fn append(&self, trace: &mut SessionTrace, segment: SegmentSpec, samples: usize) -> ImdResult<()> {
        let start_ms = trace.end_ms;
        let rendered = render_segment(&segment, start_ms, &self.config.signal)?;
        debug_assert_eq!(rendered.records.len(), samples);

        debug!(
            mode = %segment.mode,
            frequency_hz = segment.frequency_hz,
            duty_cycle_percent = segment.duty_cycle_percent,
            okhs = %segment.okhs,
            duration_s = segment.duration_s,
            start_ms,
            "rendered segment"
        );

        let summary = SegmentSummary::from_spec(&segment, start_ms, rendered.records.len());
        trace.push_segment(summary, rendered);
        Ok(())
    }
}

/// Validate, schedule and render one session in a single call
pub fn generate_session<R: RandomSource>(
    config: SimulationConfig,
    rng: R,
    start_ms: u64,
) -> ImdResult<SessionTrace> {
    ModeScheduler::new(config, rng)?.run(start_ms)
}
