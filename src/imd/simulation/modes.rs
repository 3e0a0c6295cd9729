//! Per-mode parameter derivation
//! Location: src/imd/simulation/modes.rs
//!
//! Maps an [`OperatingMode`] to its duty-cycle draw and OKHS level. The match
//! over modes is exhaustive, so a new IMD condition cannot be added without
//! deciding its parameters here.

use crate::config::{Band, SelfTestConfig, SimulationConfig};
use crate::error::ImdResult;
use crate::imd::traits::RandomSource;
use crate::imd::types::{OperatingMode, SegmentSpec, SelfTestOutcome, VoltageLevel};

/// A mode that can be drawn by the scheduler's main loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeCandidate {
    /// Mode selected by this entry
    pub mode: OperatingMode,
    /// Its PWM frequency, used for ordering
    pub frequency_hz: f64,
    /// Its selection weight
    pub weight: f64,
}

/// Duty cycle and OKHS level derived for one segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeParameters {
    /// Drawn duty cycle in percent
    pub duty_cycle_percent: f64,
    /// OKHS level implied by the mode (and branch)
    pub okhs: VoltageLevel,
    /// Branch taken, for self-test segments only
    pub self_test: Option<SelfTestOutcome>,
}

impl ModeParameters {
    /// Combine with mode, frequency and duration into a renderable segment
    pub fn into_segment(self, mode: OperatingMode, frequency_hz: f64, duration_s: f64) -> SegmentSpec {
        SegmentSpec {
            mode,
            frequency_hz,
            duty_cycle_percent: self.duty_cycle_percent,
            okhs: self.okhs,
            duration_s,
            self_test: self.self_test,
        }
    }
}

/// Candidates in ascending frequency order
pub fn mode_candidates(config: &SimulationConfig) -> Vec<ModeCandidate> {
    let mut candidates: Vec<ModeCandidate> = OperatingMode::ALL
        .iter()
        .map(|&mode| {
            let (frequency_hz, weight) = config.frequency_and_weight(mode);
            ModeCandidate { mode, frequency_hz, weight }
        })
        .collect();

    candidates.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));
    candidates
}

/// Draw the duty cycle and OKHS level for `mode`
///
/// Consumes one uniform draw for plain modes and two for the self-test
/// (branch, then duty).
pub fn derive_parameters<R: RandomSource>(
    mode: OperatingMode,
    config: &SimulationConfig,
    rng: &mut R,
) -> ImdResult<ModeParameters> {
    let table = &config.modes;
    match mode {
        OperatingMode::Normal => fixed_level(&table.normal.duty_cycle, VoltageLevel::High, rng),
        OperatingMode::Undervoltage => {
            fixed_level(&table.undervoltage.duty_cycle, VoltageLevel::Low, rng)
        }
        OperatingMode::SelfTest => self_test_parameters(&config.self_test, rng),
        OperatingMode::DeviceError => {
            fixed_level(&table.device_error.duty_cycle, VoltageLevel::Low, rng)
        }
        OperatingMode::GroundFault => {
            fixed_level(&table.ground_fault.duty_cycle, VoltageLevel::Low, rng)
        }
    }
}

/// Evaluate the self-test branch: good with probability `p_good`
pub fn self_test_parameters<R: RandomSource>(
    config: &SelfTestConfig,
    rng: &mut R,
) -> ImdResult<ModeParameters> {
    let outcome = if rng.uniform_real(0.0, 1.0)? < config.p_good {
        SelfTestOutcome::Good
    } else {
        SelfTestOutcome::Bad
    };

    let (band, okhs) = match outcome {
        SelfTestOutcome::Good => (&config.good_duty, VoltageLevel::High),
        SelfTestOutcome::Bad => (&config.bad_duty, VoltageLevel::Low),
    };

    Ok(ModeParameters {
        duty_cycle_percent: rng.uniform_real(band.min, band.max)?,
        okhs,
        self_test: Some(outcome),
    })
}

fn fixed_level<R: RandomSource>(
    band: &Band,
    okhs: VoltageLevel,
    rng: &mut R,
) -> ImdResult<ModeParameters> {
    Ok(ModeParameters {
        duty_cycle_percent: rng.uniform_real(band.min, band.max)?,
        okhs,
        self_test: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imd::simulation::random::{RngSource, ScriptedSource};

    #[test]
    fn test_candidates_sorted_by_frequency() {
        let mut config = SimulationConfig::default();
        config.modes.normal.frequency_hz = 60.0;

        let candidates = mode_candidates(&config);
        let freqs: Vec<f64> = candidates.iter().map(|c| c.frequency_hz).collect();
        assert_eq!(freqs, vec![20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(candidates[4].mode, OperatingMode::Normal);
    }

    #[test]
    fn test_default_candidate_weights() {
        let weights: Vec<f64> = mode_candidates(&SimulationConfig::default())
            .iter()
            .map(|c| c.weight)
            .collect();
        assert_eq!(weights, vec![0.90, 0.03, 0.05, 0.01, 0.01]);
    }

    #[test]
    fn test_okhs_coupling_per_mode() {
        let config = SimulationConfig::default();
        let mut rng = RngSource::seeded(5);

        for _ in 0..200 {
            let normal = derive_parameters(OperatingMode::Normal, &config, &mut rng).unwrap();
            assert_eq!(normal.okhs, VoltageLevel::High);
            assert!((5.0..=95.0).contains(&normal.duty_cycle_percent));

            for mode in [
                OperatingMode::Undervoltage,
                OperatingMode::DeviceError,
                OperatingMode::GroundFault,
            ] {
                let params = derive_parameters(mode, &config, &mut rng).unwrap();
                assert_eq!(params.okhs, VoltageLevel::Low);
                assert!(params.self_test.is_none());
            }

            let fault = derive_parameters(OperatingMode::GroundFault, &config, &mut rng).unwrap();
            assert!((47.5..=52.5).contains(&fault.duty_cycle_percent));
        }
    }

    #[test]
    fn test_self_test_okhs_tracks_band() {
        let config = SimulationConfig::default();
        let mut rng = RngSource::seeded(9);

        for _ in 0..500 {
            let params = derive_parameters(OperatingMode::SelfTest, &config, &mut rng).unwrap();
            let in_good_band = config.self_test.good_duty.contains(params.duty_cycle_percent);
            assert_eq!(params.okhs == VoltageLevel::High, in_good_band);
            match params.self_test {
                Some(SelfTestOutcome::Good) => assert!(in_good_band),
                Some(SelfTestOutcome::Bad) => {
                    assert!(config.self_test.bad_duty.contains(params.duty_cycle_percent))
                }
                None => panic!("self-test must record its branch"),
            }
        }
    }

    #[test]
    fn test_self_test_branch_threshold() {
        let config = SelfTestConfig::default();

        let mut good = ScriptedSource::new().real(0.849).real(7.0);
        let params = self_test_parameters(&config, &mut good).unwrap();
        assert_eq!(params.self_test, Some(SelfTestOutcome::Good));
        assert_eq!(params.okhs, VoltageLevel::High);
        assert_eq!(params.duty_cycle_percent, 7.0);

        let mut bad = ScriptedSource::new().real(0.85).real(92.0);
        let params = self_test_parameters(&config, &mut bad).unwrap();
        assert_eq!(params.self_test, Some(SelfTestOutcome::Bad));
        assert_eq!(params.okhs, VoltageLevel::Low);
        assert_eq!(params.duty_cycle_percent, 92.0);
    }
}
