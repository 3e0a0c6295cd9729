// src/config/mod.rs
//! Simulation configuration
//!
//! All tunables of the generator (session length, sampling, voltage levels,
//! per-mode frequency/weight/duty tables and the self-test sub-model) live in
//! one explicit [`SimulationConfig`] that is passed into both the scheduler and
//! the renderer. Nothing is read from ambient state.

/// Default values and limits
pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};

use crate::error::{ImdError, ImdResult};
use crate::imd::types::{OperatingMode, VoltageLevel};
use crate::utils::conversion::{sample_count, sampling_interval_ms};
use crate::utils::validation::{
    validate_band, validate_finite, validate_positive, validate_probability_weights,
    validate_range, ValidationError,
};

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Session budget and segment lengths
    pub session: SessionConfig,
    /// Sampling and logic levels
    pub signal: SignalConfig,
    /// Plain PWM modes
    pub modes: ModeTable,
    /// Self-test mode and its startup segment
    pub self_test: SelfTestConfig,
}

/// Session budget and main-loop segment lengths
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Simulated session length in seconds
    pub total_duration_s: f64,
    /// Range main-loop segment lengths are drawn from, in seconds
    pub segment_duration_s: Band,
}

/// Sampling rate and logic levels shared by both channels
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Samples per second; must divide 1000
    pub sample_rate_hz: u32,
    /// Voltage of a high level
    pub v_high: f64,
    /// Voltage of a low level
    pub v_low: f64,
    /// Decimals voltages are rounded to
    pub voltage_decimals: u32,
}

/// Closed sampling interval `[min, max]` for uniform draws
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Band {
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound
    pub max: f64,
}

/// Frequency, selection weight and duty band of a plain PWM mode
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PwmModeConfig {
    /// MHS PWM frequency identifying the mode
    pub frequency_hz: f64,
    /// Probability of drawing this mode in the main loop
    pub weight: f64,
    /// Duty-cycle range in percent
    pub duty_cycle: Band,
}

/// The four modes whose parameters do not branch
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModeTable {
    /// Healthy insulation, OKHS high
    pub normal: PwmModeConfig,
    /// Undervoltage, OKHS low
    pub undervoltage: PwmModeConfig,
    /// Device error, OKHS low
    pub device_error: PwmModeConfig,
    /// Ground fault, OKHS low
    pub ground_fault: PwmModeConfig,
}

/// Self-test mode: startup segment plus the good/bad branch
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelfTestConfig {
    /// MHS PWM frequency of the self-test
    pub frequency_hz: f64,
    /// Probability of drawing the self-test in the main loop
    pub weight: f64,
    /// Probability that a self-test passes
    pub p_good: f64,
    /// Duty range of a passing self-test
    pub good_duty: Band,
    /// Duty range of a failing self-test
    pub bad_duty: Band,
    /// Length of the mandatory first segment
    pub startup_duration_s: f64,
}

/// Default value providers using constants
mod defaults {
    use super::*;
    use crate::config::constants::*;

    pub fn pwm_mode(frequency_hz: f64, weight: f64, band: (f64, f64)) -> PwmModeConfig {
        PwmModeConfig {
            frequency_hz,
            weight,
            duty_cycle: Band::from(band),
        }
    }

    pub fn session() -> SessionConfig {
        SessionConfig {
            total_duration_s: session::DEFAULT_TOTAL_DURATION_S,
            segment_duration_s: Band::new(
                session::SEGMENT_DURATION_MIN_S,
                session::SEGMENT_DURATION_MAX_S,
            ),
        }
    }

    pub fn signal() -> SignalConfig {
        SignalConfig {
            sample_rate_hz: signal::DEFAULT_SAMPLE_RATE_HZ,
            v_high: signal::V_HIGH,
            v_low: signal::V_LOW,
            voltage_decimals: signal::VOLTAGE_DECIMALS,
        }
    }

    pub fn modes() -> ModeTable {
        ModeTable {
            normal: pwm_mode(modes::NORMAL_FREQUENCY_HZ, modes::NORMAL_WEIGHT, modes::WIDE_DUTY_BAND),
            undervoltage: pwm_mode(
                modes::UNDERVOLTAGE_FREQUENCY_HZ,
                modes::UNDERVOLTAGE_WEIGHT,
                modes::WIDE_DUTY_BAND,
            ),
            device_error: pwm_mode(
                modes::DEVICE_ERROR_FREQUENCY_HZ,
                modes::DEVICE_ERROR_WEIGHT,
                modes::FAULT_DUTY_BAND,
            ),
            ground_fault: pwm_mode(
                modes::GROUND_FAULT_FREQUENCY_HZ,
                modes::GROUND_FAULT_WEIGHT,
                modes::FAULT_DUTY_BAND,
            ),
        }
    }

    pub fn self_test() -> SelfTestConfig {
        SelfTestConfig {
            frequency_hz: modes::SELF_TEST_FREQUENCY_HZ,
            weight: modes::SELF_TEST_WEIGHT,
            p_good: self_test::P_GOOD,
            good_duty: Band::from(self_test::GOOD_DUTY_BAND),
            bad_duty: Band::from(self_test::BAD_DUTY_BAND),
            startup_duration_s: self_test::STARTUP_DURATION_S,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        defaults::session()
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        defaults::signal()
    }
}

impl Default for ModeTable {
    fn default() -> Self {
        defaults::modes()
    }
}

impl Default for SelfTestConfig {
    fn default() -> Self {
        defaults::self_test()
    }
}

impl Band {
    /// Band `[min, max]`
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when `min <= value <= max`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &str, limits: Option<(f64, f64)>) -> Result<(), ValidationError> {
        validate_band(field, self.min, self.max, limits)
    }
}

impl From<(f64, f64)> for Band {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl SignalConfig {
    /// Voltage emitted for a logic level
    pub fn level(&self, level: VoltageLevel) -> f64 {
        match level {
            VoltageLevel::High => self.v_high,
            VoltageLevel::Low => self.v_low,
        }
    }

    /// Whole-millisecond spacing between consecutive samples
    pub fn sampling_interval_ms(&self) -> ImdResult<u64> {
        sampling_interval_ms(self.sample_rate_hz)
    }
}

impl ModeTable {
    /// Table entry of a plain PWM mode; the self-test lives in [`SelfTestConfig`]
    pub fn entry(&self, mode: OperatingMode) -> Option<&PwmModeConfig> {
        match mode {
            OperatingMode::Normal => Some(&self.normal),
            OperatingMode::Undervoltage => Some(&self.undervoltage),
            OperatingMode::SelfTest => None,
            OperatingMode::DeviceError => Some(&self.device_error),
            OperatingMode::GroundFault => Some(&self.ground_fault),
        }
    }
}

impl SimulationConfig {
    /// PWM frequency and selection weight of a mode
    pub fn frequency_and_weight(&self, mode: OperatingMode) -> (f64, f64) {
        match self.modes.entry(mode) {
            Some(entry) => (entry.frequency_hz, entry.weight),
            None => (self.self_test.frequency_hz, self.self_test.weight),
        }
    }

    /// Validate the whole configuration before any generation starts
    pub fn validate(&self) -> ImdResult<()> {
        self.validate_signal()?;
        self.validate_session()?;
        self.validate_modes()?;
        self.validate_self_test()?;
        Ok(())
    }

    fn validate_signal(&self) -> ImdResult<()> {
        let signal = &self.signal;
        sampling_interval_ms(signal.sample_rate_hz).map_err(|err| match err {
            ImdError::Domain { reason, .. } => ImdError::configuration("signal.sample_rate_hz", reason),
            other => other,
        })?;
        validate_finite("signal.v_high", signal.v_high)?;
        validate_finite("signal.v_low", signal.v_low)?;
        validate_range(
            "signal.voltage_decimals",
            signal.voltage_decimals as f64,
            0.0,
            signal::MAX_VOLTAGE_DECIMALS as f64,
        )?;
        Ok(())
    }

    fn validate_session(&self) -> ImdResult<()> {
        let session = &self.session;
        let rate = self.signal.sample_rate_hz;

        validate_positive("session.total_duration_s", session.total_duration_s)?;
        let budget_samples = sample_count(session.total_duration_s, rate);
        if budget_samples == 0 {
            return Err(ImdError::configuration(
                "session.total_duration_s",
                format!("{} s is shorter than one sample at {} Hz", session.total_duration_s, rate),
            ));
        }
        if budget_samples > constants::session::MAX_SESSION_SAMPLES {
            return Err(ImdError::configuration(
                "session.total_duration_s",
                format!(
                    "{} s at {} Hz exceeds the limit of {} samples",
                    session.total_duration_s,
                    rate,
                    constants::session::MAX_SESSION_SAMPLES
                ),
            ));
        }

        session
            .segment_duration_s
            .validate("session.segment_duration_s", None)?;
        validate_positive("session.segment_duration_s.min", session.segment_duration_s.min)?;
        if session.segment_duration_s.min * (rate as f64) < 1.0 {
            return Err(ImdError::configuration(
                "session.segment_duration_s.min",
                format!("segments must span at least one sample at {} Hz", rate),
            ));
        }
        Ok(())
    }

    fn validate_modes(&self) -> ImdResult<()> {
        let duty_limits = Some((
            validation::DUTY_CYCLE_MIN_PERCENT,
            validation::DUTY_CYCLE_MAX_PERCENT,
        ));

        let mut frequencies = Vec::with_capacity(OperatingMode::ALL.len());
        let mut weights = Vec::with_capacity(OperatingMode::ALL.len());
        let mut fields = Vec::with_capacity(OperatingMode::ALL.len());

        for mode in OperatingMode::ALL {
            let (frequency_hz, weight) = self.frequency_and_weight(mode);
            validate_positive(&format!("{}.frequency_hz", mode.config_key()), frequency_hz)?;

            if frequencies.iter().any(|&f: &f64| f == frequency_hz) {
                return Err(ImdError::configuration(
                    format!("{}.frequency_hz", mode.config_key()),
                    format!("{} Hz is already assigned to another mode", frequency_hz),
                ));
            }
            frequencies.push(frequency_hz);
            weights.push(weight);
            fields.push(mode.config_key());

            if let Some(entry) = self.modes.entry(mode) {
                entry
                    .duty_cycle
                    .validate(&format!("{}.duty_cycle", mode.config_key()), duty_limits)?;
            }
        }

        let weight_fields: Vec<String> = fields.iter().map(|f| format!("{f}.weight")).collect();
        let weight_refs: Vec<&str> = weight_fields.iter().map(String::as_str).collect();
        validate_probability_weights(&weight_refs, &weights)?;
        Ok(())
    }

    fn validate_self_test(&self) -> ImdResult<()> {
        let st = &self.self_test;
        let duty_limits = Some((
            validation::DUTY_CYCLE_MIN_PERCENT,
            validation::DUTY_CYCLE_MAX_PERCENT,
        ));

        validate_range("self_test.p_good", st.p_good, 0.0, 1.0)?;
        st.good_duty.validate("self_test.good_duty", duty_limits)?;
        st.bad_duty.validate("self_test.bad_duty", duty_limits)?;
        validate_positive("self_test.startup_duration_s", st.startup_duration_s)?;
        if sample_count(st.startup_duration_s, self.signal.sample_rate_hz) == 0 {
            return Err(ImdError::configuration(
                "self_test.startup_duration_s",
                "startup segment must span at least one sample",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.signal.sample_rate_hz, 1000);
        assert_eq!(config.session.total_duration_s, 120.0);
        assert_eq!(config.self_test.startup_duration_s, 2.0);
    }

    #[test]
    fn test_frequency_and_weight_lookup() {
        let config = SimulationConfig::default();
        assert_eq!(config.frequency_and_weight(OperatingMode::Normal), (10.0, 0.90));
        assert_eq!(config.frequency_and_weight(OperatingMode::SelfTest), (30.0, 0.05));
        assert_eq!(config.frequency_and_weight(OperatingMode::GroundFault), (50.0, 0.01));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = SimulationConfig::default();
        config.modes.normal.weight = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("sum to"));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut config = SimulationConfig::default();
        config.session.segment_duration_s = Band::new(10.0, 3.0);
        let err = config.validate().unwrap_err();
        match err {
            ImdError::Configuration { field, .. } => assert_eq!(field, "session.segment_duration_s"),
            other => panic!("Expected configuration error, got {other:?}"),
        }

        let mut config = SimulationConfig::default();
        config.self_test.bad_duty = Band::new(95.0, 90.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_budget_rejected() {
        let mut config = SimulationConfig::default();
        config.session.total_duration_s = 0.0;
        assert!(config.validate().is_err());

        config.session.total_duration_s = -5.0;
        assert!(config.validate().is_err());

        config.session.total_duration_s = 0.0001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_budget_rejected() {
        let mut config = SimulationConfig::default();
        config.session.total_duration_s = 1e30;
        let err = config.validate().unwrap_err();
        match err {
            ImdError::Configuration { field, .. } => assert_eq!(field, "session.total_duration_s"),
            other => panic!("Expected configuration error, got {other:?}"),
        }

        // the limit is in samples, so a coarser rate allows a longer session
        let limit_s = constants::session::MAX_SESSION_SAMPLES as f64 / 1000.0;
        config.session.total_duration_s = limit_s;
        assert!(config.validate().is_ok());
        config.session.total_duration_s = limit_s + 1.0;
        assert!(config.validate().is_err());
        config.signal.sample_rate_hz = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sample_rate_must_divide_one_second() {
        let mut config = SimulationConfig::default();
        config.signal.sample_rate_hz = 0;
        assert!(config.validate().is_err());

        config.signal.sample_rate_hz = 300;
        let err = config.validate().unwrap_err();
        match err {
            ImdError::Configuration { field, .. } => assert_eq!(field, "signal.sample_rate_hz"),
            other => panic!("Expected configuration error, got {other:?}"),
        }

        config.signal.sample_rate_hz = 500;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duplicate_frequency_rejected() {
        let mut config = SimulationConfig::default();
        config.modes.ground_fault.frequency_hz = 40.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duty_band_outside_percent_range_rejected() {
        let mut config = SimulationConfig::default();
        config.modes.normal.duty_cycle = Band::new(5.0, 120.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_p_good_range() {
        let mut config = SimulationConfig::default();
        config.self_test.p_good = 1.0;
        assert!(config.validate().is_ok());
        config.self_test.p_good = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_signal_level_resolution() {
        let signal = SignalConfig::default();
        assert_eq!(signal.level(VoltageLevel::High), 5.0);
        assert_eq!(signal.level(VoltageLevel::Low), 0.0);
        assert_eq!(signal.sampling_interval_ms().unwrap(), 1);
    }
}
