// src/config/constants.rs
//! System-wide configuration constants
//!
//! Defaults mirror the nominal IMD datasheet contract: five PWM frequencies,
//! one per operating condition, with 5 V / 0 V logic levels.

/// Signal and sampling constants
pub mod signal {
    /// Default sampling rate
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 1000;
    /// Logic high, in volts
    pub const V_HIGH: f64 = 5.0;
    /// Logic low, in volts
    pub const V_LOW: f64 = 0.0;
    /// Default voltage rounding
    pub const VOLTAGE_DECIMALS: u32 = 3;
    /// Upper bound on `voltage_decimals`
    pub const MAX_VOLTAGE_DECIMALS: u32 = 9;

    /// Timestamps are whole milliseconds, so the sample rate must divide this
    pub const MILLIS_PER_SECOND: u64 = 1_000;
    /// One sample per millisecond
    pub const MAX_SAMPLE_RATE_HZ: u32 = 1_000;
}

/// Session timing constants
pub mod session {
    /// Two-minute session
    pub const DEFAULT_TOTAL_DURATION_S: f64 = 120.0;
    /// Shortest main-loop segment
    pub const SEGMENT_DURATION_MIN_S: f64 = 3.0;
    /// Longest main-loop segment
    pub const SEGMENT_DURATION_MAX_S: f64 = 10.0;

    /// Largest number of records one session (or one rendered segment) may
    /// hold: about 13.9 h at 1 kHz
    pub const MAX_SESSION_SAMPLES: usize = 50_000_000;
}

/// Per-mode PWM frequencies, selection weights and duty bands
pub mod modes {
    /// Normal condition (insulation OK)
    pub const NORMAL_FREQUENCY_HZ: f64 = 10.0;
    /// Undervoltage condition
    pub const UNDERVOLTAGE_FREQUENCY_HZ: f64 = 20.0;
    /// Self-test, at startup and in the main loop
    pub const SELF_TEST_FREQUENCY_HZ: f64 = 30.0;
    /// Device error
    pub const DEVICE_ERROR_FREQUENCY_HZ: f64 = 40.0;
    /// Ground fault
    pub const GROUND_FAULT_FREQUENCY_HZ: f64 = 50.0;

    /// Main-loop selection weight of Normal
    pub const NORMAL_WEIGHT: f64 = 0.90;
    /// Main-loop selection weight of Undervoltage
    pub const UNDERVOLTAGE_WEIGHT: f64 = 0.03;
    /// Main-loop selection weight of SelfTest
    pub const SELF_TEST_WEIGHT: f64 = 0.05;
    /// Main-loop selection weight of DeviceError
    pub const DEVICE_ERROR_WEIGHT: f64 = 0.01;
    /// Main-loop selection weight of GroundFault
    pub const GROUND_FAULT_WEIGHT: f64 = 0.01;

    /// Normal and undervoltage share the wide band
    pub const WIDE_DUTY_BAND: (f64, f64) = (5.0, 95.0);
    /// Device error and ground fault sit around 50 %
    pub const FAULT_DUTY_BAND: (f64, f64) = (47.5, 52.5);
}

/// Self-test (SST) sub-model constants
pub mod self_test {
    /// Length of the mandatory first segment
    pub const STARTUP_DURATION_S: f64 = 2.0;
    /// Probability that a self-test passes
    pub const P_GOOD: f64 = 0.85;
    /// Passing self-test duty range, percent
    pub const GOOD_DUTY_BAND: (f64, f64) = (5.0, 10.0);
    /// Failing self-test duty range, percent
    pub const BAD_DUTY_BAND: (f64, f64) = (90.0, 95.0);
}

/// Validation tolerances
pub mod validation {
    /// Allowed deviation of the weight sum from 1
    pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;
    /// Smallest renderable duty cycle
    pub const DUTY_CYCLE_MIN_PERCENT: f64 = 0.0;
    /// Largest renderable duty cycle
    pub const DUTY_CYCLE_MAX_PERCENT: f64 = 100.0;
}

/// Export and file-system constants
pub mod export {
    /// CLI output path when none is given
    pub const DEFAULT_OUTPUT_FILE: &str = "IMD_output_2min_startup_30Hz.json";
    /// Pretty-printed JSON indent
    pub const JSON_INDENT: &[u8] = b"  ";
    /// Prefix of environment overrides
    pub const ENV_PREFIX: &str = "IMD_SIM";
    /// Nesting separator in environment override names
    pub const ENV_SEPARATOR: &str = "__";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let sum = modes::NORMAL_WEIGHT
            + modes::UNDERVOLTAGE_WEIGHT
            + modes::SELF_TEST_WEIGHT
            + modes::DEVICE_ERROR_WEIGHT
            + modes::GROUND_FAULT_WEIGHT;
        assert!((sum - 1.0).abs() < validation::WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_default_rate_yields_whole_millisecond_interval() {
        assert_eq!(signal::MILLIS_PER_SECOND % signal::DEFAULT_SAMPLE_RATE_HZ as u64, 0);
    }

    #[test]
    fn test_self_test_bands_do_not_overlap() {
        assert!(self_test::GOOD_DUTY_BAND.1 < self_test::BAD_DUTY_BAND.0);
    }
}
