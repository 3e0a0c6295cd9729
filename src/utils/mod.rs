//! Common utility functions for the IMD simulator
//!
//! - Time providers for choosing the session start instant
//! - Configuration validation helpers
//! - Sample-count, interval and rounding conversions
//!
//! Constants are defined in the config module.

pub mod conversion;
pub mod time;
pub mod validation;

// Re-export commonly used functions for convenience
pub use time::{current_timestamp_millis, MockTimeProvider, SystemTimeProvider, TimeProvider};

pub use validation::{
    validate_band, validate_positive, validate_probability_weights, validate_range,
    ValidationError, ValidationResult,
};

pub use conversion::{round_to_decimals, sample_count, samples_to_seconds, sampling_interval_ms};
