//! Validation utilities for the IMD simulator
//!
//! Provides the checks used by configuration validation:
//! - Numeric ranges and strict positivity
//! - Ordered sampling bands (min <= max)
//! - Probability weight tables that must sum to one
//!
//! Tolerances come from `config::constants::validation` to avoid magic numbers.

use std::fmt;

use crate::config::constants::validation;

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value out of valid range
    OutOfRange {
        /// Offending field
        field: String,
        /// Rejected value
        value: String,
        /// Inclusive lower limit
        min: String,
        /// Inclusive upper limit
        max: String,
    },
    /// Value must be strictly positive
    NotPositive {
        /// Offending field
        field: String,
        /// Rejected value
        value: String,
    },
    /// Value is NaN or infinite
    NotFinite {
        /// Offending field
        field: String,
    },
    /// Band lower bound exceeds its upper bound
    InvertedBand {
        /// Offending band
        field: String,
        /// Lower bound as given
        min: f64,
        /// Upper bound as given
        max: f64,
    },
    /// Cross-field validation failure
    ConstraintViolation {
        /// Fields taking part in the constraint
        fields: Vec<String>,
        /// Description of the violation
        message: String,
    },
}

impl ValidationError {
    /// Name of the offending field (the first one for cross-field failures)
    pub fn field(&self) -> &str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::InvertedBand { field, .. } => field,
            ValidationError::ConstraintViolation { fields, .. } => {
                fields.first().map(String::as_str).unwrap_or("<unknown>")
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange { field, value, min, max } => {
                write!(f, "Field '{}' value '{}' is out of range [{}, {}]", field, value, min, max)
            }
            ValidationError::NotPositive { field, value } => {
                write!(f, "Field '{}' value '{}' must be greater than zero", field, value)
            }
            ValidationError::NotFinite { field } => {
                write!(f, "Field '{}' must be a finite number", field)
            }
            ValidationError::InvertedBand { field, min, max } => {
                write!(f, "Field '{}' band is inverted: min {} > max {}", field, min, max)
            }
            ValidationError::ConstraintViolation { fields, message } => {
                write!(f, "Constraint violation for fields [{}]: {}", fields.join(", "), message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject NaN and infinities
pub fn validate_finite(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
        })
    }
}

/// Require `value > 0`
pub fn validate_positive(field: &str, value: f64) -> ValidationResult<()> {
    validate_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// Require `min <= value <= max`
pub fn validate_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    validate_finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Require a finite, ordered band, optionally bounded by `[floor, ceiling]`
pub fn validate_band(
    field: &str,
    min: f64,
    max: f64,
    limits: Option<(f64, f64)>,
) -> ValidationResult<()> {
    validate_finite(&format!("{field}.min"), min)?;
    validate_finite(&format!("{field}.max"), max)?;

    if min > max {
        return Err(ValidationError::InvertedBand {
            field: field.to_string(),
            min,
            max,
        });
    }

    if let Some((floor, ceiling)) = limits {
        validate_range(&format!("{field}.min"), min, floor, ceiling)?;
        validate_range(&format!("{field}.max"), max, floor, ceiling)?;
    }

    Ok(())
}

/// Require non-negative weights, at least one positive, summing to one
pub fn validate_probability_weights(fields: &[&str], weights: &[f64]) -> ValidationResult<()> {
    let names = || fields.iter().map(|f| f.to_string()).collect::<Vec<_>>();

    if weights.is_empty() {
        return Err(ValidationError::ConstraintViolation {
            fields: names(),
            message: "candidate set is empty".to_string(),
        });
    }

    for (field, &weight) in fields.iter().zip(weights) {
        validate_range(field, weight, 0.0, 1.0)?;
    }

    if !weights.iter().any(|&w| w > 0.0) {
        return Err(ValidationError::ConstraintViolation {
            fields: names(),
            message: "no candidate has a positive weight".to_string(),
        });
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > validation::WEIGHT_SUM_TOLERANCE {
        return Err(ValidationError::ConstraintViolation {
            fields: names(),
            message: format!(
                "weights sum to {} (expected 1 within {})",
                sum,
                validation::WEIGHT_SUM_TOLERANCE
            ),
        });
    }

    Ok(())
}
