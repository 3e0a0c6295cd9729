// src/error.rs
//! Unified error handling for the IMD simulator
//!
//! Every fallible operation in the crate returns [`ImdResult`]. Failures are
//! deterministic given their inputs, so no variant carries retry information:
//! either a complete, internally consistent trace is produced or generation
//! aborts before any record is emitted.

use std::path::PathBuf;

use thiserror::Error;

use crate::utils::validation::ValidationError;

/// Unified error type for the IMD simulator
#[derive(Debug, Error)]
pub enum ImdError {
    /// Malformed scheduler configuration; generation never starts
    #[error("[CONFIG] invalid '{field}': {reason}")]
    Configuration {
        /// Dotted path of the offending key, e.g. `modes.normal.weight`
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// Malformed segment parameters reaching the renderer
    #[error("[DOMAIN] invalid segment parameter '{parameter}': {reason}")]
    Domain {
        /// Segment parameter that is out of range
        parameter: String,
        /// What is wrong with it
        reason: String,
    },

    /// The random source could not produce a draw
    #[error("[RANDOM] {0}")]
    RandomSource(String),

    /// Writing the trace to its destination failed
    #[error("[EXPORT] failed to write {}: {source}", .path.display())]
    Export {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Raw I/O failure outside of a named export target
    #[error("[IO] {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization failure (JSON or CSV)
    #[error("[SERIALIZE] {0}")]
    Serialization(String),

    /// Configuration file could not be read or deserialized
    #[error("[CONFIG-LOAD] {0}")]
    ConfigLoad(String),
}

/// Result type alias for IMD operations
pub type ImdResult<T> = Result<T, ImdError>;

impl ImdError {
    /// Shorthand for a configuration error on a named field
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ImdError::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a renderer domain error on a named parameter
    pub fn domain(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        ImdError::Domain {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that indicate a config or mode-table defect
    pub fn is_configuration(&self) -> bool {
        matches!(self, ImdError::Configuration { .. } | ImdError::ConfigLoad(_))
    }
}

impl From<ValidationError> for ImdError {
    fn from(err: ValidationError) -> Self {
        ImdError::Configuration {
            field: err.field().to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ImdError {
    fn from(err: serde_json::Error) -> Self {
        ImdError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for ImdError {
    fn from(err: csv::Error) -> Self {
        ImdError::Serialization(err.to_string())
    }
}

impl From<::config::ConfigError> for ImdError {
    fn from(err: ::config::ConfigError) -> Self {
        ImdError::ConfigLoad(err.to_string())
    }
}

/// Convenience trait for attaching an export path to I/O failures
pub trait IntoImdError<T> {
    /// Wrap an I/O error as [`ImdError::Export`] for `path`
    fn export_err(self, path: impl Into<PathBuf>) -> ImdResult<T>;
}

impl<T> IntoImdError<T> for Result<T, std::io::Error> {
    fn export_err(self, path: impl Into<PathBuf>) -> ImdResult<T> {
        self.map_err(|source| ImdError::Export {
            path: path.into(),
            source,
        })
    }
}
