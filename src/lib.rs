//! IMD-Sim: synthetic Insulation Monitoring Device output traces
//!
//! This library generates time-series data that mimics the two status outputs
//! of an IMD: the PWM-modulated MHS channel and the binary OKHS channel. It
//! features:
//!
//! - A mode scheduler that draws operating modes (normal, undervoltage,
//!   self-test, device error, ground fault) under a weighted distribution
//! - A pure segment renderer using phase-accumulation PWM synthesis
//! - Explicit configuration with validation and TOML/environment loading
//! - An injectable random source for reproducible or scripted sessions
//! - JSON and CSV export of the resulting sample records
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use imd_sim::{generate_session, RngSource, SimulationConfig};
//! use imd_sim::export::{export_to_path, ExportFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SimulationConfig::default();
//!     let trace = generate_session(config, RngSource::seeded(42), 1_700_000_000_000)?;
//!
//!     println!("{} segments, {} samples", trace.segments.len(), trace.sample_count());
//!     export_to_path(&trace.records, std::path::Path::new("trace.json"), ExportFormat::Json)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod export;
pub mod imd;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::config::{ConfigLoader, SimulationConfig};
pub use error::{ImdError, ImdResult};
pub use imd::simulation::{generate_session, render_segment, ModeScheduler, RngSource, ScriptedSource};
pub use imd::{
    OperatingMode, RandomSource, SampleRecord, SegmentSpec, SegmentSummary, SelfTestOutcome,
    SessionTrace, VoltageLevel,
};

pub use utils::time::{current_timestamp_millis, TimeProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Synthetic IMD MHS/OKHS output trace generator".to_string(),
        features: vec![
            "Weighted operating-mode scheduling".to_string(),
            "Phase-accumulation PWM rendering".to_string(),
            "Self-test good/bad sub-model".to_string(),
            "TOML and environment configuration".to_string(),
            "JSON and CSV export".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
