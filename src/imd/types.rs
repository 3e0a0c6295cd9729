// src/imd/types.rs
//! Core types for the IMD output model

use std::fmt;

use serde::{Deserialize, Serialize};

/// One observation of both IMD output channels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SampleRecord {
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    /// PWM status channel (MHS)
    pub mhs_voltage: f64,
    /// Status-level channel (OKHS), constant within a segment
    pub okhs_voltage: f64,
}

/// IMD operating condition, one per PWM frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    /// Insulation resistance healthy
    Normal,
    /// Supply voltage below the IMD's operating range
    Undervoltage,
    /// Device self-test (SST)
    SelfTest,
    /// Internal device fault
    DeviceError,
    /// Insulation fault to ground detected
    GroundFault,
}

/// Logic level of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoltageLevel {
    /// Resolves to `SignalConfig::v_high`
    High,
    /// Resolves to `SignalConfig::v_low`
    Low,
}

/// Branch taken by a self-test (SST) segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfTestOutcome {
    /// Short duty, OKHS high
    Good,
    /// Long duty, OKHS low
    Bad,
}

/// Fully specified parameters of one segment, built right before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSpec {
    /// Operating mode being rendered
    pub mode: OperatingMode,
    /// PWM frequency of the MHS channel
    pub frequency_hz: f64,
    /// Share of each PWM period spent high, in `[0, 100]`
    pub duty_cycle_percent: f64,
    /// Level held on OKHS for the whole segment
    pub okhs: VoltageLevel,
    /// Simulated length in seconds
    pub duration_s: f64,
    /// Branch taken when `mode` is the self-test
    pub self_test: Option<SelfTestOutcome>,
}

/// Samples of one segment plus the instant where the next one starts
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSegment {
    /// One record per sample, in time order
    pub records: Vec<SampleRecord>,
    /// Timestamp the following segment starts at
    pub next_start_ms: u64,
}

/// Bookkeeping for one rendered segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    /// Operating mode
    pub mode: OperatingMode,
    /// PWM frequency
    pub frequency_hz: f64,
    /// Drawn duty cycle
    pub duty_cycle_percent: f64,
    /// OKHS level
    pub okhs: VoltageLevel,
    /// Self-test branch, if any
    pub self_test: Option<SelfTestOutcome>,
    /// Timestamp of the first sample
    pub start_ms: u64,
    /// Rendered (possibly clipped) length
    pub duration_s: f64,
    /// Records emitted for this segment
    pub sample_count: usize,
}

/// Complete output of one simulated session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionTrace {
    /// All samples of the session, in time order
    pub records: Vec<SampleRecord>,
    /// One summary per rendered segment
    pub segments: Vec<SegmentSummary>,
    /// Instant immediately after the last sample
    pub end_ms: u64,
}

impl OperatingMode {
    /// All modes in ascending default-frequency order
    pub const ALL: [OperatingMode; 5] = [
        OperatingMode::Normal,
        OperatingMode::Undervoltage,
        OperatingMode::SelfTest,
        OperatingMode::DeviceError,
        OperatingMode::GroundFault,
    ];

    /// Key of the mode's entry in `SimulationConfig`
    pub fn config_key(&self) -> &'static str {
        match self {
            OperatingMode::Normal => "modes.normal",
            OperatingMode::Undervoltage => "modes.undervoltage",
            OperatingMode::SelfTest => "self_test",
            OperatingMode::DeviceError => "modes.device_error",
            OperatingMode::GroundFault => "modes.ground_fault",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingMode::Normal => write!(f, "NORMAL"),
            OperatingMode::Undervoltage => write!(f, "UNDERVOLTAGE"),
            OperatingMode::SelfTest => write!(f, "SELF-TEST"),
            OperatingMode::DeviceError => write!(f, "DEVICE-ERROR"),
            OperatingMode::GroundFault => write!(f, "GROUND-FAULT"),
        }
    }
}

impl fmt::Display for VoltageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoltageLevel::High => write!(f, "HIGH"),
            VoltageLevel::Low => write!(f, "LOW"),
        }
    }
}

impl SegmentSummary {
    /// Summarize `spec` as rendered from `start_ms`
    pub fn from_spec(spec: &SegmentSpec, start_ms: u64, sample_count: usize) -> Self {
        Self {
            mode: spec.mode,
            frequency_hz: spec.frequency_hz,
            duty_cycle_percent: spec.duty_cycle_percent,
            okhs: spec.okhs,
            self_test: spec.self_test,
            start_ms,
            duration_s: spec.duration_s,
            sample_count,
        }
    }
}

impl SessionTrace {
    /// Empty trace starting at `start_ms` with room for `samples` records
    pub fn with_capacity(samples: usize, start_ms: u64) -> Self {
        Self {
            records: Vec::with_capacity(samples),
            segments: Vec::new(),
            end_ms: start_ms,
        }
    }

    /// Number of records emitted so far
    pub fn sample_count(&self) -> usize {
        self.records.len()
    }

    /// Sum of rendered segment durations
    pub fn total_duration_s(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_s).sum()
    }

    /// Append a rendered segment and advance the end instant
    pub fn push_segment(&mut self, summary: SegmentSummary, rendered: RenderedSegment) {
        self.records.extend(rendered.records);
        self.end_ms = rendered.next_start_ms;
        self.segments.push(summary);
    }

    /// Drop the segment bookkeeping and keep the samples
    pub fn into_records(self) -> Vec<SampleRecord> {
        self.records
    }
}
