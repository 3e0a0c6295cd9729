//! Waveform synthesis engine
//! Location: src/imd/simulation/mod.rs

pub mod modes;
pub mod random;
pub mod segment_renderer;
pub mod mode_scheduler;

pub use modes::{derive_parameters, mode_candidates, ModeCandidate, ModeParameters};
pub use random::{RngSource, ScriptedSource};
pub use segment_renderer::render_segment;
pub use mode_scheduler::{generate_session, ModeScheduler};
