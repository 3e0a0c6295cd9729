// src/imd/mod.rs
//! IMD output model: data types, the random-source seam and the waveform
//! synthesis engine (mode scheduler + segment renderer)

pub mod traits;
pub mod types;
pub mod simulation;

pub use traits::*;
pub use types::*;
