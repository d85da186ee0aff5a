pub mod analysis; // Spectrum tap read by the visual layer
pub mod bus; // Shared, always-on effects graph
pub mod chord; // Pitch class + chord quality -> frequencies
pub mod display; // Playing / active-note notifications
pub mod dsp;
pub mod engine; // Controller, renderer and the clock they share
pub mod error;
pub mod params; // Parameter snapshot and control mappings
pub mod preset; // Validation of externally suggested presets
pub mod runtime; // cpal output host
pub mod synth; // Per-note voices

pub use chord::{chord_frequencies, ChordQuality, PitchClass};
pub use engine::{engine, Controller, EngineConfig, EngineParts, Renderer};
pub use error::EngineError;
pub use params::Snapshot;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
