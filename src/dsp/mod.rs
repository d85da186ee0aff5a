//! Low-level DSP primitives used by the voice and the shared bus.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside voice structs. They stay focused
//! on the signal-processing math; scheduling and routing live one layer up.

/// Sample-accurate parameter automation (ramps, targets, set-value events).
pub mod automation;
/// Feed-forward dynamics compressor.
pub mod compressor;
/// Fractional delay line for comb resonators.
pub mod delay;
/// Waveshaper transfer curve with 4x oversampling.
pub mod distortion;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Equal-power panning and gain-scaled summing.
pub mod mix;
/// Shared white-noise buffer.
pub mod noise;
/// Phase-accumulating oscillator waveforms.
pub mod oscillator;

pub use automation::AutomationParam;
