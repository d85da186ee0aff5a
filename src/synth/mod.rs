//! Per-note voices.
//!
//! A voice is built on the control thread (it allocates its delay lines
//! there), handed to the render thread through the command queue, rendered
//! until its disposal time, then handed back through the retire queue so the
//! control thread frees it.

pub mod envelope;
pub mod exciter;
pub mod message;
pub mod registry;
pub mod resonator;
pub mod voice;

use std::sync::Arc;

use crate::dsp::{distortion, noise};

pub use envelope::{VoicePhase, VoiceSchedule};
pub use message::{Command, ParamUpdate};
pub use registry::VoiceRegistry;
pub use voice::{Voice, VoiceId};

/// Write-once tables every voice reads from.
#[derive(Clone)]
pub struct VoiceResources {
    pub sample_rate: f32,
    /// Two seconds of white noise, looped by each splash.
    pub noise: Arc<[f32]>,
    /// Saturation curve, built once per engine.
    pub curve: Arc<[f32]>,
}

impl VoiceResources {
    pub fn new(sample_rate: f32, noise_seed: Option<u64>) -> Self {
        Self {
            sample_rate,
            noise: noise::noise_buffer(sample_rate, noise_seed),
            curve: distortion::make_curve(distortion::CURVE_AMOUNT, distortion::CURVE_LEN).into(),
        }
    }
}
