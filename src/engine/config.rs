use crate::analysis::{DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING};

/// Knobs that are fixed for the lifetime of one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Render rate when no device dictates one (offline rendering, tests).
    pub sample_rate: f32,
    /// Control → render queue depth. Triggers beyond it are dropped.
    pub command_capacity: usize,
    /// Render → control queue depth for finished voices.
    pub retire_capacity: usize,
    /// Registry capacity reserved up front, and the most voices that may be
    /// outstanding at once. Triggers beyond it are dropped.
    pub voice_capacity: usize,
    pub fft_size: usize,
    pub smoothing: f32,
    /// Seed for the shared noise buffer; `None` draws from the OS.
    pub noise_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            command_capacity: 256,
            retire_capacity: 256,
            voice_capacity: 64,
            fft_size: DEFAULT_FFT_SIZE,
            smoothing: DEFAULT_SMOOTHING,
            noise_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    pub fn retire_capacity(mut self, capacity: usize) -> Self {
        self.retire_capacity = capacity.max(1);
        self
    }

    pub fn voice_capacity(mut self, capacity: usize) -> Self {
        self.voice_capacity = capacity.max(1);
        self
    }

    pub fn fft_size(mut self, size: usize) -> Self {
        self.fft_size = size;
        self
    }

    pub fn smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = Some(seed);
        self
    }
}
