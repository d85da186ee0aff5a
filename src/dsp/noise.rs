//! White-noise source shared by every voice.
//!
//! Two seconds of independent uniform samples in [-1, 1], generated once per
//! engine and looped. Voices only hold a read cursor, so a burst costs no RNG
//! work on the render thread.

use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Length of the shared noise loop.
pub const NOISE_SECONDS: f32 = 2.0;

/// Fill a fresh noise buffer. `seed` makes it reproducible (tests).
pub fn noise_buffer(sample_rate: f32, seed: Option<u64>) -> Arc<[f32]> {
    let len = ((sample_rate * NOISE_SECONDS) as usize).max(1);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    (0..len).map(|_| rng.gen_range(-1.0f32..=1.0)).collect()
}

/// Looping reader over a shared noise buffer.
pub struct NoiseLoop {
    buffer: Arc<[f32]>,
    position: usize,
}

impl NoiseLoop {
    pub fn new(buffer: Arc<[f32]>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.buffer[self.position];
        self.position += 1;
        if self.position == self.buffer.len() {
            self.position = 0;
        }
        sample
    }
}
