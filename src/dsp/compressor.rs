//! Feed-forward dynamics compressor.
//!
//! Peak envelope follower (separate attack / release coefficients) feeding a
//! static gain computer:
//!
//!   below threshold:  gain = 0 dB
//!   above threshold:  gain = (threshold - level) · (1 - 1/ratio)
//!
//! with an optional quadratic knee around the threshold. Stereo channels share
//! one detector so the image does not wander.
//!
//! Make-up gain follows the browser compressor convention: the gain needed to
//! bring a full-scale input back to 0 dBFS, raised to the power 0.6. With the
//! bus settings (-45 dB, 20:1) that is about +25.7 dB, which is what turns the
//! "limiter" into the squashed, tail-lifting sound the bus is after.
//!
//! The detector runs LOOKAHEAD seconds ahead of the audio path. Without it
//! the make-up gain would reach the output before the attack has caught an
//! onset, and the first millisecond of every note would leave about 25 dB
//! too hot.
//!
//! ```text
//!   in ──┬──────────────► delay (6 ms) ──► × gain ──► out
//!        └──► |peak| ──► envelope ──► gain computer ──┘
//! ```

use crate::dsp::delay::DelayLine;

/// Detector lead over the audio path, in seconds.
pub const LOOKAHEAD: f32 = 0.006;

#[derive(Debug, Clone)]
pub struct Compressor {
    /// Threshold in dB (typical: -60 to 0).
    threshold: f32,
    /// Compression ratio (e.g., 20.0 = 20:1).
    ratio: f32,
    /// Knee width in dB (0 = hard knee).
    knee: f32,
    /// Attack time in seconds.
    attack: f32,
    /// Release time in seconds.
    release: f32,

    attack_coef: f32,
    release_coef: f32,
    makeup_db: f32,

    envelope: f32, // Current detector level (linear)

    lookahead: usize,
    delay_l: DelayLine,
    delay_r: DelayLine,
}

impl Compressor {
    pub fn new(
        sample_rate: f32,
        threshold: f32,
        knee: f32,
        ratio: f32,
        attack: f32,
        release: f32,
    ) -> Self {
        let lookahead = ((LOOKAHEAD * sample_rate).round() as usize).max(1);
        let mut comp = Self {
            threshold: threshold.clamp(-100.0, 0.0),
            ratio: ratio.clamp(1.0, 20.0),
            knee: knee.clamp(0.0, 40.0),
            attack: attack.clamp(0.0, 1.0),
            release: release.clamp(0.0, 1.0),
            attack_coef: 0.0,
            release_coef: 0.0,
            makeup_db: 0.0,
            envelope: 0.0,
            lookahead,
            delay_l: DelayLine::new(lookahead),
            delay_r: DelayLine::new(lookahead),
        };
        comp.set_sample_rate(sample_rate);
        comp.makeup_db = -0.6 * comp.compute_gain(0.0);
        comp
    }

    /// The bus setting: low threshold, hard knee, 20:1, 1 ms / 100 ms.
    pub fn limiter(sample_rate: f32) -> Self {
        Self::new(sample_rate, -45.0, 0.0, 20.0, 0.001, 0.1)
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let coef = |time: f32| {
            let samples = time * sample_rate;
            if samples <= 1.0 {
                0.0
            } else {
                (-1.0 / samples).exp()
            }
        };
        self.attack_coef = coef(self.attack);
        self.release_coef = coef(self.release);
    }

    #[inline]
    fn linear_to_db(linear: f32) -> f32 {
        if linear <= 1e-6 {
            -120.0
        } else {
            20.0 * linear.log10()
        }
    }

    #[inline]
    fn db_to_linear(db: f32) -> f32 {
        10.0_f32.powf(db / 20.0)
    }

    /// Static gain change (dB, <= 0) for an input level in dB.
    #[inline]
    fn compute_gain(&self, input_db: f32) -> f32 {
        let slope = 1.0 - 1.0 / self.ratio;

        if self.knee <= 0.0 {
            if input_db <= self.threshold {
                0.0
            } else {
                (self.threshold - input_db) * slope
            }
        } else {
            let half_knee = self.knee / 2.0;
            let knee_start = self.threshold - half_knee;
            let knee_end = self.threshold + half_knee;

            if input_db <= knee_start {
                0.0
            } else if input_db >= knee_end {
                (self.threshold - input_db) * slope
            } else {
                let x = input_db - knee_start;
                -slope * x * x / (2.0 * self.knee)
            }
        }
    }

    /// Process a stereo sample pair. The returned pair is the input from
    /// [`latency`](Self::latency) samples ago.
    #[inline]
    pub fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let input_level = left.abs().max(right.abs());

        let coef = if input_level > self.envelope {
            self.attack_coef
        } else {
            self.release_coef
        };
        self.envelope = coef * self.envelope + (1.0 - coef) * input_level;

        let reduction_db = self.compute_gain(Self::linear_to_db(self.envelope));
        let gain = Self::db_to_linear(reduction_db + self.makeup_db);

        let delayed_l = self.delay_l.next_sample(left, self.lookahead);
        let delayed_r = self.delay_r.next_sample(right, self.lookahead);
        (delayed_l * gain, delayed_r * gain)
    }

    /// Audio path delay in samples.
    pub fn latency(&self) -> usize {
        self.lookahead
    }

    /// Process a block of stereo audio in-place.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (out_l, out_r) = self.process(*l, *r);
            *l = out_l;
            *r = out_r;
        }
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
        self.delay_l.reset();
        self.delay_r.reset();
    }

    /// Current gain reduction in dB (positive number, for metering).
    pub fn gain_reduction(&self) -> f32 {
        -self.compute_gain(Self::linear_to_db(self.envelope))
    }

    pub fn makeup_db(&self) -> f32 {
        self.makeup_db
    }
}
