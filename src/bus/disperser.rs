/*
Disperser
=========

Sixteen second-order all-pass stages in series, per channel:

    in ──► AP(600 Hz) ──► AP(800 Hz) ──► ... ──► AP(3600 Hz) ──► out

An all-pass leaves magnitude untouched and only smears phase around its
centre. Stacking high-Q stages across the mid band spreads each transient
into a chirp, which is what turns the resonator output into a metallic
"zap".

Q is shared by every stage and automated; coefficients are recomputed at
most once per `UPDATE_INTERVAL` samples, and only if Q actually moved.
*/

use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz};

use crate::dsp::AutomationParam;

pub const STAGES: usize = 16;
pub const INITIAL_Q: f32 = 4.0;
const UPDATE_INTERVAL: usize = 64;

/// Centre frequency of stage `index`.
#[inline]
pub fn stage_frequency(index: usize) -> f32 {
    600.0 + 200.0 * index as f32
}

struct Stage {
    frequency: f32,
    left: DirectForm2Transposed<f32>,
    right: DirectForm2Transposed<f32>,
}

pub struct Disperser {
    stages: Vec<Stage>,
    q: AutomationParam,
    current_q: f32,
    sample_rate: f32,
}

impl Disperser {
    pub fn new(sample_rate: f32) -> Self {
        let stages = (0..STAGES)
            .map(|i| {
                let frequency = stage_frequency(i);
                let coeffs = allpass(sample_rate, frequency, INITIAL_Q).unwrap_or(BYPASS);
                Stage {
                    frequency,
                    left: DirectForm2Transposed::<f32>::new(coeffs),
                    right: DirectForm2Transposed::<f32>::new(coeffs),
                }
            })
            .collect();

        Self {
            stages,
            q: AutomationParam::new(INITIAL_Q).with_range(0.1, 100.0),
            current_q: INITIAL_Q,
            sample_rate,
        }
    }

    /// Glide every stage's Q toward `q` starting at `time`.
    pub fn retarget(&mut self, q: f32, time: f64, time_constant: f64) {
        self.q.set_target_at_time(q, time, time_constant);
    }

    pub fn q_target(&self) -> f32 {
        self.q.settled_value()
    }

    pub fn current_q(&self) -> f32 {
        self.current_q
    }

    pub fn process(&mut self, left: &mut [f32], right: &mut [f32], start_time: f64) {
        debug_assert_eq!(left.len(), right.len());
        let dt = 1.0 / self.sample_rate as f64;

        let mut offset = 0;
        for (l_chunk, r_chunk) in left
            .chunks_mut(UPDATE_INTERVAL)
            .zip(right.chunks_mut(UPDATE_INTERVAL))
        {
            let q = self.q.value_at(start_time + offset as f64 * dt);
            self.update_q(q);

            for stage in &mut self.stages {
                for sample in l_chunk.iter_mut() {
                    *sample = stage.left.run(*sample);
                }
                for sample in r_chunk.iter_mut() {
                    *sample = stage.right.run(*sample);
                }
            }
            offset += l_chunk.len();
        }
    }

    fn update_q(&mut self, q: f32) {
        if (q - self.current_q).abs() < 1e-4 {
            return;
        }

        for stage in &mut self.stages {
            if let Ok(coeffs) = allpass(self.sample_rate, stage.frequency, q) {
                stage.left.update_coefficients(coeffs);
                stage.right.update_coefficients(coeffs);
            }
        }
        self.current_q = q;
    }
}

const BYPASS: Coefficients<f32> = Coefficients {
    a1: 0.0,
    a2: 0.0,
    b0: 1.0,
    b1: 0.0,
    b2: 0.0,
};

fn allpass(sample_rate: f32, frequency: f32, q: f32) -> Result<Coefficients<f32>, biquad::Errors> {
    Coefficients::<f32>::from_params(biquad::Type::AllPass, sample_rate.hz(), frequency.hz(), q)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    #[test]
    fn centres_ascend() {
        assert_eq!(stage_frequency(0), 600.0);
        assert_eq!(stage_frequency(15), 3_600.0);
    }

    #[test]
    fn preserves_sine_amplitude() {
        let mut disperser = Disperser::new(SR);
        let freq = 1_000.0;
        let n = 48_000;

        let mut left: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / SR).sin())
            .collect();
        let mut right = left.clone();
        disperser.process(&mut left, &mut right, 0.0);

        // skip the transient, then compare RMS against the input's (1/√2)
        let tail = &left[n / 2..];
        let rms = (tail.iter().map(|s| s * s).sum::<f32>() / tail.len() as f32).sqrt();
        assert!((rms - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.02, "rms {rms}");
        assert_eq!(left, right);
    }

    #[test]
    fn q_glides_toward_target() {
        let mut disperser = Disperser::new(SR);
        disperser.retarget(11.0, 0.0, 0.1);
        assert_eq!(disperser.q_target(), 11.0);

        let mut l = vec![0.0; 4_800];
        let mut r = vec![0.0; 4_800];
        disperser.process(&mut l, &mut r, 0.0);
        let q = disperser.current_q();
        assert!(q > INITIAL_Q && q < 11.0, "q = {q}");
    }
}
