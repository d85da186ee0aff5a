//! Waveshaping
//!
//! A waveshaper maps each sample through a fixed transfer curve:
//!   output = curve(input)
//!
//! The curve here is a steep hyperbolic saturator:
//!
//!   curve(x) = (3 + k) · x · 57° / (π + k · |x|)      (57° expressed in radians)
//!
//! With k = 100 the slope at the origin is about 33, so anything louder than a
//! whisper lands on the knee and picks up dense odd harmonics. The curve is
//! odd-symmetric, so no even harmonics and no DC offset.
//!
//! # Table lookup
//!
//! The curve is sampled once into a table (44100 points spanning [-1, 1]).
//! Lookup maps the input onto the table index with linear interpolation and
//! holds the end values outside [-1, 1]:
//!
//!   v = (n - 1) / 2 · (x + 1)
//!
//! # Oversampling
//!
//! A curve this steep creates harmonics far above Nyquist, which fold back as
//! inharmonic aliasing. `WaveShaper` runs the curve at 4x the sample rate:
//!
//!   x[n] ──► linear upsample ×4 ──► curve ──► 2× SVF low-pass ──► keep 1 of 4
//!
//! The low-pass pair sits just under the original Nyquist frequency.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::dsp::filter::SVFilter;

/// Number of points in the shared curve table.
pub const CURVE_LEN: usize = 44_100;
/// Distortion amount baked into the shared curve.
pub const CURVE_AMOUNT: f32 = 100.0;

const OVERSAMPLE: usize = 4;

/// Build the saturation table for a given amount.
pub fn make_curve(amount: f32, len: usize) -> Vec<f32> {
    let len = len.max(2);
    let deg = PI / 180.0;

    (0..len)
        .map(|i| {
            let x = (i as f32 * 2.0) / len as f32 - 1.0;
            (3.0 + amount) * x * 57.0 * deg / (PI + amount * x.abs())
        })
        .collect()
}

/// Look `x` up in `curve`, interpolating between points.
#[inline]
pub fn shape(curve: &[f32], x: f32) -> f32 {
    let last = curve.len() - 1;
    let v = last as f32 * 0.5 * (x + 1.0);

    if !(v > 0.0) {
        // also catches NaN
        return curve[0];
    }
    if v >= last as f32 {
        return curve[last];
    }

    let index = v as usize;
    let frac = v - index as f32;
    let a = curve[index];
    let b = curve[index + 1];
    a + (b - a) * frac
}

/// Oversampled table waveshaper.
///
/// The curve is shared read-only between every voice.
pub struct WaveShaper {
    curve: Arc<[f32]>,
    previous: f32,
    anti_alias: [SVFilter; 2],
}

impl WaveShaper {
    pub fn new(curve: Arc<[f32]>, sample_rate: f32) -> Self {
        let os_rate = sample_rate * OVERSAMPLE as f32;
        let cutoff = 0.45 * sample_rate;

        Self {
            curve,
            previous: 0.0,
            anti_alias: [
                SVFilter::lowpass(cutoff, os_rate),
                SVFilter::lowpass(cutoff, os_rate),
            ],
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut out = 0.0;

        for step in 1..=OVERSAMPLE {
            let t = step as f32 / OVERSAMPLE as f32;
            let x = self.previous + (input - self.previous) * t;
            let mut y = shape(&self.curve, x);
            for filter in &mut self.anti_alias {
                y = filter.process(y);
            }
            out = y;
        }

        self.previous = input;
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.previous = 0.0;
        for filter in &mut self.anti_alias {
            filter.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> Vec<f32> {
        make_curve(CURVE_AMOUNT, CURVE_LEN)
    }

    #[test]
    fn curve_is_odd_and_bounded() {
        let curve = curve();
        for x in [0.01f32, 0.1, 0.5, 0.9] {
            let pos = shape(&curve, x);
            let neg = shape(&curve, -x);
            assert!((pos + neg).abs() < 2e-3, "asymmetric at {x}: {pos} vs {neg}");
        }
        assert!(curve.iter().all(|v| v.abs() < 1.0));
    }

    #[test]
    fn small_signals_are_amplified_hard() {
        let curve = curve();
        // slope near the origin is roughly 103 · 0.995 / π ≈ 32.6
        let y = shape(&curve, 0.01);
        assert!(y > 0.2 && y < 0.35, "got {y}");
    }

    #[test]
    fn out_of_range_input_holds_the_ends() {
        let curve = curve();
        assert_eq!(shape(&curve, 5.0), curve[CURVE_LEN - 1]);
        assert_eq!(shape(&curve, -5.0), curve[0]);
        assert_eq!(shape(&curve, f32::NAN), curve[0]);
    }

    #[test]
    fn oversampled_shaper_stays_finite_and_bounded() {
        let mut shaper = WaveShaper::new(curve().into(), 48_000.0);
        let mut buffer: Vec<f32> = (0..4096)
            .map(|i| (i as f32 * 0.37).sin() * 1.5)
            .collect();
        shaper.render(&mut buffer);

        for &s in &buffer {
            assert!(s.is_finite());
            assert!(s.abs() < 1.2, "overshoot {s}");
        }
    }
}
