//! Panning and summing primitives.

/*
Equal-Power Panning
===================

A mono signal is placed in the stereo field by splitting it into two gains
that keep the total POWER constant:

    x      = (pan + 1) / 2            pan ∈ [-1, +1]
    left   = cos(x · π/2)
    right  = sin(x · π/2)

  pan = -1   →  left 1.0,   right 0.0
  pan =  0   →  left 0.707, right 0.707   (-3 dB each, same loudness)
  pan = +1   →  left 0.0,   right 1.0

Linear panning (left = 1 - x, right = x) dips by 3 dB in the middle; equal
power does not, which matters when resonators are spread and re-centred by
the width control.
*/

use std::f32::consts::FRAC_PI_2;

/// Left/right gains for a pan position in `[-1, 1]` (clamped).
#[inline]
pub fn equal_power_gains(pan: f32) -> (f32, f32) {
    let x = (pan.clamp(-1.0, 1.0) + 1.0) * 0.5;
    let angle = x * FRAC_PI_2;
    (angle.cos(), angle.sin())
}

/// `out += input * gain`
#[inline]
pub fn add_scaled(out: &mut [f32], input: &[f32], gain: f32) {
    debug_assert_eq!(out.len(), input.len());

    for (o, &i) in out.iter_mut().zip(input) {
        *o += i * gain;
    }
}

/// Multiply a buffer in place.
#[inline]
pub fn scale(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}
