//! Parameter snapshot and the fixed mappings from knob values to engine
//! quantities.
//!
//! Every continuous control lives in `[0, 1]`. Out-of-range or non-finite
//! input is clamped, never rejected.

use crate::chord::{chord_frequencies, ChordQuality, PitchClass};

/// Lowest and highest octave a preset may select.
pub const OCTAVE_RANGE: (i32, i32) = (3, 5);

/// Immutable capture of every control at one instant.
///
/// Voices copy this at trigger time; the shared graph receives a fresh one on
/// every knob move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// FM index and noise splash amount
    pub drive: f32,
    /// Motor (LFO) rate
    pub flow: f32,
    /// Motor depth on the FM index
    pub depth: f32,
    /// Resonator feedback and wet/dry balance
    pub resonance: f32,
    /// Q of the all-pass disperser stages
    pub disperser: f32,
    /// Stereo spread of the resonators
    pub width: f32,
    pub root: PitchClass,
    pub quality: ChordQuality,
    pub octave: i32,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            drive: 0.85,
            flow: 0.35,
            depth: 0.65,
            resonance: 0.95,
            disperser: 0.70,
            width: 1.0,
            root: PitchClass::C,
            quality: ChordQuality::Maj7,
            octave: 4,
        }
    }
}

impl Snapshot {
    /// Clamp every continuous field into `[0, 1]`.
    ///
    /// The octave is left alone: the frequency model extrapolates.
    pub fn sanitized(mut self) -> Self {
        self.drive = unit(self.drive);
        self.flow = unit(self.flow);
        self.depth = unit(self.depth);
        self.resonance = unit(self.resonance);
        self.disperser = unit(self.disperser);
        self.width = unit(self.width);
        self
    }

    /// Same snapshot re-targeted at another root/octave (keyboard trigger).
    pub fn with_note(mut self, root: PitchClass, octave: i32) -> Self {
        self.root = root;
        self.octave = octave;
        self
    }

    pub fn frequencies(&self) -> Vec<f32> {
        chord_frequencies(self.root, self.quality, self.octave)
    }
}

/// Clamp to `[0, 1]`; NaN collapses to zero.
#[inline]
pub fn unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Resonator loop feedback: 0.90 at rest, 0.99 at full resonance.
///
/// Always strictly below 1.0, otherwise the comb loop diverges.
#[inline]
pub fn feedback_gain(resonance: f32) -> f32 {
    0.90 + unit(resonance) * 0.09
}

/// Level of the unresonated exciter in the voice mix.
#[inline]
pub fn dry_gain(resonance: f32) -> f32 {
    (1.0 - unit(resonance)) * 0.2
}

/// Level of the summed resonator bank in the voice mix.
#[inline]
pub fn wet_gain(resonance: f32) -> f32 {
    unit(resonance) * 3.0
}

/// Motor rate in Hz.
#[inline]
pub fn motor_rate(flow: f32) -> f32 {
    0.1 + unit(flow) * 14.0
}

/// Quality factor shared by every disperser stage.
#[inline]
pub fn disperser_q(disperser: f32) -> f32 {
    1.0 + unit(disperser) * 10.0
}

/// Peak FM deviation (Hz) for a given carrier reference.
#[inline]
pub fn fm_index(base_hz: f32, drive: f32) -> f32 {
    base_hz * (4.0 + unit(drive) * 20.0)
}

/// How far the motor pushes the FM deviation (Hz per unit of motor output).
#[inline]
pub fn motor_depth(depth: f32) -> f32 {
    1200.0 * unit(depth)
}

/// Peak of the noise splash at onset.
#[inline]
pub fn splash_gain(drive: f32) -> f32 {
    0.8 * unit(drive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_spans_stable_range() {
        assert!((feedback_gain(0.0) - 0.90).abs() < 1e-6);
        assert!((feedback_gain(1.0) - 0.99).abs() < 1e-6);
        assert!((feedback_gain(1.5) - 0.99).abs() < 1e-6);
        assert!((feedback_gain(-3.0) - 0.90).abs() < 1e-6);
        assert!((feedback_gain(f32::NAN) - 0.90).abs() < 1e-6);
        assert!(feedback_gain(f32::INFINITY) < 1.0);
    }

    #[test]
    fn feedback_is_strictly_increasing() {
        let mut previous = feedback_gain(0.0);
        for step in 1..=100 {
            let current = feedback_gain(step as f32 / 100.0);
            assert!(current > previous, "not increasing at step {step}");
            assert!((0.90..=0.99 + 1e-6).contains(&current));
            previous = current;
        }
    }

    #[test]
    fn resonance_zero_is_all_dry() {
        assert!((dry_gain(0.0) - 0.2).abs() < 1e-6);
        assert_eq!(wet_gain(0.0), 0.0);
    }

    #[test]
    fn resonance_one_is_all_wet() {
        assert_eq!(dry_gain(1.0), 0.0);
        assert!((wet_gain(1.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn motor_rate_endpoints() {
        assert!((motor_rate(0.0) - 0.1).abs() < 1e-6);
        assert!((motor_rate(1.0) - 14.1).abs() < 1e-5);
    }

    #[test]
    fn disperser_q_endpoints() {
        assert!((disperser_q(0.0) - 1.0).abs() < 1e-6);
        assert!((disperser_q(1.0) - 11.0).abs() < 1e-6);
    }

    #[test]
    fn sanitized_clamps_every_control() {
        let wild = Snapshot {
            drive: 4.0,
            flow: -1.0,
            depth: f32::NAN,
            resonance: 1.5,
            disperser: 0.5,
            width: f32::NEG_INFINITY,
            ..Snapshot::default()
        }
        .sanitized();

        assert_eq!(wild.drive, 1.0);
        assert_eq!(wild.flow, 0.0);
        assert_eq!(wild.depth, 0.0);
        assert_eq!(wild.resonance, 1.0);
        assert_eq!(wild.disperser, 0.5);
        assert_eq!(wild.width, 0.0);
    }
}
