/*
Resonator Bank
==============

One feedback comb per chord member, all fed from the same excitation:

                 ┌──────────────────────────────────────────┐
                 ▼                                          │
    x ──► ×0.5 ──► + ──► delay (1/f s) ──┬──► low-pass ──► × fb
                                         │
                                         └──► pan ──► L / R

    fb = 0.90 + resonance · 0.09

The loop period is one period of f, so the comb rings at f and its
harmonics. Feedback stays strictly below 1.0: at 0.99 a note rings for
hundreds of milliseconds, at 1.0 it would never decay.

The in-loop low-pass sits at 20 kHz with no resonance peak. It does not
audibly damp the tail; it only keeps the loop gain below unity up at
Nyquist. Its low-frequency group delay is subtracted from the delay time
so the loop still lands on f.

Pan alternates by position: even members lean left, odd members lean
right, both scaled by width (0 = mono, 1 = hard).
*/

use std::f32::consts::PI;

use crate::dsp::delay::DelayLine;
use crate::dsp::filter::SVFilter;
use crate::dsp::mix::equal_power_gains;
use crate::params;

pub const INPUT_GAIN: f32 = 0.5;
pub const LOOP_CUTOFF: f32 = 20_000.0;
/// Lowest frequency a delay line is sized for.
const MIN_FREQUENCY: f32 = 20.0;

pub struct Resonator {
    delay: DelayLine,
    delay_samples: f32,
    feedback: f32,
    damping: SVFilter,
    gain_l: f32,
    gain_r: f32,
}

impl Resonator {
    /// Allocates the delay buffer: build on the control thread.
    pub fn new(frequency: f32, index: usize, resonance: f32, width: f32, sample_rate: f32) -> Self {
        let frequency = frequency.max(MIN_FREQUENCY);
        let period = sample_rate / frequency;

        let cutoff = LOOP_CUTOFF.min(0.49 * sample_rate);
        // two coincident poles at the prewarped cutoff: 1/g samples at DC
        let filter_delay = 1.0 / (PI * cutoff / sample_rate).tan();

        let (gain_l, gain_r) = equal_power_gains(pan_position(index, width));

        Self {
            delay: DelayLine::new(period.ceil() as usize + 1),
            delay_samples: (period - filter_delay).max(1.0),
            feedback: params::feedback_gain(resonance),
            damping: SVFilter::lowpass(cutoff, sample_rate),
            gain_l,
            gain_r,
        }
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn pan_gains(&self) -> (f32, f32) {
        (self.gain_l, self.gain_r)
    }

    /// Feed one excitation sample, return the (mono) delay output.
    #[inline]
    pub fn process(&mut self, excitation: f32) -> f32 {
        let delayed = self.delay.read_interpolated(self.delay_samples);
        let looped = self.damping.process(delayed) * self.feedback;
        self.delay.write(excitation * INPUT_GAIN + looped);
        delayed
    }

    /// Feed one sample and return the panned pair.
    #[inline]
    pub fn process_stereo(&mut self, excitation: f32) -> (f32, f32) {
        let y = self.process(excitation);
        (y * self.gain_l, y * self.gain_r)
    }
}

/// Pan for the `index`-th chord member.
#[inline]
pub fn pan_position(index: usize, width: f32) -> f32 {
    let side = if index % 2 == 0 { -1.0 } else { 1.0 };
    side * params::unit(width)
}
