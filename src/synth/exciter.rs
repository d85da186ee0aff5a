/*
Exciter
=======

The raw metallic tone of one note: square-wave FM into a sine carrier, a
noise splash on top, all pushed through a hard saturator.

    base = root / 2

    modulator (square, 2·base) ──► × (index + motor · depth) ──┐
                                                               ▼
                                          carrier (sine, base + Δf) ──┐
                                                                      ├─► + ──► shaper (4x) ──► out
    noise loop ──► × splash(t) ───────────────────────────────────────┘

    index    = base · (4 + drive · 20)
    depth    = 1200 · depth
    splash   0.8 · drive at t0, exponential ramp to 0.01 at t0 + 100 ms

The 1:2 ratio with a square modulator gives sidebands at odd multiples of
2·base around the carrier, which is where the bell/metal colour comes from.
Every voice reads the same motor block, so concurrent notes wobble in phase.

All sources stop together at the voice's stop time; after that the exciter
emits silence.
*/

use crate::chord::root_frequency;
use crate::dsp::distortion::WaveShaper;
use crate::dsp::noise::NoiseLoop;
use crate::dsp::oscillator::OscillatorBlock;
use crate::dsp::AutomationParam;
use crate::params::{self, Snapshot};
use crate::synth::envelope::VoiceSchedule;
use crate::synth::VoiceResources;

/// Length of the noise splash.
pub const SPLASH_TIME: f64 = 0.1;
/// Level the splash decays to (and then holds until stop).
pub const SPLASH_FLOOR: f32 = 0.01;

pub struct Exciter {
    carrier: OscillatorBlock,
    modulator: OscillatorBlock,
    base_hz: f32,
    fm_index: f32,
    motor_depth: f32,
    noise: NoiseLoop,
    splash: AutomationParam,
    shaper: WaveShaper,
    start: f64,
    stop: f64,
    sample_rate: f32,
}

impl Exciter {
    pub fn new(snapshot: &Snapshot, schedule: &VoiceSchedule, resources: &VoiceResources) -> Self {
        let base_hz = root_frequency(snapshot.root, snapshot.octave) / 2.0;

        let mut splash = AutomationParam::new(0.0);
        splash.set_value_at_time(params::splash_gain(snapshot.drive), schedule.start);
        splash.exponential_ramp_to_value_at_time(SPLASH_FLOOR, schedule.start + SPLASH_TIME);

        Self {
            carrier: OscillatorBlock::sine(),
            modulator: OscillatorBlock::square(),
            base_hz,
            fm_index: params::fm_index(base_hz, snapshot.drive),
            motor_depth: params::motor_depth(snapshot.depth),
            noise: NoiseLoop::new(resources.noise.clone()),
            splash,
            shaper: WaveShaper::new(resources.curve.clone(), resources.sample_rate),
            start: schedule.start,
            stop: schedule.stop,
            sample_rate: resources.sample_rate,
        }
    }

    pub fn base_hz(&self) -> f32 {
        self.base_hz
    }

    pub fn fm_index(&self) -> f32 {
        self.fm_index
    }

    /// One shaped sample at render-clock `time`, given the motor's output.
    #[inline]
    pub fn next_sample(&mut self, time: f64, motor: f32) -> f32 {
        if time < self.start || time >= self.stop {
            return 0.0;
        }

        let sr = self.sample_rate;
        let m = self.modulator.next_sample(2.0 * self.base_hz, sr);
        let deviation = m * (self.fm_index + motor * self.motor_depth);
        let tone = self.carrier.next_sample(self.base_hz + deviation, sr);

        let splash = self.noise.next_sample() * self.splash.value_at(time);

        self.shaper.process(tone + splash)
    }
}
