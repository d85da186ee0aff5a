use crate::dsp::oscillator::OscillatorBlock;
use crate::dsp::AutomationParam;

/// Rate before the first parameter update arrives.
pub const INITIAL_RATE: f32 = 3.0;

/// The shared LFO. Starts with the engine and never stops; every voice reads
/// the same block, so all notes wobble in phase.
pub struct Motor {
    osc: OscillatorBlock,
    rate: AutomationParam,
}

impl Motor {
    pub fn new() -> Self {
        Self {
            osc: OscillatorBlock::sine(),
            rate: AutomationParam::new(INITIAL_RATE).with_range(0.0, 100.0),
        }
    }

    /// Glide toward `rate` Hz starting at `time`.
    pub fn retarget(&mut self, rate: f32, time: f64, time_constant: f64) {
        self.rate.set_target_at_time(rate, time, time_constant);
    }

    /// Rate the motor is heading to once every scheduled change settles.
    pub fn rate_target(&self) -> f32 {
        self.rate.settled_value()
    }

    pub fn render(&mut self, out: &mut [f32], start_time: f64, sample_rate: f32) {
        let dt = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            let rate = self.rate.value_at(start_time + i as f64 * dt);
            *sample = self.osc.next_sample(rate, sample_rate);
        }
    }
}

impl Default for Motor {
    fn default() -> Self {
        Self::new()
    }
}
