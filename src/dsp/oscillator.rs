use std::f32::consts::TAU;

/*
Phase-accumulating oscillator
=============================

    phase += frequency / sample_rate    (wrapped into [0, 1))

The frequency is passed per sample so a modulator can bend it at audio rate
(FM). Negative instantaneous frequencies are legal: the phase simply runs
backwards, which is what deep FM produces.

  Sine     sin(2π · phase)                  starts at 0
  Square   +1 for phase < 0.5, -1 after     odd harmonics only (1/n)
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Square,
}

#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = match self.waveform {
            OscillatorWaveform::Sine => (TAU * self.phase).sin(),
            OscillatorWaveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();

        out
    }

    /// Fill `out` at a constant frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, 440.0, sample_rate);

        let sample_index = 12;
        let expected = (TAU * 440.0 * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn square_only_takes_two_values() {
        let mut osc = OscillatorBlock::square();
        let mut buffer = vec![0.0f32; 1000];
        osc.render(&mut buffer, 100.0, 1_000.0);

        assert!(buffer.iter().all(|&s| s == 1.0 || s == -1.0));
        // 10 samples per cycle, half high
        assert_eq!(&buffer[..5], &[1.0; 5]);
        assert_eq!(&buffer[5..10], &[-1.0; 5]);
    }

    #[test]
    fn negative_frequency_keeps_phase_wrapped() {
        let mut osc = OscillatorBlock::sine();
        for _ in 0..10_000 {
            let s = osc.next_sample(-3_000.0, 48_000.0);
            assert!(s.is_finite() && s.abs() <= 1.0);
        }
    }
}
