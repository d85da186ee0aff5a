/*
Fractional Delay Line
=====================

A circular buffer written once per sample and read some (possibly
fractional) number of samples in the past.

    write_pos ──► [ .  .  .  x  .  .  . ]
                             ▲
                  read = write_pos - delay   (linear interpolation between
                                              the two neighbouring samples)

Comb resonators need fractional reads: a 1/f second loop at 48 kHz is rarely
a whole number of samples, and rounding would detune the ring by up to half
a sample of period (several cents at high pitches).

The buffer is sized once at construction; nothing allocates afterwards.
*/

#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Create a delay line able to hold `max_delay_samples` of history.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            // +2: one slot for the sample being written, one for interpolation
            buffer: vec![0.0; max_delay_samples.max(1) + 2],
            write_pos: 0,
        }
    }

    /// Longest delay (in samples) that can be read back.
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 2
    }

    /// Push one sample and advance.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Read `delay_samples` behind the most recent write.
    ///
    /// A delay of 1.0 returns the last written sample. Values are clamped to
    /// `[1, max_delay]`.
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1.0, self.max_delay() as f32);

        let whole = delay.floor();
        let frac = delay - whole;
        let whole = whole as usize;

        let newer = (self.write_pos + len - whole) % len;
        let older = (newer + len - 1) % len;

        let a = self.buffer[newer];
        let b = self.buffer[older];
        a + (b - a) * frac
    }

    /// Integer-delay convenience: write `sample`, return the one `delay_samples` ago.
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize) -> f32 {
        let delayed = self.read_interpolated(delay_samples as f32);
        self.write(sample);
        delayed
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}
