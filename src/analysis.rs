//! Analysis tap.
//!
//! The render thread pushes the fully processed (post master) signal, mixed
//! to mono, into a lock-free ring. The UI side pulls whenever it wants a
//! frame: the newest `fft_size` samples are windowed, transformed and folded
//! into a time-smoothed magnitude spectrum, the same shape a browser
//! analyser node reports.
//!
//!   smoothed[k] = τ · smoothed[k] + (1 - τ) · |X[k]| / N
//!   db[k]       = 20 · log10(smoothed[k])
//!   byte[k]     = 255 · (db[k] - min_db) / (max_db - min_db), clamped

use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

pub const DEFAULT_FFT_SIZE: usize = 2048;
pub const DEFAULT_SMOOTHING: f32 = 0.85;
pub const MIN_DB: f32 = -100.0;
pub const MAX_DB: f32 = -30.0;

/// Render-side end of the tap. Never blocks; drops samples when the UI side
/// falls behind.
pub struct AnalysisTap {
    tx: Producer<f32>,
}

impl AnalysisTap {
    pub fn push(&mut self, left: &[f32], right: &[f32]) {
        for (&l, &r) in left.iter().zip(right) {
            if self.tx.push(0.5 * (l + r)).is_err() {
                break;
            }
        }
    }
}

/// UI-side end of the tap.
pub struct Analyser {
    rx: Consumer<f32>,
    history: Vec<f32>,
    write_pos: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    decibels: Vec<f32>,
    smoothing: f32,
    sample_rate: f32,
}

/// Build both ends of a tap.
pub fn tap(fft_size: usize, smoothing: f32, sample_rate: f32) -> (AnalysisTap, Analyser) {
    let fft_size = fft_size.max(32).next_power_of_two();
    let (tx, rx) = RingBuffer::new(fft_size * 4);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);

    // Hann window
    let denom = (fft_size - 1) as f32;
    let window = (0..fft_size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
        .collect();

    let bins = fft_size / 2;
    let analyser = Analyser {
        rx,
        history: vec![0.0; fft_size],
        write_pos: 0,
        window,
        fft,
        scratch: vec![Complex::new(0.0, 0.0); fft_size],
        smoothed: vec![0.0; bins],
        decibels: vec![f32::NEG_INFINITY; bins],
        smoothing: smoothing.clamp(0.0, 1.0),
        sample_rate,
    };

    (AnalysisTap { tx }, analyser)
}

impl Analyser {
    pub fn fft_size(&self) -> usize {
        self.history.len()
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Centre frequency of bin `index` in Hz.
    pub fn bin_frequency(&self, index: usize) -> f32 {
        index as f32 * self.sample_rate / self.fft_size() as f32
    }

    /// Current smoothed spectrum in dB, one value per bin.
    pub fn float_frequency_data(&mut self) -> &[f32] {
        self.analyse();
        &self.decibels
    }

    /// Current spectrum scaled to bytes over [`MIN_DB`, `MAX_DB`].
    ///
    /// Writes `min(out.len(), bins)` values.
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.analyse();
        let range = MAX_DB - MIN_DB;
        for (byte, &db) in out.iter_mut().zip(&self.decibels) {
            let scaled = 255.0 * (db - MIN_DB) / range;
            *byte = if scaled.is_nan() {
                0
            } else {
                scaled.clamp(0.0, 255.0) as u8
            };
        }
    }

    /// The `count` loudest bins as `(frequency_hz, db)`, loudest first.
    pub fn peaks(&mut self, count: usize) -> Vec<(f32, f32)> {
        self.analyse();
        let mut bins: Vec<(f32, f32)> = self
            .decibels
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &db)| (self.bin_frequency(i), db))
            .collect();
        bins.sort_by(|a, b| b.1.total_cmp(&a.1));
        bins.truncate(count);
        bins
    }

    fn drain(&mut self) {
        let len = self.history.len();
        while let Ok(sample) = self.rx.pop() {
            self.history[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % len;
        }
    }

    fn analyse(&mut self) {
        self.drain();

        let len = self.history.len();
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            // oldest sample first
            let sample = self.history[(self.write_pos + i) % len];
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 1.0 / len as f32;
        let tau = self.smoothing;
        for (k, (smoothed, db)) in self
            .smoothed
            .iter_mut()
            .zip(self.decibels.iter_mut())
            .enumerate()
        {
            let magnitude = self.scratch[k].norm() * norm;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
            *db = 20.0 * smoothed.log10();
        }
    }
}
