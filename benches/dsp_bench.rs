//! Benchmarks for DSP primitives and engine scenarios.
//!
//! Run with: cargo bench
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (oscillator, filter, shaper, etc.)
//!   - scenarios/*  Single voices and the full engine under polyphony

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_oscillator,
    dsp::bench_filter,
    dsp::bench_distortion,
    dsp::bench_delay,
    dsp::bench_mix,
    dsp::bench_automation,
    dsp::bench_compressor,
    // Engine scenarios
    scenarios::bench_voice,
    scenarios::bench_mix,
);
criterion_main!(benches);
