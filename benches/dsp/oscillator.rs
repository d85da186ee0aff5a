//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyperflora::dsp::oscillator::OscillatorBlock;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - uses sin() transcendental function
        let mut osc = OscillatorBlock::sine();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE);
            })
        });

        // Square - branch per sample
        let mut osc = OscillatorBlock::square();
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE);
            })
        });

        // Square-into-sine FM, one frequency per sample
        let mut carrier = OscillatorBlock::sine();
        let mut modulator = OscillatorBlock::square();
        group.bench_with_input(BenchmarkId::new("fm_pair", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    let m = modulator.next_sample(black_box(261.63), SAMPLE_RATE);
                    *sample = carrier.next_sample(130.8 + m * 2_700.0, SAMPLE_RATE);
                }
            })
        });
    }

    group.finish();
}
