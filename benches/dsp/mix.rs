//! Benchmarks for panning and summing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyperflora::dsp::mix;

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Equal-power pan into a stereo bus
        group.bench_with_input(BenchmarkId::new("pan_into_bus", size), &size, |b, _| {
            b.iter(|| {
                let (gl, gr) = mix::equal_power_gains(black_box(-0.7));
                mix::add_scaled(&mut left, &signal, gl);
                mix::add_scaled(&mut right, &signal, gr);
            })
        });

        // Master gain
        let mut buffer = signal.clone();
        group.bench_with_input(BenchmarkId::new("scale", size), &size, |b, _| {
            b.iter(|| {
                mix::scale(black_box(&mut buffer), black_box(0.999));
            })
        });
    }

    group.finish();
}
