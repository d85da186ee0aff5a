//! Benchmarks for the oversampled waveshaper.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use hyperflora::dsp::distortion::{make_curve, shape, WaveShaper, CURVE_AMOUNT, CURVE_LEN};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");
    let curve: Arc<[f32]> = make_curve(CURVE_AMOUNT, CURVE_LEN).into();

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.05).sin() * 1.2)
            .collect();

        // Plain table lookup, no oversampling
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("table", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = shape(black_box(&curve), x);
                }
            })
        });

        // 4x oversampled shaper (what every voice runs)
        let mut shaper = WaveShaper::new(curve.clone(), SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("oversampled_4x", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                shaper.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
