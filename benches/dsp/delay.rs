//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyperflora::dsp::delay::DelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Comb periods (in samples at 48kHz)
    let periods: &[f32] = &[
        48_000.0 / 130.81, // C3
        48_000.0 / 261.63, // C4
        48_000.0 / 1046.5, // C6
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &period in periods {
            // Feedback comb: read, scale, write back
            let mut delay = DelayLine::new(period.ceil() as usize + 1);
            group.bench_with_input(
                BenchmarkId::new(format!("comb_{}smp", period as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &x in &input {
                            let y = delay.read_interpolated(black_box(period));
                            delay.write(x * 0.5 + y * 0.99);
                            sum += y;
                        }
                        sum
                    })
                },
            );
        }
    }

    group.finish();
}
