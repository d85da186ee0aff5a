//! Benchmarks for per-sample automation evaluation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyperflora::synth::VoiceSchedule;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Voice envelope, rendered block after block through every segment
        let schedule = VoiceSchedule::new(0.0);
        let mut gain = schedule.gain_automation();
        let mut time = 0.0f64;
        group.bench_with_input(BenchmarkId::new("voice_envelope", size), &size, |b, _| {
            b.iter(|| {
                gain.render(black_box(&mut buffer), time, SAMPLE_RATE);
                time += size as f64 / SAMPLE_RATE as f64;
                if time > schedule.stop {
                    gain = schedule.gain_automation();
                    time = 0.0;
                }
            })
        });
    }

    group.finish();
}
