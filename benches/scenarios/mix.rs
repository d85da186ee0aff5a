//! Benchmarks for the full engine under polyphony.
//!
//! Every iteration renders one block through the shared graph with a fixed
//! number of overlapping voices, retriggering as they retire so the count
//! stays put.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyperflora::{engine, EngineConfig, PitchClass, Snapshot};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");
    let patch = Snapshot::default();

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // idle shared graph: motor, disperser, limiter
        let mut idle = engine(EngineConfig::default().sample_rate(SAMPLE_RATE).noise_seed(1));
        group.bench_with_input(BenchmarkId::new("shared_graph_idle", size), &size, |b, _| {
            b.iter(|| {
                idle.renderer
                    .render(black_box(&mut left), black_box(&mut right));
            })
        });

        for voices in [4usize, 16] {
            let mut parts = engine(EngineConfig::default().sample_rate(SAMPLE_RATE).noise_seed(1));
            let mut note = 0;

            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        parts.controller.poll();
                        while parts.controller.outstanding_voices() < voices {
                            let pitch = PitchClass::ALL[note % 12];
                            parts.controller.trigger(pitch, 4, &patch);
                            note += 1;
                        }
                        parts
                            .renderer
                            .render(black_box(&mut left), black_box(&mut right));
                    })
                },
            );
        }
    }

    group.finish();
}
