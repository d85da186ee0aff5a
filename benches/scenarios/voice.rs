//! Benchmarks for a single voice: exciter, resonator bank and envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyperflora::synth::{Voice, VoiceId, VoiceResources};
use hyperflora::{ChordQuality, Snapshot};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");
    let resources = VoiceResources::new(SAMPLE_RATE, Some(1));

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];
        let motor = vec![0.25f32; size];

        for quality in [ChordQuality::Major, ChordQuality::Maj7] {
            let patch = Snapshot {
                quality,
                ..Snapshot::default()
            };
            // every iteration renders the same window inside the hold phase
            let mut voice = Voice::new(VoiceId(0), patch, 0.0, &resources);
            let name = format!("default_{}", quality.name());

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    left.fill(0.0);
                    right.fill(0.0);
                    voice.render(black_box(&mut left), black_box(&mut right), &motor, 0.05);
                })
            });
        }
    }

    group.finish();
}
