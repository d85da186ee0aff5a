//! Benchmarks for the bus compressor.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hyperflora::dsp::compressor::Compressor;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_compressor(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/compressor");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.07).sin()).collect();
        let mut left = input.clone();
        let mut right = input.clone();

        let mut limiter = Compressor::limiter(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("limiter", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                limiter.process_block(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}
