//! Benchmarks for low-level DSP primitives.

mod automation;
mod compressor;
mod delay;
mod distortion;
mod filter;
mod mix;
mod oscillator;

pub use automation::bench_automation;
pub use compressor::bench_compressor;
pub use delay::bench_delay;
pub use distortion::bench_distortion;
pub use filter::bench_filter;
pub use mix::bench_mix;
pub use oscillator::bench_oscillator;
