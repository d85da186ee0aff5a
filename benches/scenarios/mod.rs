//! Engine scenario benchmarks.
//!
//! A single voice on its own, then the whole engine (shared graph plus
//! overlapping voices) the way a performer hammering keys would drive it.

mod mix;
mod voice;

pub use mix::bench_mix;
pub use voice::bench_voice;
