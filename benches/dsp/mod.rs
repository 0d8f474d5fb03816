//! Benchmarks for per-sample DSP primitives.

mod distortion;
mod filter;
mod line;
mod oscillator;

pub use distortion::bench_distortion;
pub use filter::bench_filter;
pub use line::bench_line;
pub use oscillator::bench_oscillator;
