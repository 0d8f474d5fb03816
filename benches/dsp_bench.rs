//! Benchmarks for DSP primitives and orchestra scenarios.
//!
//! Run with: cargo bench
//!
//! The orchestra renders one tick at a time, so every benchmark renders a
//! block of ticks and should stay well within the real-time deadline.
//!
//! Reference timing at 44.1kHz sample rate:
//!   - 64 ticks  = 1.45ms deadline
//!   - 128 ticks = 2.90ms deadline
//!   - 256 ticks = 5.80ms deadline
//!   - 512 ticks = 11.61ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Per-sample primitives (filters, line, oscillators, drive)
//!   - scenarios/*  Whole instruments and orchestras

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common block sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    // Per-sample primitives
    dsp::bench_filter,
    dsp::bench_line,
    dsp::bench_oscillator,
    dsp::bench_distortion,
    // Whole instruments
    scenarios::bench_orchestra,
);
criterion_main!(benches);
