//! Benchmarks for phasor, table oscillator and stick excitation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use orchestra_dsp::dsp::oscillator::{Phasor, SineTable, Stick, TableOscillator};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 44_100.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut phasor = Phasor::new();
        group.bench_with_input(BenchmarkId::new("phasor", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(phasor.next_sample(black_box(220.0), SAMPLE_RATE));
                }
            })
        });

        let mut sine = TableOscillator::new(SineTable::new());
        group.bench_with_input(BenchmarkId::new("sine_table", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(sine.next_sample(black_box(440.0), SAMPLE_RATE));
                }
            })
        });

        let mut stick = Stick::default();
        group.bench_with_input(BenchmarkId::new("stick", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(stick.next_sample(SAMPLE_RATE));
                }
            })
        });
    }

    group.finish();
}
