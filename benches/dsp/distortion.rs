//! Benchmarks for tanh drive.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use orchestra_dsp::dsp::distortion::drive;

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| ((i as f32 / size as f32) * std::f32::consts::TAU).sin())
            .collect();

        for amount in [0.0f32, 0.5, 1.0] {
            let name = format!("drive_{amount}");
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for &x in &input {
                        black_box(drive(black_box(x), amount));
                    }
                })
            });
        }
    }

    group.finish();
}
