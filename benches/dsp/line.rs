//! Benchmarks for parameter lines.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use orchestra_dsp::Line;

use crate::BLOCK_SIZES;

pub fn bench_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/line");
    let line = Line::new(300.0, 3000.0, 10.0);

    for &size in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::new("value_at", size), &size, |b, &size| {
            b.iter(|| {
                for tick in 0..size as u64 {
                    black_box(line.value_at(black_box(tick), 44_100.0));
                }
            })
        });
    }

    group.finish();
}
