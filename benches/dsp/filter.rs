//! Benchmarks for the three-pole lowpass, tone, highpass and plate filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use orchestra_dsp::dsp::{
    filter::{ButterworthHighpass, OnePoleLowpass, ThreePoleLowpass, ThreePoleParams},
    plate::{BeatenPlate, PlateParams},
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 44_100.0;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = ThreePoleLowpass::new();
        let clean = ThreePoleParams {
            distortion: 0.0,
            cutoff_hz: 1000.0,
            resonance: 0.0,
        };
        group.bench_with_input(BenchmarkId::new("three_pole_clean", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(filter.next_sample(black_box(x), clean, SAMPLE_RATE));
                }
            })
        });

        // Driven and resonant: exercises tanh and the feedback path
        let mut filter = ThreePoleLowpass::new();
        let driven = ThreePoleParams {
            distortion: 0.8,
            cutoff_hz: 2500.0,
            resonance: 0.9,
        };
        group.bench_with_input(BenchmarkId::new("three_pole_driven", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(filter.next_sample(black_box(x), driven, SAMPLE_RATE));
                }
            })
        });

        let mut tone = OnePoleLowpass::new();
        group.bench_with_input(BenchmarkId::new("tone", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(tone.next_sample(black_box(x), 1000.0, SAMPLE_RATE));
                }
            })
        });

        let mut highpass = ButterworthHighpass::new();
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(highpass.next_sample(black_box(x), 500.0, SAMPLE_RATE));
                }
            })
        });

        let mut plate = BeatenPlate::new();
        let plate_params = PlateParams::default();
        group.bench_with_input(BenchmarkId::new("beaten_plate", size), &size, |b, _| {
            b.iter(|| {
                for &x in &input {
                    black_box(plate.next_sample(black_box(x), plate_params, SAMPLE_RATE));
                }
            })
        });
    }

    group.finish();
}
