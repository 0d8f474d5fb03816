//! Benchmarks for instrument graphs and the orchestra tick loop.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use orchestra_dsp::{
    io::NullSink, InstrumentBuilder, InstrumentGraph, Node, Orchestra, OrchestraConfig,
};

use crate::BLOCK_SIZES;

/// Phasor into a three-pole lowpass with every parameter on a line.
fn swept_filter() -> InstrumentGraph {
    let mut builder = InstrumentBuilder::new();
    let freq = builder.connect(Node::constant(220.0));
    let phasor = builder.connect(Node::phasor(freq));
    let distortion = builder.connect(Node::line(0.1, 0.9, 10.0));
    let cutoff = builder.connect(Node::line(300.0, 3000.0, 10.0));
    let resonance = builder.connect(Node::line(0.0, 1.0, 10.0));
    let filtered = builder.connect(Node::three_pole_lowpass(phasor, distortion, cutoff, resonance));
    let out = builder.connect(Node::audio_output(filtered, 0));
    builder.build(out).expect("swept filter graph")
}

/// The same chain split over a bus, as two instruments.
fn bussed_orchestra(voices: usize) -> Orchestra {
    let mut orchestra = Orchestra::new(OrchestraConfig::default()).expect("default config");
    for _ in 0..voices {
        let bus = orchestra.bus().expect("idle orchestra");

        let mut source = InstrumentBuilder::new();
        let freq = source.connect(Node::constant(220.0));
        let phasor = source.connect(Node::phasor(freq));
        let send = source.connect(Node::bus_send(phasor, bus));
        orchestra.build_instrument(source, send).expect("source instrument");

        let mut processor = InstrumentBuilder::new();
        let input = processor.connect(Node::bus_receive(bus));
        let distortion = processor.connect(Node::line(0.1, 0.9, 10.0));
        let cutoff = processor.connect(Node::line(300.0, 3000.0, 10.0));
        let resonance = processor.connect(Node::line(0.0, 1.0, 10.0));
        let filtered =
            processor.connect(Node::three_pole_lowpass(input, distortion, cutoff, resonance));
        let out = processor.connect(Node::audio_output(filtered, 0));
        orchestra.build_instrument(processor, out).expect("filter instrument");
    }
    orchestra
}

pub fn bench_orchestra(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/orchestra");

    for &size in BLOCK_SIZES {
        let mut graph = swept_filter();
        let mut tick = 0u64;
        group.bench_with_input(BenchmarkId::new("graph_swept_filter", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(graph.tick(tick));
                    tick += 1;
                }
            })
        });

        for voices in [1usize, 8] {
            let name = format!("bussed_x{voices}");
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter_batched(
                    || {
                        let mut orchestra = bussed_orchestra(voices);
                        orchestra.start(1.0).expect("idle orchestra");
                        orchestra
                    },
                    |mut orchestra| {
                        for _ in 0..size {
                            black_box(orchestra.process_tick(&mut NullSink).expect("running"));
                        }
                        orchestra
                    },
                    criterion::BatchSize::LargeInput,
                )
            });
        }
    }

    group.finish();
}
