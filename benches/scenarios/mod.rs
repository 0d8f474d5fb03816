//! Whole-instrument benchmarks.
//!
//! These model the bundled scenes: a phasor shared over a bus and swept
//! through a line-automated three-pole filter, and a single graph rendered
//! without an orchestra around it.

mod orchestra;

pub use orchestra::bench_orchestra;
