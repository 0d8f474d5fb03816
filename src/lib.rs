pub mod dsp; // Allocation-free signal math
pub mod engine; // Orchestra scheduling
pub mod graph; // Instrument graphs and node kinds
pub mod io; // Sample sinks

pub use dsp::Line;
pub use engine::{Orchestra, OrchestraConfig, OrchestraError, OrchestraState, RunSummary, StopHandle};
pub use graph::{BusId, GraphError, InstrumentBuilder, InstrumentGraph, Node, NodeId, NodeKind};
pub use io::{BufferSink, SampleSink};

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
