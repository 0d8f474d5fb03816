// Purpose - where rendered samples leave the orchestra

pub mod sink;

pub use sink::{BufferSink, FnSink, NullSink, SampleFrame, SampleSink};
