#[cfg(feature = "rtrb")]
use rtrb::Producer;

/// Receives the orchestra's mix, one call per channel per tick.
///
/// Calls arrive in tick order, and within a tick in channel order.
pub trait SampleSink {
    fn on_sample(&mut self, tick: u64, channel: usize, value: f32);
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn on_sample(&mut self, tick: u64, channel: usize, value: f32) {
        (**self).on_sample(tick, channel, value)
    }
}

impl<S: SampleSink + ?Sized> SampleSink for Box<S> {
    fn on_sample(&mut self, tick: u64, channel: usize, value: f32) {
        (**self).on_sample(tick, channel, value)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SampleSink for NullSink {
    fn on_sample(&mut self, _tick: u64, _channel: usize, _value: f32) {}
}

/// Adapts a closure `(tick, channel, value)` into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(u64, usize, f32)> SampleSink for FnSink<F> {
    fn on_sample(&mut self, tick: u64, channel: usize, value: f32) {
        (self.0)(tick, channel, value)
    }
}

/// Collects every channel into its own buffer.
#[derive(Debug, Default, Clone)]
pub struct BufferSink {
    pub buffers: Vec<Vec<f32>>,
}

impl BufferSink {
    pub fn new(channels: usize) -> Self {
        Self {
            buffers: vec![Vec::new(); channels],
        }
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        self.buffers.get(channel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of frames in the longest channel.
    pub fn frames(&self) -> usize {
        self.buffers.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl SampleSink for BufferSink {
    fn on_sample(&mut self, _tick: u64, channel: usize, value: f32) {
        if self.buffers.len() <= channel {
            self.buffers.resize_with(channel + 1, Vec::new);
        }
        self.buffers[channel].push(value);
    }
}

/// One sample as handed across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleFrame {
    pub tick: u64,
    pub channel: usize,
    pub value: f32,
}

// Never blocks the render loop: when the consumer falls behind, frames are dropped.
#[cfg(feature = "rtrb")]
impl SampleSink for Producer<SampleFrame> {
    fn on_sample(&mut self, tick: u64, channel: usize, value: f32) {
        let _ = self.push(SampleFrame {
            tick,
            channel,
            value,
        });
    }
}
