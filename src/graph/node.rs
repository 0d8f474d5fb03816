use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    dsp::{
        filter::{ButterworthHighpass, OnePoleLowpass, ThreePoleLowpass},
        plate::BeatenPlate,
        oscillator::{Phasor, SineTable, Stick, TableOscillator},
        Line,
    },
    graph::{
        bus::{BusId, Buses},
        error::GraphError,
        filter::Filter,
        modifier::Modifier,
        output::{Output, ParameterLog},
        source::Source,
    },
};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque handle to a node. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Context passed to nodes for one tick
///
/// - tick: index of the sample being produced
/// - sample_rate: samples per second
/// - buses: orchestra-wide signals written earlier in this tick
pub struct TickCtx<'a> {
    pub tick: u64,
    pub sample_rate: f32,
    buses: &'a Buses,
}

impl<'a> TickCtx<'a> {
    pub fn new(tick: u64, sample_rate: f32, buses: &'a Buses) -> Self {
        Self {
            tick,
            sample_rate,
            buses,
        }
    }

    /// Time of this tick in seconds.
    pub fn seconds(&self) -> f64 {
        self.tick as f64 / self.sample_rate as f64
    }

    pub fn bus(&self, bus: BusId) -> f32 {
        self.buses.read(bus)
    }
}

/// User-supplied signal source with no graph inputs.
///
/// `produce` is called exactly once per tick, with strictly increasing tick
/// indices.
pub trait SignalSource: Send {
    fn produce(&mut self, ctx: &TickCtx<'_>) -> f32;

    /// Return to the state before the first tick.
    fn reset(&mut self) {
        // Default: stateless
    }
}

/// Capability tag of a node
#[derive(Debug)]
pub enum NodeKind {
    /// Generates a signal (constants, oscillators, excitations, bus reads).
    Source(Source),
    /// Pure function of the tick used for automation.
    Ramp(Line),
    /// Combines or rescales other signals.
    Modifier(Modifier),
    /// Stateful filter with modulatable parameters.
    Filter(Filter),
    /// Passes its input on to the orchestra (audio, bus or log).
    Output(Output),
}

impl NodeKind {
    /// Number of inputs this kind expects; `None` accepts any number.
    pub fn arity(&self) -> Option<usize> {
        match self {
            NodeKind::Source(source) => Some(source.arity()),
            NodeKind::Ramp(_) => Some(0),
            NodeKind::Modifier(modifier) => modifier.arity(),
            NodeKind::Filter(filter) => Some(filter.arity()),
            NodeKind::Output(_) => Some(1),
        }
    }
}

/// One unit of an instrument graph.
///
/// A node references its inputs by [`NodeId`]; the instrument graph owns
/// every node and resolves those references when it is built.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    inputs: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind, inputs: Vec<NodeId>) -> Self {
        Self {
            id: NodeId::next(),
            kind,
            inputs,
        }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(NodeKind::Source(Source::Constant(value)), vec![])
    }

    /// 0..1 ramp repeating at `frequency` Hz.
    pub fn phasor(frequency: NodeId) -> Self {
        Self::new(NodeKind::Source(Source::Phasor(Phasor::new())), vec![frequency])
    }

    pub fn oscillator(table: SineTable, frequency: NodeId) -> Self {
        Self::new(
            NodeKind::Source(Source::Oscillator(TableOscillator::new(table))),
            vec![frequency],
        )
    }

    pub fn stick(stick: Stick) -> Self {
        Self::new(NodeKind::Source(Source::Stick(stick)), vec![])
    }

    pub fn bus_receive(bus: BusId) -> Self {
        Self::new(NodeKind::Source(Source::BusReceive(bus)), vec![])
    }

    pub fn source(source: impl SignalSource + 'static) -> Self {
        Self::new(NodeKind::Source(Source::Custom(Box::new(source))), vec![])
    }

    pub fn line(start: f32, end: f32, duration: f32) -> Self {
        Self::ramp(Line::new(start, end, duration))
    }

    pub fn ramp(line: Line) -> Self {
        Self::new(NodeKind::Ramp(line), vec![])
    }

    pub fn scale(signal: NodeId, factor: NodeId) -> Self {
        Self::new(NodeKind::Modifier(Modifier::Scale), vec![signal, factor])
    }

    pub fn sum(inputs: Vec<NodeId>) -> Self {
        Self::new(NodeKind::Modifier(Modifier::Sum), inputs)
    }

    pub fn three_pole_lowpass(
        input: NodeId,
        distortion: NodeId,
        cutoff: NodeId,
        resonance: NodeId,
    ) -> Self {
        Self::new(
            NodeKind::Filter(Filter::ThreePole(ThreePoleLowpass::new())),
            vec![input, distortion, cutoff, resonance],
        )
    }

    pub fn tone(input: NodeId, half_power_point: NodeId) -> Self {
        Self::new(
            NodeKind::Filter(Filter::Tone(OnePoleLowpass::new())),
            vec![input, half_power_point],
        )
    }

    pub fn butterworth_highpass(input: NodeId, cutoff: NodeId) -> Self {
        Self::new(
            NodeKind::Filter(Filter::Highpass(ButterworthHighpass::new())),
            vec![input, cutoff],
        )
    }

    /// Two-waveguide plate resonator excited by `input`. Each array holds the
    /// parameter for waveguide 1 and waveguide 2.
    pub fn beaten_plate(
        input: NodeId,
        frequency: [NodeId; 2],
        cutoff: [NodeId; 2],
        feedback: [NodeId; 2],
    ) -> Self {
        Self::new(
            NodeKind::Filter(Filter::Plate(BeatenPlate::new())),
            vec![
                input,
                frequency[0],
                frequency[1],
                cutoff[0],
                cutoff[1],
                feedback[0],
                feedback[1],
            ],
        )
    }

    pub fn audio_output(input: NodeId, channel: usize) -> Self {
        Self::new(NodeKind::Output(Output::Audio { channel }), vec![input])
    }

    pub fn bus_send(input: NodeId, bus: BusId) -> Self {
        Self::new(NodeKind::Output(Output::Bus(bus)), vec![input])
    }

    /// Report `input` through `tracing` every `interval` seconds.
    pub fn parameter_log(label: impl Into<String>, input: NodeId, interval: f32) -> Self {
        Self::new(
            NodeKind::Output(Output::Log(ParameterLog::new(label, interval))),
            vec![input],
        )
    }

    /// Append another input (for variadic kinds such as sums).
    pub fn with_input(mut self, input: NodeId) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Rewire existing input slots.
    pub fn inputs_mut(&mut self) -> &mut [NodeId] {
        &mut self.inputs
    }

    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        if let Some(expected) = self.kind.arity() {
            if expected != self.inputs.len() {
                return Err(GraphError::Arity {
                    node: self.id,
                    expected,
                    found: self.inputs.len(),
                });
            }
        }

        match &self.kind {
            NodeKind::Source(source) => source.validate(),
            NodeKind::Ramp(line) => line.validate(),
            NodeKind::Modifier(_) | NodeKind::Filter(_) => Ok(()),
            NodeKind::Output(output) => output.validate(),
        }
    }

    /// Bus this node reads or writes, if any.
    pub(crate) fn bus(&self) -> Option<BusId> {
        match &self.kind {
            NodeKind::Source(source) => source.bus(),
            NodeKind::Output(Output::Bus(bus)) => Some(*bus),
            _ => None,
        }
    }

    /// Produce the sample for `ctx.tick`. `inputs` holds this tick's samples
    /// of the declared inputs, in slot order.
    pub(crate) fn produce(&mut self, inputs: &[f32], ctx: &TickCtx<'_>) -> f32 {
        match &mut self.kind {
            NodeKind::Source(source) => source.produce(inputs, ctx),
            NodeKind::Ramp(line) => line.value_at(ctx.tick, ctx.sample_rate),
            NodeKind::Modifier(modifier) => modifier.produce(inputs),
            NodeKind::Filter(filter) => filter.produce(inputs, ctx.sample_rate),
            NodeKind::Output(output) => output.produce(inputs, ctx),
        }
    }

    pub(crate) fn reset(&mut self) {
        match &mut self.kind {
            NodeKind::Source(source) => source.reset(),
            NodeKind::Filter(filter) => filter.reset(),
            NodeKind::Ramp(_) | NodeKind::Modifier(_) | NodeKind::Output(_) => {}
        }
    }
}
