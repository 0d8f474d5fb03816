use std::{
    collections::{HashMap, VecDeque},
    ops::Range,
};

use tracing::debug;

use crate::{
    graph::{
        bus::{BusId, Buses},
        error::GraphError,
        node::{Node, NodeId, NodeKind, TickCtx},
        output::Output,
    },
    DEFAULT_SAMPLE_RATE,
};

/*
Instrument Graphs
=================

An instrument is a set of nodes wired by id, compiled once into a flat
evaluation order:

    build():  nodes + output id
                │
                ├─ every id unique, every input id known
                ├─ every node has the right number of inputs
                └─ Kahn topological sort (ties broken by connect order)
                      └─ leftover nodes ⇒ cycle

    tick(n):  for node in order:
                  gather input samples from the tick cache
                  cache[node] = node.produce(inputs)
              return cache[output]

The cache is what keeps fan-out cheap and correct: a line feeding both a
filter and a parameter log is evaluated once per tick, and the stateful
nodes downstream of it see a single consistent value. Asking for the same
tick twice returns the cached output without touching any node.
*/

/// Collects nodes for one instrument.
#[derive(Debug, Default)]
pub struct InstrumentBuilder {
    nodes: Vec<Node>,
}

impl InstrumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the instrument and return its handle.
    pub fn connect(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn build(self, output: NodeId) -> Result<InstrumentGraph, GraphError> {
        InstrumentGraph::build(self.nodes, output)
    }
}

pub struct InstrumentGraph {
    /// Nodes in evaluation order.
    nodes: Vec<Node>,
    /// Cache indices of every node's inputs, flattened.
    input_indices: Vec<usize>,
    /// Slice of `input_indices` belonging to each node.
    input_spans: Vec<Range<usize>>,
    cache: Vec<f32>,
    scratch: Vec<f32>,
    output: usize,
    /// (channel, cache index) for each audio output node.
    audio_taps: Vec<(usize, usize)>,
    buses: Vec<BusId>,
    local_buses: Buses,
    sample_rate: f32,
    last_tick: Option<u64>,
}

impl InstrumentGraph {
    pub fn build(nodes: Vec<Node>, output: NodeId) -> Result<Self, GraphError> {
        let mut position = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if position.insert(node.id(), index).is_some() {
                return Err(GraphError::DuplicateNode(node.id()));
            }
        }

        if !position.contains_key(&output) {
            return Err(GraphError::UnknownNode(output));
        }

        for node in &nodes {
            node.validate()?;
            if let Some(missing) = node.inputs().iter().find(|id| !position.contains_key(id)) {
                return Err(GraphError::UnknownNode(*missing));
            }
        }

        let order = topological_order(&nodes, &position)?;

        let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
        let mut sorted = Vec::with_capacity(slots.len());
        let mut sorted_position = HashMap::with_capacity(slots.len());
        for (new_index, &old_index) in order.iter().enumerate() {
            if let Some(node) = slots[old_index].take() {
                sorted_position.insert(node.id(), new_index);
                sorted.push(node);
            }
        }

        let mut input_indices = Vec::new();
        let mut input_spans = Vec::with_capacity(sorted.len());
        let mut audio_taps = Vec::new();
        let mut buses = Vec::new();
        let mut widest = 0;
        for (index, node) in sorted.iter().enumerate() {
            let start = input_indices.len();
            input_indices.extend(node.inputs().iter().map(|id| sorted_position[id]));
            input_spans.push(start..input_indices.len());
            widest = widest.max(node.inputs().len());

            if let NodeKind::Output(Output::Audio { channel }) = node.kind() {
                audio_taps.push((*channel, index));
            }
            if let Some(bus) = node.bus() {
                if !buses.contains(&bus) {
                    buses.push(bus);
                }
            }
        }

        // Without explicit audio outputs the designated output plays on
        // channel 0, unless it only feeds a bus.
        let output_index = sorted_position[&output];
        let routes_to_bus = matches!(sorted[output_index].kind(), NodeKind::Output(Output::Bus(_)));
        if audio_taps.is_empty() && !routes_to_bus {
            audio_taps.push((0, output_index));
        }

        let local_len = buses.iter().map(|bus| bus.index() + 1).max().unwrap_or(0);
        debug!(
            nodes = sorted.len(),
            audio_outputs = audio_taps.len(),
            buses = buses.len(),
            "instrument graph built"
        );

        Ok(Self {
            cache: vec![0.0; sorted.len()],
            scratch: Vec::with_capacity(widest),
            output: output_index,
            nodes: sorted,
            input_indices,
            input_spans,
            audio_taps,
            buses,
            local_buses: Buses::with_len(local_len),
            sample_rate: DEFAULT_SAMPLE_RATE,
            last_tick: None,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the sample rate. Invalidates the tick cache.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.last_tick = None;
    }

    /// Evaluate every node for `tick` and return the output node's sample.
    ///
    /// Bus receives read from a private, silent bus set; inside an
    /// orchestra the shared buses are used instead.
    pub fn tick(&mut self, tick: u64) -> f32 {
        let mut buses = std::mem::take(&mut self.local_buses);
        buses.clear();
        let sample = self.tick_with_buses(tick, &mut buses);
        self.local_buses = buses;
        sample
    }

    pub(crate) fn tick_with_buses(&mut self, tick: u64, buses: &mut Buses) -> f32 {
        if self.last_tick == Some(tick) {
            return self.cache[self.output];
        }

        let Self {
            nodes,
            input_indices,
            input_spans,
            cache,
            scratch,
            sample_rate,
            ..
        } = self;

        for (index, node) in nodes.iter_mut().enumerate() {
            scratch.clear();
            scratch.extend(input_indices[input_spans[index].clone()].iter().map(|&i| cache[i]));

            let ctx = TickCtx::new(tick, *sample_rate, buses);
            let sample = node.produce(scratch, &ctx);
            cache[index] = sample;

            if let NodeKind::Output(Output::Bus(bus)) = node.kind() {
                buses.write(*bus, sample);
            }
        }

        self.last_tick = Some(tick);
        self.cache[self.output]
    }

    /// The output node's sample for the last evaluated tick.
    pub fn output_sample(&self) -> f32 {
        self.cache[self.output]
    }

    /// Cached sample of any node for the last evaluated tick.
    pub fn sample_of(&self, id: NodeId) -> Option<f32> {
        self.nodes
            .iter()
            .position(|node| node.id() == id)
            .map(|index| self.cache[index])
    }

    /// (channel, sample) of each audio output for the last evaluated tick.
    ///
    /// A graph with no audio output nodes reports its designated output on
    /// channel 0; one whose designated output is a bus send reports nothing.
    pub fn audio_outputs(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.audio_taps
            .iter()
            .map(move |&(channel, index)| (channel, self.cache[index]))
    }

    /// Buses read or written by this instrument.
    pub fn buses(&self) -> &[BusId] {
        &self.buses
    }

    pub fn evaluation_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(Node::id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }

    /// Return every node to its initial state and drop the tick cache.
    pub fn reset(&mut self) {
        self.nodes.iter_mut().for_each(Node::reset);
        self.cache.fill(0.0);
        self.last_tick = None;
    }
}

/// Kahn's algorithm over input references. Nodes become ready in connect
/// order, so equal-rank nodes keep the order they were added in.
fn topological_order(
    nodes: &[Node],
    position: &HashMap<NodeId, usize>,
) -> Result<Vec<usize>, GraphError> {
    let mut pending: Vec<usize> = nodes.iter().map(|node| node.inputs().len()).collect();
    let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (index, node) in nodes.iter().enumerate() {
        for input in node.inputs() {
            consumers[position[input]].push(index);
        }
    }

    let mut ready: VecDeque<usize> = (0..nodes.len()).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(index) = ready.pop_front() {
        order.push(index);
        for &consumer in &consumers[index] {
            pending[consumer] -= 1;
            if pending[consumer] == 0 {
                ready.push_back(consumer);
            }
        }
    }

    if order.len() < nodes.len() {
        let stuck = (0..nodes.len())
            .find(|&i| pending[i] > 0)
            .map(|i| nodes[i].id())
            .unwrap_or_else(|| nodes[0].id());
        return Err(GraphError::Cycle { node: stuck });
    }

    Ok(order)
}
