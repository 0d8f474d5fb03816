//! Composable building blocks for instrument graphs.
//!
//! Nodes are plain values tagged by capability (source, ramp, modifier,
//! filter, output) and wired to each other by [`NodeId`]. An
//! [`InstrumentBuilder`] collects them and compiles an [`InstrumentGraph`]
//! that evaluates every node once per tick in dependency order.

/// Orchestra-wide signal slots shared between instruments.
pub mod bus;
/// Configuration errors detected while building a graph.
pub mod error;
/// Three-pole lowpass, tone and highpass nodes.
pub mod filter;
/// Graph compilation, topological order and per-tick evaluation.
pub mod instrument;
/// Scale and sum.
pub mod modifier;
/// Node ids, tick context and the capability-tagged node type.
pub mod node;
/// Audio, bus and parameter-log outputs.
pub mod output;
/// Constants, phasors, oscillators, stick excitations and bus reads.
pub mod source;

pub use bus::{BusId, Buses};
pub use error::GraphError;
pub use instrument::{InstrumentBuilder, InstrumentGraph};
pub use node::{Node, NodeId, NodeKind, SignalSource, TickCtx};
