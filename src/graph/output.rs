use tracing::info;

use crate::graph::{bus::BusId, error::GraphError, node::TickCtx};

/// Terminal nodes. All of them pass their single input through unchanged,
/// so any output can also serve as the graph's designated output.
#[derive(Debug, Clone)]
pub enum Output {
    /// Summed into the orchestra mix on `channel`.
    Audio { channel: usize },
    /// Written to an orchestra bus for later instruments in the tick.
    Bus(BusId),
    /// Reported through `tracing` at a fixed interval.
    Log(ParameterLog),
}

impl Output {
    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        match self {
            Output::Log(log) => log.validate(),
            Output::Audio { .. } | Output::Bus(_) => Ok(()),
        }
    }

    pub(crate) fn produce(&self, inputs: &[f32], ctx: &TickCtx<'_>) -> f32 {
        let value = inputs[0];
        if let Output::Log(log) = self {
            log.observe(value, ctx);
        }
        value
    }
}

/// Periodic `info!` report of a control value, e.g. a cutoff line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterLog {
    label: String,
    interval: f32,
}

impl ParameterLog {
    pub fn new(label: impl Into<String>, interval: f32) -> Self {
        Self {
            label: label.into(),
            interval,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Interval between reports, in ticks (at least one).
    pub fn interval_ticks(&self, sample_rate: f32) -> u64 {
        ((self.interval as f64 * sample_rate as f64).round() as u64).max(1)
    }

    pub(crate) fn is_due(&self, tick: u64, sample_rate: f32) -> bool {
        tick % self.interval_ticks(sample_rate) == 0
    }

    fn observe(&self, value: f32, ctx: &TickCtx<'_>) {
        if self.is_due(ctx.tick, ctx.sample_rate) {
            info!(
                parameter = %self.label,
                value,
                seconds = ctx.seconds(),
                "parameter"
            );
        }
    }

    fn validate(&self) -> Result<(), GraphError> {
        if self.interval.is_finite() && self.interval > 0.0 {
            Ok(())
        } else {
            Err(GraphError::invalid("log interval", self.interval))
        }
    }
}
