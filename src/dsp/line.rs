#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::GraphError;

/*
Parameter Lines
===============

A line is the simplest automation curve there is: hold `start`, move at a
constant rate to `end` over `duration` seconds, then hold `end` forever.

  value
   end ┤            ┌───────────
       │          ╱
       │        ╱
       │      ╱
 start ┤─────┘
       └─────┬──────┬──────────→ tick
        start_tick  start_tick + duration * sample_rate

Unlike an envelope a line carries no state at all. Its value is a pure
function of the tick index, so one line may feed any number of consumers
(or be sampled out of order by a parameter log) without coordination.

The interpolation runs in f64: at 44.1 kHz a ten second line is 441,000
ticks, and tick / sample_rate in f32 would already be off by a few ulps.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    start: f32,
    end: f32,
    duration: f32,
    start_tick: u64,
}

impl Line {
    /// A line from `start` to `end` over `duration` seconds, beginning at tick 0.
    pub fn new(start: f32, end: f32, duration: f32) -> Self {
        Self {
            start,
            end,
            duration,
            start_tick: 0,
        }
    }

    /// Delay the beginning of the line to `tick`.
    pub fn starting_at(mut self, tick: u64) -> Self {
        self.start_tick = tick;
        self
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn start_tick(&self) -> u64 {
        self.start_tick
    }

    pub fn value_at(&self, tick: u64, sample_rate: f32) -> f32 {
        let elapsed = tick.saturating_sub(self.start_tick);
        let t = elapsed as f64 / sample_rate as f64;
        let duration = self.duration as f64;

        if t <= 0.0 {
            return self.start;
        }
        if t >= duration {
            return self.end;
        }

        let start = self.start as f64;
        let end = self.end as f64;
        (start + (end - start) * (t / duration)) as f32
    }

    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        if !self.start.is_finite() {
            return Err(GraphError::invalid("line start", self.start));
        }
        if !self.end.is_finite() {
            return Err(GraphError::invalid("line end", self.end));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(GraphError::invalid("line duration", self.duration));
        }
        Ok(())
    }
}
