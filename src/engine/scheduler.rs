use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use thiserror::Error;
use tracing::debug;

use crate::{
    engine::config::OrchestraConfig,
    graph::{BusId, Buses, GraphError, InstrumentBuilder, InstrumentGraph, NodeId},
    io::SampleSink,
};

/*
Orchestra
=========

The orchestra owns every instrument and drives them one tick at a time:

    ┌──────┐  start / run   ┌─────────┐  target reached / stop()  ┌─────────┐
    │ Idle │ ─────────────→ │ Running │ ────────────────────────→ │ Stopped │
    └──────┘                └─────────┘                           └─────────┘
      add_instrument()        process_tick()                        terminal

Per tick:
  1. honour a pending stop request (the previous tick already completed)
  2. clear the buses
  3. tick every instrument in registration order
     (bus sends of earlier instruments are visible to later ones)
  4. sum each instrument's audio outputs into the channel mix
  5. hand each channel to the sink
  6. advance; stop once tick / sample_rate >= duration

`run` is just start + process_tick until Stopped, so it returns exactly when
the last tick has been delivered. There is nothing to poll.
*/

/// Scheduler-state and configuration errors of an orchestra.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestraError {
    #[error("orchestra is already running")]
    AlreadyRunning,
    #[error("orchestra is not running")]
    NotRunning,
    #[error("instruments can only be added while idle (orchestra is {0})")]
    NotIdle(OrchestraState),
    #[error("orchestra has stopped and cannot be restarted")]
    Finished,
    #[error("{parameter} out of range: {value}")]
    InvalidParameterRange { parameter: &'static str, value: f64 },
    #[error("instrument uses {0}, which this orchestra did not allocate")]
    UnknownBus(BusId),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestraState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for OrchestraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrchestraState::Idle => "idle",
            OrchestraState::Running => "running",
            OrchestraState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Requests a stop from outside the render loop (another thread, a sink).
///
/// The request takes effect at the next tick boundary.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// What a finished (or interrupted) run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub state: OrchestraState,
    /// Peak absolute value per channel.
    pub peaks: Vec<f32>,
}

impl RunSummary {
    pub fn peak(&self, channel: usize) -> f32 {
        self.peaks.get(channel).copied().unwrap_or(0.0)
    }
}

/// Absolute slack, in ticks, for float error in `duration * sample_rate`.
pub const TICK_TOLERANCE: f64 = 1e-6;

/// Number of ticks needed to cover `duration` seconds: `ceil(duration * rate)`.
///
/// Products within [`TICK_TOLERANCE`] of a whole number count as that
/// number, so 1/3 s at 44.1 kHz is 14,700 ticks rather than 14,701.
pub fn ticks_for(duration: f64, sample_rate: f32) -> u64 {
    let exact = duration * sample_rate as f64;
    let nearest = exact.round();
    if (exact - nearest).abs() <= TICK_TOLERANCE {
        nearest as u64
    } else {
        exact.ceil() as u64
    }
}

pub struct Orchestra {
    config: OrchestraConfig,
    instruments: Vec<InstrumentGraph>,
    buses: Buses,
    state: OrchestraState,
    tick: u64,
    target: u64,
    stop: StopHandle,
    mix: Vec<f32>,
    peaks: Vec<f32>,
}

impl Orchestra {
    pub fn new(config: OrchestraConfig) -> Result<Self, OrchestraError> {
        config.validate()?;

        Ok(Self {
            config,
            instruments: Vec::new(),
            buses: Buses::new(),
            state: OrchestraState::Idle,
            tick: 0,
            target: 0,
            stop: StopHandle::default(),
            mix: vec![0.0; config.channels],
            peaks: vec![0.0; config.channels],
        })
    }

    /// Allocate a global bus for instruments to share a signal.
    pub fn bus(&mut self) -> Result<BusId, OrchestraError> {
        self.ensure_idle()?;
        Ok(self.buses.allocate())
    }

    /// Register a built instrument. Instruments tick in registration order.
    pub fn add_instrument(&mut self, mut graph: InstrumentGraph) -> Result<(), OrchestraError> {
        self.ensure_idle()?;

        if let Some(channel) = graph
            .audio_outputs()
            .map(|(channel, _)| channel)
            .find(|&channel| channel >= self.config.channels)
        {
            return Err(OrchestraError::InvalidParameterRange {
                parameter: "output channel",
                value: channel as f64,
            });
        }
        if let Some(&bus) = graph.buses().iter().find(|&&bus| !self.buses.contains(bus)) {
            return Err(OrchestraError::UnknownBus(bus));
        }

        graph.set_sample_rate(self.config.sample_rate);
        self.instruments.push(graph);
        debug!(instruments = self.instruments.len(), "instrument added");
        Ok(())
    }

    /// Build `builder` with `output` as its designated output and register it.
    pub fn build_instrument(
        &mut self,
        builder: InstrumentBuilder,
        output: NodeId,
    ) -> Result<(), OrchestraError> {
        self.ensure_idle()?;
        let graph = builder.build(output)?;
        self.add_instrument(graph)
    }

    /// `Idle -> Running` for `duration` seconds.
    pub fn start(&mut self, duration: f64) -> Result<(), OrchestraError> {
        match self.state {
            OrchestraState::Idle => {}
            OrchestraState::Running => return Err(OrchestraError::AlreadyRunning),
            OrchestraState::Stopped => return Err(OrchestraError::Finished),
        }
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(OrchestraError::InvalidParameterRange {
                parameter: "duration",
                value: duration,
            });
        }

        self.target = ticks_for(duration, self.config.sample_rate);
        self.stop.clear();
        self.state = OrchestraState::Running;
        debug!(
            duration,
            ticks = self.target,
            instruments = self.instruments.len(),
            "orchestra started"
        );

        if self.target == 0 {
            self.finish("empty duration");
        }
        Ok(())
    }

    /// Render one tick into `sink`. Returns the state after the tick.
    pub fn process_tick<S: SampleSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<OrchestraState, OrchestraError> {
        if self.state != OrchestraState::Running {
            return Err(OrchestraError::NotRunning);
        }
        if self.stop.take() {
            self.finish("stop requested");
            return Ok(self.state);
        }

        self.buses.clear();
        self.mix.fill(0.0);
        for graph in self.instruments.iter_mut() {
            graph.tick_with_buses(self.tick, &mut self.buses);
            for (channel, sample) in graph.audio_outputs() {
                self.mix[channel] += sample;
            }
        }

        for (channel, &value) in self.mix.iter().enumerate() {
            self.peaks[channel] = self.peaks[channel].max(value.abs());
            sink.on_sample(self.tick, channel, value);
        }

        self.tick += 1;
        if self.tick >= self.target {
            self.finish("duration reached");
        }
        Ok(self.state)
    }

    /// Play every instrument for `duration` seconds, blocking until stopped.
    pub fn run<S: SampleSink + ?Sized>(
        &mut self,
        duration: f64,
        sink: &mut S,
    ) -> Result<RunSummary, OrchestraError> {
        self.start(duration)?;
        while self.process_tick(sink)? == OrchestraState::Running {}
        Ok(self.summary())
    }

    /// `Running -> Stopped` at the current tick boundary.
    pub fn stop(&mut self) -> Result<(), OrchestraError> {
        if self.state != OrchestraState::Running {
            return Err(OrchestraError::NotRunning);
        }
        self.finish("stopped by caller");
        Ok(())
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.tick,
            state: self.state,
            peaks: self.peaks.clone(),
        }
    }

    pub fn state(&self) -> OrchestraState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == OrchestraState::Running
    }

    /// Ticks rendered so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Ticks the current run will render (0 before `start`).
    pub fn target_ticks(&self) -> u64 {
        self.target
    }

    pub fn config(&self) -> &OrchestraConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.config.channels
    }

    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }

    fn ensure_idle(&self) -> Result<(), OrchestraError> {
        match self.state {
            OrchestraState::Idle => Ok(()),
            state => Err(OrchestraError::NotIdle(state)),
        }
    }

    // Instruments are torn down with the run.
    fn finish(&mut self, reason: &'static str) {
        self.state = OrchestraState::Stopped;
        self.instruments.clear();
        debug!(ticks = self.tick, reason, "orchestra stopped");
    }
}
