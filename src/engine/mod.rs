//! Scheduling: the orchestra that owns instruments and advances them tick
//! by tick, plus its static configuration.

pub mod config;
pub mod scheduler;

pub use config::OrchestraConfig;
pub use scheduler::{
    ticks_for, Orchestra, OrchestraError, OrchestraState, RunSummary, StopHandle, TICK_TOLERANCE,
};
