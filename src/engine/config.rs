#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{engine::scheduler::OrchestraError, DEFAULT_SAMPLE_RATE};

/// Static settings of an orchestra.
///
/// - sample_rate: ticks per second (e.g., 44100.0)
/// - channels: number of mix channels delivered to the sink
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestraConfig {
    pub sample_rate: f32,
    pub channels: usize,
}

impl OrchestraConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn validate(&self) -> Result<(), OrchestraError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(OrchestraError::InvalidParameterRange {
                parameter: "sample rate",
                value: self.sample_rate as f64,
            });
        }
        if self.channels == 0 {
            return Err(OrchestraError::InvalidParameterRange {
                parameter: "channels",
                value: 0.0,
            });
        }
        Ok(())
    }
}

impl Default for OrchestraConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 1,
        }
    }
}
