use std::f32::consts::{SQRT_2, TAU};

use tracing::warn;

/*
| type               | order | passes          | rejects      | state          |
| ------------------ | ----- | --------------- | ------------ | -------------- |
| three-pole lowpass | 3     | below cutoff    | above cutoff | 3 stages       |
| tone               | 1     | below half-pow. | above        | 1 output tap   |
| butterworth hp     | 2     | above cutoff    | below cutoff | 2 in + 2 out   |

All filters share the same contract: parameters that leave their range are
clamped (a modulated cutoff must never stop the stream), and a non-finite
input sample wipes the state and produces exactly 0.0 for that tick.
*/

/// Lowest cutoff any filter will run at.
pub const MIN_CUTOFF_HZ: f32 = 1.0;
/// Highest cutoff as a fraction of the sample rate (just under Nyquist).
pub const MAX_CUTOFF_RATIO: f32 = 0.49;
/// Feedback gain the three-pole filter will never exceed.
pub const RESONANCE_LIMIT: f32 = 0.95;

pub const DEFAULT_CUTOFF_HZ: f32 = 1000.0;
pub const DEFAULT_HALF_POWER_HZ: f32 = 1000.0;
pub const DEFAULT_HIGHPASS_HZ: f32 = 500.0;

#[inline]
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Clamp a cutoff into `[MIN_CUTOFF_HZ, MAX_CUTOFF_RATIO * sample_rate]`.
///
/// Non-finite cutoffs fall back to `fallback` before clamping.
#[inline]
pub fn clamp_cutoff(cutoff_hz: f32, fallback: f32, sample_rate: f32) -> f32 {
    finite_or(cutoff_hz, fallback)
        .min(sample_rate * MAX_CUTOFF_RATIO)
        .max(MIN_CUTOFF_HZ)
}

/// One-pole smoothing coefficient: `a = 1 - exp(-2π·fc/fs)`, kept inside (0, 1).
#[inline]
pub fn one_pole_coefficient(cutoff_hz: f32, sample_rate: f32) -> f32 {
    let a = 1.0 - (-TAU * cutoff_hz / sample_rate).exp();
    a.max(f32::EPSILON).min(1.0 - f32::EPSILON)
}

/// Per-tick control values for [`ThreePoleLowpass`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreePoleParams {
    pub distortion: f32,
    pub cutoff_hz: f32,
    pub resonance: f32,
}

impl Default for ThreePoleParams {
    fn default() -> Self {
        Self {
            distortion: 0.0,
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            resonance: 0.0,
        }
    }
}

/// Three cascaded one-pole lowpass stages with driven input and
/// negative feedback from the last stage.
#[derive(Debug, Clone, Default)]
pub struct ThreePoleLowpass {
    stages: [f32; 3],
    resonance_clamped: bool,
}

impl ThreePoleLowpass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_sample(&mut self, input: f32, params: ThreePoleParams, sample_rate: f32) -> f32 {
        if !input.is_finite() {
            self.reset();
            return 0.0;
        }

        let distortion = finite_or(params.distortion, 0.0);
        let cutoff = clamp_cutoff(params.cutoff_hz, DEFAULT_CUTOFF_HZ, sample_rate);
        let feedback = self.feedback_gain(finite_or(params.resonance, 0.0));

        let driven = super::distortion::drive(input, distortion);
        let a = one_pole_coefficient(cutoff, sample_rate);

        let mut x = driven - feedback * self.stages[2];
        for stage in self.stages.iter_mut() {
            *stage += a * (x - *stage);
            x = *stage;
        }

        self.stages[2]
    }

    // Warn once per excursion above the limit, not once per tick.
    fn feedback_gain(&mut self, resonance: f32) -> f32 {
        if resonance >= RESONANCE_LIMIT {
            if !self.resonance_clamped {
                warn!(
                    resonance,
                    limit = RESONANCE_LIMIT,
                    "three-pole lowpass resonance clamped to stability limit"
                );
                self.resonance_clamped = true;
            }
            RESONANCE_LIMIT
        } else {
            self.resonance_clamped = false;
            resonance.max(0.0)
        }
    }

    /// Whether the last processed sample ran with clamped resonance.
    pub fn is_resonance_clamped(&self) -> bool {
        self.resonance_clamped
    }

    pub fn stages(&self) -> [f32; 3] {
        self.stages
    }

    pub fn reset(&mut self) {
        self.stages = [0.0; 3];
    }
}

/// First-order recursive lowpass with a half-power point ("tone").
///
/// Unity gain at DC; the response is -3 dB at the half-power frequency.
#[derive(Debug, Clone, Default)]
pub struct OnePoleLowpass {
    previous: f32,
}

impl OnePoleLowpass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_sample(&mut self, input: f32, half_power_hz: f32, sample_rate: f32) -> f32 {
        if !input.is_finite() {
            self.reset();
            return 0.0;
        }

        let hp = clamp_cutoff(half_power_hz, DEFAULT_HALF_POWER_HZ, sample_rate);
        let b = 2.0 - (TAU * hp / sample_rate).cos();
        let c2 = b - (b * b - 1.0).sqrt();
        let c1 = 1.0 - c2;

        self.previous = c1 * input + c2 * self.previous;
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = 0.0;
    }
}

/// Second-order Butterworth highpass (bilinear transform).
#[derive(Debug, Clone, Default)]
pub struct ButterworthHighpass {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl ButterworthHighpass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_sample(&mut self, input: f32, cutoff_hz: f32, sample_rate: f32) -> f32 {
        if !input.is_finite() {
            self.reset();
            return 0.0;
        }

        let cutoff = clamp_cutoff(cutoff_hz, DEFAULT_HIGHPASS_HZ, sample_rate);
        let c = (std::f32::consts::PI * cutoff / sample_rate).tan();
        let c2 = c * c;

        let a1 = 1.0 / (1.0 + SQRT_2 * c + c2);
        let a2 = -2.0 * a1;
        let a3 = a1;
        let b1 = 2.0 * (c2 - 1.0) * a1;
        let b2 = (1.0 - SQRT_2 * c + c2) * a1;

        let y = a1 * input + a2 * self.x1 + a3 * self.x2 - b1 * self.y1 - b2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
