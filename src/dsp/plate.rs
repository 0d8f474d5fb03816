use crate::dsp::filter::{clamp_cutoff, OnePoleLowpass, MAX_CUTOFF_RATIO};

/*
Beaten Plate
============

Two waveguides (a delay line plus a damping lowpass) running in parallel
and sharing one feedback path:

              ┌──────────── feedback sum ◄──────────────┐
              ▼                                         │
  input ──►( + )──┬──► [delay 1/f1] ──► [tone c1] ──► ×fb1 ──┐
                  │                                          ├──► out
                  └──► [delay 1/f2] ──► [tone c2] ──► ×fb2 ──┘

Each delay line is one period of its frequency long, so an excitation
(a stick, a click) rings at both frequencies while the tone filters eat
the highs on every pass. The output is the feedback sum itself.

The damping filters have unity DC gain and never boost, so the loop stays
stable as long as |fb1| + |fb2| < 1. Each gain is clamped to
±PLATE_FEEDBACK_LIMIT to guarantee that.
*/

/// Samples held by each waveguide.
pub const MAX_WAVEGUIDE_SAMPLES: usize = 1 << 14;
/// Largest magnitude either feedback gain runs at.
pub const PLATE_FEEDBACK_LIMIT: f32 = 0.49;

/// Per-tick control values for [`BeatenPlate`]; index 0 and 1 are the two
/// waveguides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateParams {
    pub frequency: [f32; 2],
    pub cutoff_hz: [f32; 2],
    pub feedback: [f32; 2],
}

impl Default for PlateParams {
    fn default() -> Self {
        Self {
            frequency: [5000.0, 2000.0],
            cutoff_hz: [3000.0, 1500.0],
            feedback: [0.25, 0.25],
        }
    }
}

#[derive(Debug, Clone)]
struct Waveguide {
    buffer: Vec<f32>,
    write_pos: usize,
    damping: OnePoleLowpass,
}

impl Waveguide {
    fn new() -> Self {
        Self {
            buffer: vec![0.0; MAX_WAVEGUIDE_SAMPLES],
            write_pos: 0,
            damping: OnePoleLowpass::new(),
        }
    }

    // Linear interpolation between the two samples around `delay`.
    fn read(&self, delay: f32) -> f32 {
        let delay = delay.min((MAX_WAVEGUIDE_SAMPLES - 2) as f32).max(1.0);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let newer = self.buffer[(self.write_pos + MAX_WAVEGUIDE_SAMPLES - whole) % MAX_WAVEGUIDE_SAMPLES];
        let older =
            self.buffer[(self.write_pos + MAX_WAVEGUIDE_SAMPLES - whole - 1) % MAX_WAVEGUIDE_SAMPLES];
        newer + (older - newer) * frac
    }

    fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % MAX_WAVEGUIDE_SAMPLES;
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.damping.reset();
    }
}

/// Two-waveguide resonator modelling a struck metal plate.
#[derive(Debug, Clone)]
pub struct BeatenPlate {
    guides: [Waveguide; 2],
}

impl BeatenPlate {
    pub fn new() -> Self {
        Self {
            guides: [Waveguide::new(), Waveguide::new()],
        }
    }

    pub fn next_sample(&mut self, input: f32, params: PlateParams, sample_rate: f32) -> f32 {
        if !input.is_finite() {
            self.reset();
            return 0.0;
        }

        let defaults = PlateParams::default();
        // Lowest frequency whose period still fits in the buffer.
        let lowest = sample_rate / (MAX_WAVEGUIDE_SAMPLES - 2) as f32;

        let mut out = 0.0;
        for (i, guide) in self.guides.iter_mut().enumerate() {
            let frequency = finite_or(params.frequency[i], defaults.frequency[i])
                .min(sample_rate * MAX_CUTOFF_RATIO)
                .max(lowest);
            let cutoff = clamp_cutoff(params.cutoff_hz[i], defaults.cutoff_hz[i], sample_rate);
            let feedback = finite_or(params.feedback[i], defaults.feedback[i])
                .min(PLATE_FEEDBACK_LIMIT)
                .max(-PLATE_FEEDBACK_LIMIT);

            let delayed = guide.read(sample_rate / frequency);
            out += feedback * guide.damping.next_sample(delayed, cutoff, sample_rate);
        }

        let excitation = input + out;
        self.guides.iter_mut().for_each(|guide| guide.write(excitation));
        out
    }

    pub fn reset(&mut self) {
        self.guides.iter_mut().for_each(Waveguide::reset);
    }
}

impl Default for BeatenPlate {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
