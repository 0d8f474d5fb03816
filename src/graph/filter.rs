use crate::dsp::{
    filter::{ButterworthHighpass, OnePoleLowpass, ThreePoleLowpass, ThreePoleParams},
    plate::{BeatenPlate, PlateParams},
};

/*
Filter Nodes
============

Every filter parameter is an input slot, not a field. The graph evaluates
the parameter nodes first (constants, lines, oscillators...) and hands their
samples in with the audio input, so cutoff sweeps and resonance automation
are sample-accurate:

  [source] ─────────────┐
  [line 0.1→0.9] ───────┤ distortion
  [line 300→3000 Hz] ───┤ cutoff        ──→ [three-pole lowpass] ──→
  [line 0→1] ───────────┘ resonance

Input slots:

  ThreePole   [input, distortion, cutoff_hz, resonance]
  Tone        [input, half_power_hz]
  Highpass    [input, cutoff_hz]
  Plate       [input, frequency_1, frequency_2, cutoff_1, cutoff_2,
               feedback_1, feedback_2]

Out-of-range parameters are clamped inside the DSP code; see
`dsp/filter.rs` and `dsp/plate.rs` for the limits.
*/

#[derive(Debug, Clone)]
pub enum Filter {
    ThreePole(ThreePoleLowpass),
    Tone(OnePoleLowpass),
    Highpass(ButterworthHighpass),
    Plate(BeatenPlate),
}

impl Filter {
    pub fn arity(&self) -> usize {
        match self {
            Filter::ThreePole(_) => 4,
            Filter::Tone(_) | Filter::Highpass(_) => 2,
            Filter::Plate(_) => 7,
        }
    }

    pub(crate) fn produce(&mut self, inputs: &[f32], sample_rate: f32) -> f32 {
        match self {
            Filter::ThreePole(filter) => {
                let params = ThreePoleParams {
                    distortion: inputs[1],
                    cutoff_hz: inputs[2],
                    resonance: inputs[3],
                };
                filter.next_sample(inputs[0], params, sample_rate)
            }
            Filter::Tone(filter) => filter.next_sample(inputs[0], inputs[1], sample_rate),
            Filter::Highpass(filter) => filter.next_sample(inputs[0], inputs[1], sample_rate),
            Filter::Plate(plate) => {
                let params = PlateParams {
                    frequency: [inputs[1], inputs[2]],
                    cutoff_hz: [inputs[3], inputs[4]],
                    feedback: [inputs[5], inputs[6]],
                };
                plate.next_sample(inputs[0], params, sample_rate)
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        match self {
            Filter::ThreePole(filter) => filter.reset(),
            Filter::Tone(filter) => filter.reset(),
            Filter::Highpass(filter) => filter.reset(),
            Filter::Plate(plate) => plate.reset(),
        }
    }
}
