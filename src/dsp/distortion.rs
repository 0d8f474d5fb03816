//! Distortion / Waveshaping
//!
//! The three-pole lowpass drives its input through a `tanh` soft clip before
//! filtering. The amount is expressed as a unipolar `distortion` control
//! (0.0 to 1.0) rather than a raw drive gain, so it can be automated with a
//! line the same way cutoff and resonance are.
//!
//! # Transfer Function
//!
//!   clipped(x) = tanh(x * (1 + distortion * DRIVE))
//!
//!   tanh is smooth and odd-symmetric, compressing peaks toward ±1 while
//!   leaving small signals nearly linear.
//!
//! # Crossfade
//!
//! A bare `tanh` is never transparent: at distortion 0 a DC level of 1.0
//! would still come out as tanh(1) ≈ 0.76. The driven signal is therefore a
//! crossfade between the clean input and the clipped one:
//!
//!   driven = (1 - distortion) * x + distortion * clipped(x)
//!
//!   0.0  = Clean (exact passthrough)
//!   0.5  = Half clean, half saturated at drive 3
//!   1.0  = Fully saturated at drive 5

/// Extra pre-gain applied at full distortion.
pub const DRIVE: f32 = 4.0;

/// Soft clipping using the `tanh` transfer function at a given pre-gain.
#[inline]
pub fn tanh_clip(sample: f32, drive: f32) -> f32 {
    (sample * drive).tanh()
}

/// Apply `distortion` (clamped to 0.0-1.0) to one sample.
#[inline]
pub fn drive(sample: f32, distortion: f32) -> f32 {
    let amount = distortion.max(0.0).min(1.0);
    if amount == 0.0 {
        return sample;
    }

    let clipped = tanh_clip(sample, 1.0 + amount * DRIVE);
    (1.0 - amount) * sample + amount * clipped
}
