//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything here works one sample at a time and never allocates while
//! rendering, so a node can call straight into it from its tick. Graph
//! wiring, parameter routing and scheduling live one layer up.

/// `tanh` soft clipping driven by a unipolar distortion amount.
pub mod distortion;
/// Three-pole lowpass, one-pole tone and Butterworth highpass filters.
pub mod filter;
/// Linear parameter ramps.
pub mod line;
/// Phasor, table oscillator and stick excitation.
pub mod oscillator;
/// Two-waveguide beaten plate resonator.
pub mod plate;

pub use line::Line;
