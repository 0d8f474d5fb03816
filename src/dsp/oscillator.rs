use std::f64::consts::TAU;

use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Points in the default sine table.
pub const DEFAULT_TABLE_SIZE: usize = 4096;

/// Composite waveform built from weighted harmonic partials.
///
/// `partials[0]` is the fundamental, `partials[1]` the second harmonic and so
/// on. The table is normalised so its peak magnitude is 1.0 (unless every
/// partial is zero).
#[derive(Debug, Clone, PartialEq)]
pub struct SineTable {
    samples: Vec<f32>,
}

impl SineTable {
    /// A pure sine with [`DEFAULT_TABLE_SIZE`] points.
    pub fn new() -> Self {
        Self::with_partials(DEFAULT_TABLE_SIZE, &[1.0])
    }

    pub fn with_partials(size: usize, partials: &[f32]) -> Self {
        let mut samples: Vec<f32> = (0..size)
            .map(|i| {
                let phase = i as f64 / size as f64;
                partials
                    .iter()
                    .enumerate()
                    .map(|(h, &strength)| strength as f64 * (TAU * (h + 1) as f64 * phase).sin())
                    .sum::<f64>() as f32
            })
            .collect();

        let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        if peak > 0.0 {
            samples.iter_mut().for_each(|x| *x /= peak);
        }

        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Linearly interpolated lookup; `phase` is in cycles and wraps.
    pub fn lookup(&self, phase: f64) -> f32 {
        let len = self.samples.len();
        if len == 0 {
            return 0.0;
        }

        let position = phase.rem_euclid(1.0) * len as f64;
        let index = (position as usize).min(len - 1);
        let frac = (position - index as f64) as f32;
        let a = self.samples[index];
        let b = self.samples[(index + 1) % len];
        a + (b - a) * frac
    }
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn phase_increment(frequency: f32, sample_rate: f32) -> f64 {
    if frequency.is_finite() {
        frequency as f64 / sample_rate as f64
    } else {
        0.0
    }
}

// `rem_euclid` rounds tiny negative sums up to exactly 1.0; fold that back.
#[inline]
fn advance_phase(phase: f64, increment: f64) -> f64 {
    let next = (phase + increment).rem_euclid(1.0);
    if next >= 1.0 {
        next - 1.0
    } else {
        next
    }
}

/// Rising 0..1 ramp. Outputs the current phase, then advances.
#[derive(Debug, Clone, Default)]
pub struct Phasor {
    phase: f64,
}

impl Phasor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.phase as f32;
        self.phase = advance_phase(self.phase, phase_increment(frequency, sample_rate));
        out
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Table-lookup oscillator.
#[derive(Debug, Clone, Default)]
pub struct TableOscillator {
    table: SineTable,
    phase: f64,
}

impl TableOscillator {
    pub fn new(table: SineTable) -> Self {
        Self { table, phase: 0.0 }
    }

    pub fn table(&self) -> &SineTable {
        &self.table
    }

    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.table.lookup(self.phase);
        self.phase = advance_phase(self.phase, phase_increment(frequency, sample_rate));
        out
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Struck-stick excitation: a burst of noise under an exponential decay.
///
/// The burst starts at full `amplitude` and falls by 60 dB roughly every
/// `6.9 * damping` seconds. Noise is seeded, so renders are reproducible.
#[derive(Debug, Clone)]
pub struct Stick {
    amplitude: f32,
    damping: f32,
    seed: u64,
    level: f32,
    rng: SmallRng,
}

impl Stick {
    pub const DEFAULT_SEED: u64 = 0x5717_c4;

    pub fn new(amplitude: f32, damping: f32) -> Self {
        Self::with_seed(amplitude, damping, Self::DEFAULT_SEED)
    }

    pub fn with_seed(amplitude: f32, damping: f32, seed: u64) -> Self {
        Self {
            amplitude,
            damping,
            seed,
            level: 1.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Decay time constant in seconds.
    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let noise: f32 = self.rng.gen_range(-1.0..=1.0);
        let out = self.amplitude * self.level * noise;
        self.level *= (-1.0 / (self.damping * sample_rate)).exp();
        out
    }

    pub fn reset(&mut self) {
        self.level = 1.0;
        self.rng = SmallRng::seed_from_u64(self.seed);
    }
}

impl Default for Stick {
    fn default() -> Self {
        Self::new(1.0, 0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_table_shape() {
        let table = SineTable::new();
        assert_eq!(table.len(), DEFAULT_TABLE_SIZE);
        assert!(table.lookup(0.0).abs() < 1e-6);
        assert!((table.lookup(0.25) - 1.0).abs() < 1e-6);
        assert!((table.lookup(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_partials_are_normalised() {
        let table = SineTable::with_partials(1024, &[1.0, 0.5, 0.25]);
        let peak = (0..1024).fold(0.0f32, |acc, i| acc.max(table.lookup(i as f64 / 1024.0).abs()));
        assert!((peak - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_table_is_silent() {
        let table = SineTable::with_partials(0, &[1.0]);
        assert!(table.is_empty());
        assert_eq!(table.lookup(0.3), 0.0);
    }

    #[test]
    fn test_phasor_ramps_and_wraps() {
        // 1/64 is exact in binary, so phase accumulation is exact too
        let sample_rate = 64.0;
        let mut phasor = Phasor::new();
        let output: Vec<f32> = (0..=64).map(|_| phasor.next_sample(1.0, sample_rate)).collect();

        assert_eq!(output[0], 0.0);
        assert_eq!(output[32], 0.5);
        assert_eq!(output[64], 0.0);
        assert!(output.iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_tiny_negative_frequency_stays_below_one() {
        let mut phasor = Phasor::new();
        let mut osc = TableOscillator::new(SineTable::new());
        for _ in 0..4 {
            let x = phasor.next_sample(-1e-12, 44_100.0);
            assert!((0.0..1.0).contains(&x), "phase {x}");
            assert!(osc.next_sample(-1e-12, 44_100.0).is_finite());
        }
        assert!((0.0..1.0).contains(&advance_phase(0.0, -1e-17)));
    }

    #[test]
    fn test_phasor_runs_backwards_for_negative_frequency() {
        let mut phasor = Phasor::new();
        let output: Vec<f32> = (0..3).map(|_| phasor.next_sample(-16.0, 64.0)).collect();
        assert_eq!(output, vec![0.0, 0.75, 0.5]);
    }

    #[test]
    fn test_phasor_ignores_non_finite_frequency() {
        let mut phasor = Phasor::new();
        phasor.next_sample(f32::NAN, 44_100.0);
        assert_eq!(phasor.next_sample(f32::INFINITY, 44_100.0), 0.0);
    }

    #[test]
    fn test_table_oscillator_quarter_cycle() {
        let mut osc = TableOscillator::new(SineTable::new());
        let sample_rate = 64.0;
        let output: Vec<f32> = (0..64).map(|_| osc.next_sample(1.0, sample_rate)).collect();
        assert!((output[16] - 1.0).abs() < 1e-5);
        assert!((output[48] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stick_decays_and_is_bounded() {
        let mut stick = Stick::new(0.8, 0.01);
        let output: Vec<f32> = (0..4410).map(|_| stick.next_sample(44_100.0)).collect();

        assert!(output.iter().all(|x| x.abs() <= 0.8));
        let head: f32 = output[..441].iter().map(|x| x * x).sum();
        let tail: f32 = output[3969..].iter().map(|x| x * x).sum();
        assert!(tail < head * 1e-3, "head={head}, tail={tail}");
    }

    #[test]
    fn test_stick_is_reproducible() {
        let mut a = Stick::with_seed(1.0, 0.05, 7);
        let mut b = Stick::with_seed(1.0, 0.05, 7);
        let first: Vec<f32> = (0..32).map(|_| a.next_sample(44_100.0)).collect();
        let second: Vec<f32> = (0..32).map(|_| b.next_sample(44_100.0)).collect();
        assert_eq!(first, second);

        a.reset();
        let replay: Vec<f32> = (0..32).map(|_| a.next_sample(44_100.0)).collect();
        assert_eq!(first, replay);
    }
}
