//! Coarse spectrum of a rendered buffer.
//!
//! FFT with a Hann window, read out at log-spaced frequencies.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of log-spaced bands reported
const SPECTRUM_BANDS: usize = 12;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// Frequency of each band (Hz)
    freq_bins: Vec<f64>,
    /// FFT bin index of each band
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (frequency_hz, magnitude_db) per band
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size; buffers of any other length are ignored.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let window: Vec<f32> = (0..buffer_len)
            .map(|i| {
                if buffer_len > 1 {
                    let denom = (buffer_len - 1) as f32;
                    0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
                } else {
                    1.0
                }
            })
            .collect();

        // 20 Hz to Nyquist (capped at 20 kHz)
        let max_freq = (sample_rate / 2.0).min(20_000.0).max(1.0) as f64;
        let min_freq = 20.0f64.min(max_freq);
        let ratio = max_freq / min_freq;
        let half = (buffer_len / 2).max(1);

        let (freq_bins, bin_indices) = (0..SPECTRUM_BANDS)
            .map(|i| {
                let t = i as f64 / (SPECTRUM_BANDS - 1) as f64;
                let freq = min_freq * ratio.powf(t);
                let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
                (freq, index.min(half - 1))
            })
            .unzip();

        Self {
            window,
            freq_bins,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum: Vec::with_capacity(SPECTRUM_BANDS),
        }
    }

    pub fn analyze(&mut self, buffer: &[f32]) -> &[(f64, f64)] {
        self.spectrum.clear();
        if buffer.len() != self.window.len() {
            return &self.spectrum;
        }

        for (slot, (sample, w)) in self.scratch.iter_mut().zip(buffer.iter().zip(&self.window)) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (&freq, &index) in self.freq_bins.iter().zip(&self.bin_indices) {
            let bin = self.scratch[index];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12);
            self.spectrum.push((freq, 10.0 * (power as f64).log10()));
        }
        &self.spectrum
    }
}

/// Largest power of two that fits in both the buffer and one second of audio.
pub fn fft_len(available: usize, sample_rate: f32) -> usize {
    let limit = available.min(sample_rate as usize);
    if limit < 2 {
        return 0;
    }
    1 << (usize::BITS - 1 - limit.leading_zeros())
}
