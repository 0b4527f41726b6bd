//! Fluctuation, gradient and frequency-domain analysis of the system power
//! series.
//!
//! The series is sampled once per minute. Spectra are computed on the signed
//! first difference of the series (the minute-to-minute power swing), and the
//! frequency axis is reported in cycles per day.
//!
//! Only the real part of each FFT coefficient is kept, both for the power
//! spectrum and for the PSD. This matches the reference plots the outputs are
//! compared against; switching to the full complex magnitude changes every
//! value.

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Sampling parameters of the analysed series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralConfig {
    /// Sample spacing in hours, `1/60` for one-minute samples. Used both
    /// as the PSD normaliser and as the `d` of the FFT frequency formula.
    pub sampling_rate: f64,
    /// Multiplier applied to FFT bin frequencies for display (24 turns
    /// per-hour units into per-day units).
    pub frequency_scale: f64,
}

impl SpectralConfig {
    /// Configuration for a series with the given spacing in seconds.
    pub fn from_interval_secs(interval_secs: f64) -> Self {
        Self {
            sampling_rate: interval_secs / 3600.0,
            ..Self::default()
        }
    }
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 1.0 / 60.0,
            frequency_scale: 24.0,
        }
    }
}

/// Every spectral product of one system power series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpectralResult {
    /// Signed first difference, length N−1.
    pub fluctuations: Vec<f64>,
    /// Absolute first difference, length N−1.
    pub magnitudes: Vec<f64>,
    /// Numerical gradient, length N.
    pub gradient: Vec<f64>,
    /// Squared real part of the FFT of `fluctuations`, length N−1.
    pub power_spectrum: Vec<f64>,
    /// Positive-frequency real spectrum scaled to a density, DC excluded.
    pub psd: Vec<f64>,
    /// Frequency of each `psd` bin, in cycles per day by default.
    pub frequencies: Vec<f64>,
}

/// `x[i+1] - x[i]`; empty when fewer than two samples.
pub fn first_difference(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Absolute minute-to-minute change in power.
pub fn fluctuation_magnitude(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| (w[1] - w[0]).abs()).collect()
}

/// Second-order central differences in the interior and first-order
/// one-sided differences at the ends, unit spacing.
pub fn gradient(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    if n < 2 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(n);
    out.push(series[1] - series[0]);
    for i in 1..n - 1 {
        out.push((series[i + 1] - series[i - 1]) / 2.0);
    }
    out.push(series[n - 1] - series[n - 2]);
    out
}

/// Real part of the forward DFT of `signal`.
pub fn real_spectrum(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&re| Complex { re, im: 0.0 }).collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);
    buffer.iter().map(|c| c.re).collect()
}

/// `|Re(X[k])|²` for every bin.
pub fn power_spectrum(real: &[f64]) -> Vec<f64> {
    real.iter().map(|r| r.abs().powi(2)).collect()
}

/// Bins `1..⌊n/2⌋` of an `n`-point spectrum: positive frequencies without DC.
fn positive_bins(n: usize) -> std::ops::Range<usize> {
    1..(n / 2).max(1)
}

/// Positive-frequency real spectrum divided by `n · sampling_rate`.
pub fn power_spectral_density(real: &[f64], sampling_rate: f64) -> Vec<f64> {
    let n = real.len();
    let scale = n as f64 * sampling_rate;
    real.get(positive_bins(n))
        .unwrap_or(&[])
        .iter()
        .map(|r| r / scale)
        .collect()
}

/// FFT bin frequencies `k / (n · d)` with `d = sampling_rate`, for the same
/// bins as [`power_spectral_density`], multiplied by `scale`.
pub fn frequency_axis(n: usize, sampling_rate: f64, scale: f64) -> Vec<f64> {
    positive_bins(n)
        .map(|k| k as f64 / (n as f64 * sampling_rate) * scale)
        .collect()
}

/// Run the full analysis on an ascending, uniformly sampled series.
pub fn analyze(series: &[f64], config: &SpectralConfig) -> Result<SpectralResult, PipelineError> {
    if series.len() < 2 {
        return Err(PipelineError::ShortSeries { len: series.len() });
    }
    let fluctuations = first_difference(series);
    let real = real_spectrum(&fluctuations);
    Ok(SpectralResult {
        magnitudes: fluctuations.iter().map(|d| d.abs()).collect(),
        gradient: gradient(series),
        power_spectrum: power_spectrum(&real),
        psd: power_spectral_density(&real, config.sampling_rate),
        frequencies: frequency_axis(fluctuations.len(), config.sampling_rate, config.frequency_scale),
        fluctuations,
    })
}
