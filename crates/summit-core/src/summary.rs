//! Scalar summaries of a dataset's system power behaviour.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::rollup::SystemPowerSeries;
use crate::spectral::SpectralResult;

/// Headline numbers for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerSummary {
    pub samples: usize,
    pub mean_power: f64,
    /// Sample standard deviation; `NaN` for fewer than two samples.
    pub std_dev_power: f64,
    pub min_power: f64,
    pub max_power: f64,
    pub peak_to_peak: f64,
    pub mean_fluctuation: f64,
    pub max_fluctuation: f64,
    /// Frequency of the PSD bin with the largest absolute density.
    pub dominant_frequency: Option<f64>,
}

impl PowerSummary {
    pub fn from_series(series: &SystemPowerSeries, spectral: &SpectralResult) -> Self {
        let values = series.values();
        let min_power = Statistics::min(values.iter());
        let max_power = Statistics::max(values.iter());
        PowerSummary {
            samples: values.len(),
            mean_power: values.iter().mean(),
            std_dev_power: values.iter().std_dev(),
            min_power,
            max_power,
            peak_to_peak: max_power - min_power,
            mean_fluctuation: spectral.magnitudes.iter().mean(),
            max_fluctuation: Statistics::max(spectral.magnitudes.iter()),
            dominant_frequency: dominant_frequency(&spectral.psd, &spectral.frequencies),
        }
    }
}

/// Frequency whose PSD bin has the largest magnitude, ignoring a flat
/// (all-zero) spectrum.
pub fn dominant_frequency(psd: &[f64], frequencies: &[f64]) -> Option<f64> {
    psd.iter()
        .zip(frequencies)
        .filter(|(p, _)| p.is_finite() && **p != 0.0)
        .max_by(|a, b| a.0.abs().total_cmp(&b.0.abs()))
        .map(|(_, &f)| f)
}

/// The `top` PSD bins by absolute density, strongest first, as
/// `(frequency, density)` pairs.
pub fn strongest_bins(spectral: &SpectralResult, top: usize) -> Vec<(f64, f64)> {
    let mut bins: Vec<(f64, f64)> = spectral
        .frequencies
        .iter()
        .copied()
        .zip(spectral.psd.iter().copied())
        .filter(|(_, p)| p.is_finite())
        .collect();
    bins.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    bins.truncate(top);
    bins
}
