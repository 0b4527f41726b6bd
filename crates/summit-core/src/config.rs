//! Run configuration: which snapshots to process and how.
//!
//! Configuration is a JSON document; every field is optional and falls back
//! to the defaults below, which describe the five reference snapshot dates.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::group::NanPolicy;
use crate::spectral::SpectralConfig;

/// One dated snapshot to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Human-readable name, e.g. `Jan 20, 2020`. Errors and artifacts are
    /// labelled with it.
    pub label: String,
    pub path: PathBuf,
}

impl DatasetSpec {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Parse a `LABEL=PATH` command-line argument. A bare path uses its file
    /// stem as the label.
    pub fn parse(arg: &str) -> Result<Self, ConfigError> {
        match arg.split_once('=') {
            Some((label, path)) => {
                let (label, path) = (label.trim(), path.trim());
                if label.is_empty() || path.is_empty() {
                    return Err(ConfigError::DatasetSpec(arg.to_string()));
                }
                Ok(Self::new(label, path))
            }
            None => {
                let path = Path::new(arg.trim());
                let label = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| ConfigError::DatasetSpec(arg.to_string()))?;
                Ok(Self::new(label, path))
            }
        }
    }

    /// File-name-safe form of the label: spaces, commas and colons removed.
    pub fn slug(&self) -> String {
        self.label
            .chars()
            .filter(|c| !matches!(c, ' ' | ',' | ':'))
            .collect()
    }
}

/// Settings that shape the numeric pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub nan_policy: NanPolicy,
    /// Spacing of the snapshot time series in seconds.
    pub sampling_interval_secs: f64,
    /// Multiplier turning per-hour FFT frequencies into display units.
    pub frequency_scale: f64,
    /// Process datasets on a rayon pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            nan_policy: NanPolicy::Propagate,
            sampling_interval_secs: 60.0,
            frequency_scale: 24.0,
            parallel: false,
        }
    }
}

impl PipelineConfig {
    pub fn spectral(&self) -> SpectralConfig {
        SpectralConfig {
            frequency_scale: self.frequency_scale,
            ..SpectralConfig::from_interval_secs(self.sampling_interval_secs)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sampling_interval_secs.is_finite() && self.sampling_interval_secs > 0.0) {
            return Err(ConfigError::SamplingInterval(self.sampling_interval_secs));
        }
        Ok(())
    }
}

/// A whole run: datasets plus pipeline settings plus output location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub datasets: Vec<DatasetSpec>,
    pub pipeline: PipelineConfig,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            datasets: default_datasets(),
            pipeline: PipelineConfig::default(),
            output_dir: PathBuf::from("artifacts"),
        }
    }
}

impl RunConfig {
    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: RunConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.pipeline.validate()?;
        Ok(config)
    }
}

/// The five reference snapshots, one per calendar date.
pub fn default_datasets() -> Vec<DatasetSpec> {
    [
        ("Jan 20, 2020", "20200120"),
        ("Aug 20, 2020", "20200820"),
        ("Feb 20, 2021", "20210220"),
        ("Aug 10, 2021", "20210810"),
        ("Jan 20, 2022", "20220120"),
    ]
    .into_iter()
    .map(|(label, date)| DatasetSpec::new(label, format!("{date}.csv")))
    .collect()
}
