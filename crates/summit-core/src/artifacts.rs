//! Renderer hand-off: per-dataset JSON artifacts and a run manifest.
//!
//! # Layout
//!
//! Each run is a directory `{output_dir}/{YYYYMMDDTHHMMSSZ}-{run-id-prefix}`:
//! - `{slug}.json`: one [`DatasetReport`] per successful dataset
//! - `manifest.json`: run id, timing, settings and per-dataset status

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::{DatasetOutcome, DatasetReport};

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub label: String,
    pub source: String,
    /// Artifact file name, present only for successful datasets.
    pub artifact: Option<String>,
    pub error: Option<String>,
}

/// `manifest.json` contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub version: u32,
    pub id: String,
    pub started_at: String,
    pub ended_at: String,
    pub duration_ms: u64,
    pub nan_policy: String,
    pub sampling_interval_secs: f64,
    pub frequency_scale: f64,
    pub succeeded: usize,
    pub failed: usize,
    pub datasets: Vec<ManifestEntry>,
    pub summit_version: String,
}

/// Writes one run's artifacts.
pub struct ArtifactWriter {
    run_dir: PathBuf,
    run_id: String,
    started_at: DateTime<Utc>,
    started_instant: Instant,
    config: PipelineConfig,
}

impl ArtifactWriter {
    /// Create the run directory under `output_dir`.
    pub fn new(output_dir: &Path, config: PipelineConfig) -> Result<Self, PipelineError> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let dir_name = format!("{}-{}", started_at.format("%Y%m%dT%H%M%SZ"), &run_id[..8]);
        let run_dir = output_dir.join(dir_name);
        fs::create_dir_all(&run_dir)?;
        debug!("artifact run directory {}", run_dir.display());
        Ok(Self {
            run_dir,
            run_id,
            started_at,
            started_instant: Instant::now(),
            config,
        })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Write one dataset report, returning the artifact file name.
    pub fn write_report(&self, slug: &str, report: &DatasetReport) -> Result<String, PipelineError> {
        let file_name = format!("{slug}.json");
        let json = serde_json::to_string_pretty(report)?;
        fs::write(self.run_dir.join(&file_name), json)?;
        Ok(file_name)
    }

    /// Write every successful report plus the manifest; returns the run
    /// directory.
    pub fn finish(self, outcomes: &[DatasetOutcome]) -> Result<PathBuf, PipelineError> {
        let mut entries = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            let (artifact, error) = match &outcome.result {
                Ok(report) => (Some(self.write_report(&outcome.dataset.slug(), report)?), None),
                Err(e) => (None, Some(e.source.to_string())),
            };
            entries.push(ManifestEntry {
                label: outcome.dataset.label.clone(),
                source: outcome.dataset.path.display().to_string(),
                artifact,
                error,
            });
        }

        let succeeded = entries.iter().filter(|e| e.artifact.is_some()).count();
        let manifest = RunManifest {
            version: 1,
            id: self.run_id.clone(),
            started_at: self.started_at.to_rfc3339(),
            ended_at: Utc::now().to_rfc3339(),
            duration_ms: self.started_instant.elapsed().as_millis() as u64,
            nan_policy: self.config.nan_policy.to_string(),
            sampling_interval_secs: self.config.sampling_interval_secs,
            frequency_scale: self.config.frequency_scale,
            succeeded,
            failed: entries.len() - succeeded,
            datasets: entries,
            summit_version: crate::VERSION.to_string(),
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(self.run_dir.join("manifest.json"), json)?;
        Ok(self.run_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetSpec;
    use crate::error::DatasetError;
    use crate::pipeline::process_samples;
    use crate::sample::{Readings, TelemetrySample, Timestamp};

    fn report(label: &str) -> DatasetReport {
        let rows: Vec<_> = (0..4)
            .map(|i| TelemetrySample::new(Timestamp(i * 60), "a01n01", Readings::filled(i as f64)))
            .collect();
        process_samples(&DatasetSpec::new(label, "x.csv"), &rows, &PipelineConfig::default())
            .unwrap()
    }

    #[test]
    fn writes_reports_and_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(tmp.path(), PipelineConfig::default()).unwrap();
        let run_id = writer.run_id().to_string();
        let outcomes = vec![
            DatasetOutcome {
                dataset: DatasetSpec::new("Jan 20, 2020", "20200120.csv"),
                result: Ok(report("Jan 20, 2020")),
            },
            DatasetOutcome {
                dataset: DatasetSpec::new("Aug 20, 2020", "20200820.csv"),
                result: Err(DatasetError::new("Aug 20, 2020", PipelineError::InsufficientData)),
            },
        ];
        let dir = writer.finish(&outcomes).unwrap();
        assert!(dir.starts_with(tmp.path()));

        let artifact: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("Jan202020.json")).unwrap()).unwrap();
        assert_eq!(artifact["label"], "Jan 20, 2020");
        assert_eq!(artifact["system_power"]["input_power"].as_array().unwrap().len(), 4);
        assert_eq!(artifact["spectral"]["gradient"].as_array().unwrap().len(), 4);
        assert!(!dir.join("Aug202020.json").exists());

        let manifest: RunManifest =
            serde_json::from_str(&fs::read_to_string(dir.join("manifest.json")).unwrap()).unwrap();
        assert_eq!(manifest.id, run_id);
        assert_eq!(manifest.succeeded, 1);
        assert_eq!(manifest.failed, 1);
        assert_eq!(manifest.datasets[0].artifact.as_deref(), Some("Jan202020.json"));
        assert!(manifest.datasets[1].error.as_deref().unwrap().contains("no telemetry rows"));
        assert_eq!(manifest.nan_policy, "propagate");
    }

    #[test]
    fn run_dir_name_carries_run_id_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(tmp.path(), PipelineConfig::default()).unwrap();
        let name = writer.run_dir().file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.ends_with(&writer.run_id()[..8]));
        assert!(writer.run_dir().is_dir());
    }
}
