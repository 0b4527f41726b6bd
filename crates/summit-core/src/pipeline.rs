//! Per-dataset pipeline and the multi-dataset driver.
//!
//! Stages run strictly in sequence for one dataset:
//! dedup/aggregate → derived metrics → {cabinet rollup, system series →
//! spectral analysis → summary}. Datasets are independent of each other; a
//! failure in one is reported and the rest still run.

use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::aggregate_nodes;
use crate::config::{DatasetSpec, PipelineConfig};
use crate::error::{DatasetError, PipelineError};
use crate::loader::RecordLoader;
use crate::metrics::{NodeAggregate, derive_nodes};
use crate::rollup::{CabinetAggregate, SystemPowerSeries, cabinet_rollup, system_power_series};
use crate::sample::TelemetrySample;
use crate::spectral::{SpectralResult, analyze};
use crate::summary::PowerSummary;

/// Everything the renderer receives for one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub label: String,
    pub raw_rows: usize,
    /// Node table keyed by `(timestamp, hostname, cabinet)`.
    pub nodes: Vec<NodeAggregate>,
    /// Cabinet table keyed by `(timestamp, cabinet)`.
    pub cabinets: Vec<CabinetAggregate>,
    pub system_power: SystemPowerSeries,
    pub spectral: SpectralResult,
    pub summary: PowerSummary,
}

impl DatasetReport {
    pub fn node_count(&self) -> usize {
        let mut hosts: Vec<&str> = self.nodes.iter().map(|n| n.hostname.as_str()).collect();
        hosts.sort_unstable();
        hosts.dedup();
        hosts.len()
    }

    pub fn cabinet_count(&self) -> usize {
        let mut cabs: Vec<&str> = self.cabinets.iter().map(|c| c.cabinet.as_str()).collect();
        cabs.sort_unstable();
        cabs.dedup();
        cabs.len()
    }
}

/// Outcome of one dataset in a multi-dataset run.
#[derive(Debug)]
pub struct DatasetOutcome {
    pub dataset: DatasetSpec,
    pub result: Result<DatasetReport, DatasetError>,
}

impl DatasetOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every stage on rows already in memory.
pub fn process_samples(
    dataset: &DatasetSpec,
    samples: &[TelemetrySample],
    config: &PipelineConfig,
) -> Result<DatasetReport, DatasetError> {
    run_stages(&dataset.label, samples, config).map_err(|e| DatasetError::new(&dataset.label, e))
}

fn run_stages(
    label: &str,
    samples: &[TelemetrySample],
    config: &PipelineConfig,
) -> Result<DatasetReport, PipelineError> {
    if samples.is_empty() {
        return Err(PipelineError::InsufficientData);
    }
    let policy = config.nan_policy;

    let cleaned = aggregate_nodes(samples, policy);
    let nodes = derive_nodes(&cleaned, policy);
    let cabinets = cabinet_rollup(&nodes, policy);
    let system_power = system_power_series(&nodes, policy);
    debug!(
        "{label}: {} node rows, {} cabinet rows, {} timestamps",
        nodes.len(),
        cabinets.len(),
        system_power.len()
    );

    let spectral = analyze(system_power.values(), &config.spectral())?;
    let summary = PowerSummary::from_series(&system_power, &spectral);

    Ok(DatasetReport {
        label: label.to_string(),
        raw_rows: samples.len(),
        nodes,
        cabinets,
        system_power,
        spectral,
        summary,
    })
}

/// Load one dataset and run it through the pipeline.
pub fn process_dataset(
    loader: &dyn RecordLoader,
    dataset: &DatasetSpec,
    config: &PipelineConfig,
) -> Result<DatasetReport, DatasetError> {
    let t0 = Instant::now();
    let samples = loader
        .load(dataset)
        .map_err(|e| DatasetError::new(&dataset.label, e))?;
    let report = process_samples(dataset, &samples, config)?;
    info!(
        "{}: {} raw rows → {} nodes, {} timestamps in {:.2}s",
        dataset.label,
        report.raw_rows,
        report.node_count(),
        report.system_power.len(),
        t0.elapsed().as_secs_f64()
    );
    Ok(report)
}

/// Process every dataset independently. The outcome list is in input order.
pub fn process_all(
    loader: &dyn RecordLoader,
    datasets: &[DatasetSpec],
    config: &PipelineConfig,
) -> Vec<DatasetOutcome> {
    let run_one = |dataset: &DatasetSpec| {
        let result = process_dataset(loader, dataset, config);
        if let Err(e) = &result {
            warn!("{e}");
        }
        DatasetOutcome {
            dataset: dataset.clone(),
            result,
        }
    };
    if config.parallel {
        datasets.par_iter().map(run_one).collect()
    } else {
        datasets.iter().map(run_one).collect()
    }
}
