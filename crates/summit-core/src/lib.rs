//! # summit-core
//!
//! **Node power and temperature telemetry, cleaned and turned into spectra.**
//!
//! `summit-core` takes per-date snapshots of a supercomputer's compute nodes
//! (two power-supply rails plus GPU and CPU temperatures per node, sampled
//! once a minute), repairs duplicated rows, derives node and cabinet power and
//! temperature tables, and analyses the machine-wide power draw in the time
//! and frequency domains.
//!
//! ## Quick Start
//!
//! ```no_run
//! use summit_core::{CsvLoader, DatasetSpec, PipelineConfig, process_dataset};
//!
//! let dataset = DatasetSpec::new("Jan 20, 2020", "20200120.csv");
//! let report = process_dataset(&CsvLoader::default(), &dataset, &PipelineConfig::default())?;
//!
//! println!(
//!     "{}: mean draw {:.0} W over {} minutes",
//!     report.label, report.summary.mean_power, report.system_power.len()
//! );
//! # Ok::<(), summit_core::DatasetError>(())
//! ```
//!
//! ## Architecture
//!
//! Loader → Dedup/Aggregate → Derived metrics → {Cabinet rollup, System series → Spectral} → Artifacts
//!
//! Each stage returns a new table; nothing is mutated after it is produced.
//! Datasets are processed independently, optionally in parallel, and a failing
//! dataset never stops the others.

pub mod aggregate;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod group;
pub mod loader;
pub mod metrics;
pub mod pipeline;
pub mod rollup;
pub mod sample;
pub mod schema;
pub mod spectral;
pub mod summary;

pub use aggregate::{aggregate_nodes, average_by_node, deduplicate};
pub use artifacts::{ArtifactWriter, ManifestEntry, RunManifest};
pub use config::{DatasetSpec, PipelineConfig, RunConfig, default_datasets};
pub use error::{ConfigError, DatasetError, PipelineError};
pub use group::{NanPolicy, Reducer, group_reduce};
pub use loader::{CsvLoader, RecordLoader};
pub use metrics::{NodeAggregate, cabinet_of, derive_nodes, input_power, node_temp_mean};
pub use pipeline::{DatasetOutcome, DatasetReport, process_all, process_dataset, process_samples};
pub use rollup::{CabinetAggregate, SystemPowerSeries, cabinet_rollup, system_power_series};
pub use sample::{Readings, TelemetrySample, Timestamp};
pub use schema::{INPUT_POWER_FIELDS, SENSOR_COUNT, SensorField, TEMPERATURE_FIELDS};
pub use spectral::{SpectralConfig, SpectralResult, analyze};
pub use summary::{PowerSummary, strongest_bins};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
