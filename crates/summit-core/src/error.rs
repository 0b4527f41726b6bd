//! Error taxonomy for the telemetry pipeline.

use thiserror::Error;

/// A failure while loading or processing one dataset.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required column is absent from the snapshot.
    #[error("required column `{field}` is missing")]
    MissingField { field: String },

    /// A cell could not be parsed as the column's type.
    #[error("row {row}: column `{column}` has unparsable value {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// The dataset has no rows to aggregate.
    #[error("dataset contains no telemetry rows")]
    InsufficientData,

    /// Spectral analysis needs at least two samples.
    #[error("system power series has {len} sample(s); spectral analysis needs at least 2")]
    ShortSeries { len: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A [`PipelineError`] tagged with the dataset it came from.
#[derive(Debug, Error)]
#[error("dataset `{dataset}`: {source}")]
pub struct DatasetError {
    pub dataset: String,
    #[source]
    pub source: PipelineError,
}

impl DatasetError {
    pub fn new(dataset: impl Into<String>, source: PipelineError) -> Self {
        Self {
            dataset: dataset.into(),
            source,
        }
    }

    /// Data-quality failures come from the snapshot itself rather than the
    /// environment; rerunning will not change them.
    pub fn is_data_quality(&self) -> bool {
        matches!(
            self.source,
            PipelineError::MissingField { .. }
                | PipelineError::InvalidValue { .. }
                | PipelineError::InsufficientData
                | PipelineError::ShortSeries { .. }
        )
    }
}

/// Failure reading or interpreting run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A `LABEL=PATH` dataset argument without the separator or with an empty side.
    #[error("invalid dataset spec {0:?}; expected LABEL=PATH")]
    DatasetSpec(String),

    #[error("unknown NaN policy {0:?}; expected `propagate` or `skip`")]
    NanPolicy(String),

    #[error("sampling interval must be positive, got {0}")]
    SamplingInterval(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_error_names_dataset() {
        let err = DatasetError::new(
            "Jan 20, 2020",
            PipelineError::MissingField {
                field: "ps0_input_power".into(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("Jan 20, 2020"));
        assert!(msg.contains("ps0_input_power"));
        assert!(err.is_data_quality());
    }

    #[test]
    fn io_failures_are_not_data_quality() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DatasetError::new("d", PipelineError::from(io));
        assert!(!err.is_data_quality());
    }
}
