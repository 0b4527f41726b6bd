//! Snapshot loading.
//!
//! The pipeline only needs a source of [`TelemetrySample`] rows for a
//! dataset. [`CsvLoader`] reads header-addressed CSV exports; other formats
//! plug in by implementing [`RecordLoader`].

use std::io::Read;

use log::debug;

use crate::config::DatasetSpec;
use crate::error::PipelineError;
use crate::sample::{Readings, TelemetrySample, Timestamp};
use crate::schema::{HOSTNAME_COLUMN, SENSOR_COUNT, SensorField, TIMESTAMP_COLUMN};

/// Produces the raw rows of one dataset.
pub trait RecordLoader: Sync {
    fn load(&self, dataset: &DatasetSpec) -> Result<Vec<TelemetrySample>, PipelineError>;
}

/// Loads CSV snapshots with a header row naming every column.
#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    pub delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl RecordLoader for CsvLoader {
    fn load(&self, dataset: &DatasetSpec) -> Result<Vec<TelemetrySample>, PipelineError> {
        let file = std::fs::File::open(&dataset.path)?;
        let samples = self.read(file)?;
        debug!(
            "loaded {} rows from {}",
            samples.len(),
            dataset.path.display()
        );
        Ok(samples)
    }
}

/// Column positions resolved from the header row.
struct ColumnMap {
    timestamp: usize,
    hostname: usize,
    sensors: [usize; SENSOR_COUNT],
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, PipelineError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| PipelineError::MissingField {
                    field: name.to_string(),
                })
        };
        let mut sensors = [0usize; SENSOR_COUNT];
        for field in SensorField::ALL {
            sensors[field.index()] = find(field.name())?;
        }
        Ok(Self {
            timestamp: find(TIMESTAMP_COLUMN)?,
            hostname: find(HOSTNAME_COLUMN)?,
            sensors,
        })
    }
}

impl CsvLoader {
    /// Parse CSV from any reader.
    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<TelemetrySample>, PipelineError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(reader);
        let columns = ColumnMap::resolve(rdr.headers()?)?;

        let mut samples = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            // header is line 1
            let row = i + 2;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            let raw_ts = cell(columns.timestamp);
            let timestamp = Timestamp::parse(raw_ts).ok_or_else(|| PipelineError::InvalidValue {
                row,
                column: TIMESTAMP_COLUMN.to_string(),
                value: raw_ts.to_string(),
            })?;
            let hostname = cell(columns.hostname).trim();
            if hostname.is_empty() {
                return Err(PipelineError::InvalidValue {
                    row,
                    column: HOSTNAME_COLUMN.to_string(),
                    value: String::new(),
                });
            }

            let mut readings = Readings::missing();
            for field in SensorField::ALL {
                let raw = cell(columns.sensors[field.index()]);
                let value = parse_reading(raw).ok_or_else(|| PipelineError::InvalidValue {
                    row,
                    column: field.name().to_string(),
                    value: raw.to_string(),
                })?;
                readings.set(field, value);
            }
            samples.push(TelemetrySample::new(timestamp, hostname, readings));
        }
        Ok(samples)
    }
}

/// Empty cells and `nan` spellings are missing readings.
fn parse_reading(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null") {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        let mut cols = vec!["timestamp".to_string(), "hostname".to_string()];
        cols.extend(SensorField::ALL.iter().map(|f| f.name().to_string()));
        cols.join(",")
    }

    fn row(ts: &str, host: &str, value: &str) -> String {
        let mut cells = vec![ts.to_string(), host.to_string()];
        cells.extend(std::iter::repeat_n(value.to_string(), SENSOR_COUNT));
        cells.join(",")
    }

    #[test]
    fn reads_rows_by_header_name() {
        let csv = format!(
            "{}\n{}\n{}\n",
            header(),
            row("2020-01-20 00:00:00", "a01n01", "12.5"),
            row("1579478460", "a01n02", "7")
        );
        let samples = CsvLoader::default().read(csv.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].hostname, "a01n01");
        assert_eq!(samples[0].timestamp, Timestamp(1_579_478_400));
        assert_eq!(samples[0].readings.get(SensorField::Ps1InputPower), 12.5);
        assert_eq!(samples[1].readings.get(SensorField::P0Core23Temp), 7.0);
    }

    #[test]
    fn column_order_does_not_matter() {
        let mut cols: Vec<String> = SensorField::ALL.iter().map(|f| f.name().to_string()).collect();
        cols.reverse();
        cols.push("extra".into());
        cols.push("hostname".into());
        cols.push("timestamp".into());
        let mut cells: Vec<String> = (0..SENSOR_COUNT).map(|i| i.to_string()).collect();
        cells.push("ignored".into());
        cells.push("b03n09".into());
        cells.push("60".into());
        let csv = format!("{}\n{}\n", cols.join(","), cells.join(","));
        let samples = CsvLoader::default().read(csv.as_bytes()).unwrap();
        // reversed: the last sensor field holds 0
        assert_eq!(samples[0].readings.get(SensorField::Ps1InputPower), 0.0);
        assert_eq!(samples[0].readings.get(SensorField::P0Gpu0Power), (SENSOR_COUNT - 1) as f64);
        assert_eq!(samples[0].timestamp, Timestamp(60));
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = header().replace(",ps0_input_power", "") + "\n";
        let err = CsvLoader::default().read(csv.as_bytes()).unwrap_err();
        match err {
            PipelineError::MissingField { field } => assert_eq!(field, "ps0_input_power"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_and_nan_cells_are_missing() {
        let csv = format!("{}\n{}\n", header(), row("60", "a01n01", ""));
        let samples = CsvLoader::default().read(csv.as_bytes()).unwrap();
        assert!(samples[0].readings.get(SensorField::Gpu0CoreTemp).is_nan());
        assert_eq!(parse_reading("NaN").map(f64::is_nan), Some(true));
    }

    #[test]
    fn garbage_cell_is_invalid_value() {
        let csv = format!("{}\n{}\n", header(), row("60", "a01n01", "hot"));
        let err = CsvLoader::default().read(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidValue { row: 2, .. }));
    }

    #[test]
    fn bad_timestamp_is_invalid_value() {
        let csv = format!("{}\n{}\n", header(), row("noon", "a01n01", "1"));
        let err = CsvLoader::default().read(csv.as_bytes()).unwrap_err();
        match err {
            PipelineError::InvalidValue { column, value, .. } => {
                assert_eq!(column, "timestamp");
                assert_eq!(value, "noon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let csv = format!("{}\n", header());
        assert!(CsvLoader::default().read(csv.as_bytes()).unwrap().is_empty());
    }
}
