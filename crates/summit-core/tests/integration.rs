//! Integration tests for summit-core.
//!
//! These tests exercise the full pipeline:
//! CSV snapshot → dedup/aggregate → node and cabinet tables → system series →
//! spectra → artifacts.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use summit_core::{
    ArtifactWriter, CsvLoader, DatasetSpec, NanPolicy, PipelineConfig, PipelineError, Readings,
    SensorField, TelemetrySample, Timestamp, aggregate_nodes, derive_nodes, process_all,
    process_samples,
};

/// A node row with uniform temperatures and `input_power` split evenly over
/// both rails.
fn node_sample(minute: i64, host: &str, input_power: f64, temp: f64) -> TelemetrySample {
    TelemetrySample::new(
        Timestamp(1_579_478_400 + minute * 60),
        host,
        Readings::filled(temp)
            .with(SensorField::Ps0InputPower, input_power / 2.0)
            .with(SensorField::Ps1InputPower, input_power / 2.0),
    )
}

fn write_csv(path: &Path, rows: &[TelemetrySample]) {
    let mut out = String::from("timestamp,hostname");
    for field in SensorField::ALL {
        write!(out, ",{}", field.name()).unwrap();
    }
    out.push('\n');
    for row in rows {
        write!(out, "{},{}", row.timestamp.to_rfc3339(), row.hostname).unwrap();
        for field in SensorField::ALL {
            write!(out, ",{}", row.readings.get(field)).unwrap();
        }
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

#[test]
fn two_node_constant_scenario() {
    let mut rows = Vec::new();
    for minute in 0..3 {
        rows.push(node_sample(minute, "CAB1n01", 100.0, 30.0));
        rows.push(node_sample(minute, "CAB2n01", 150.0, 40.0));
    }
    let report =
        process_samples(&DatasetSpec::new("const", "-"), &rows, &PipelineConfig::default()).unwrap();

    assert_eq!(report.system_power.values(), &[250.0, 250.0, 250.0]);
    assert_eq!(report.spectral.magnitudes, vec![0.0, 0.0]);
    assert_eq!(report.spectral.gradient, vec![0.0, 0.0, 0.0]);
    assert!(report.spectral.psd.iter().all(|&p| p == 0.0));
    assert!(report.spectral.power_spectrum.iter().all(|&p| p == 0.0));

    let cabinets: Vec<_> = report.cabinets.iter().map(|c| c.cabinet.as_str()).collect();
    assert_eq!(cabinets, vec!["CAB", "CAB", "CAB"]);
    assert!(report.cabinets.iter().all(|c| c.input_power == 250.0 && c.node_count == 2));
}

#[test]
fn duplicate_rows_collapse_to_one() {
    let a = node_sample(0, "a01n01", 1500.0, 33.0);
    let nodes = aggregate_nodes(&[a.clone(), a.clone()], NanPolicy::Propagate);
    assert_eq!(nodes, vec![a]);
}

#[test]
fn differing_rows_average_each_field() {
    let mut a = node_sample(0, "a01n01", 1000.0, 30.0);
    let mut b = node_sample(0, "a01n01", 1200.0, 30.0);
    a.readings.set(SensorField::Gpu4CoreTemp, 10.0);
    b.readings.set(SensorField::Gpu4CoreTemp, 20.0);
    let cleaned = aggregate_nodes(&[a, b], NanPolicy::Propagate);
    assert_eq!(cleaned.len(), 1);
    assert_eq!(cleaned[0].readings.get(SensorField::Gpu4CoreTemp), 15.0);
    assert_eq!(cleaned[0].readings.get(SensorField::Ps0InputPower), 550.0);

    let nodes = derive_nodes(&cleaned, NanPolicy::Propagate);
    assert_eq!(nodes[0].input_power, 1100.0);
    // 57 sensors at 30, one at 15
    assert!((nodes[0].node_temp_mean - (57.0 * 30.0 + 15.0) / 58.0).abs() < 1e-12);
}

#[test]
fn cabinet_power_is_sum_of_its_nodes() {
    let mut rows = Vec::new();
    for minute in 0..5 {
        for (i, host) in ["a01n01", "a01n02", "a01n03", "b12n01", "b12n02"].iter().enumerate() {
            rows.push(node_sample(minute, host, 900.0 + (minute * 7 + i as i64 * 13) as f64, 30.0));
        }
    }
    let report =
        process_samples(&DatasetSpec::new("d", "-"), &rows, &PipelineConfig::default()).unwrap();
    for cab in &report.cabinets {
        let expected: f64 = report
            .nodes
            .iter()
            .filter(|n| n.timestamp == cab.timestamp && n.cabinet == cab.cabinet)
            .map(|n| n.input_power)
            .sum();
        assert!((cab.input_power - expected).abs() < 1e-9);
    }
    assert_eq!(report.cabinets.len(), 10);
    assert_eq!(report.system_power.len(), 5);
    assert!(report.system_power.timestamps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn csv_to_artifacts_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let good = tmp.path().join("20200120.csv");
    let empty = tmp.path().join("20200820.csv");
    let missing = tmp.path().join("20210220.csv");

    let mut rows = Vec::new();
    for minute in 0..30 {
        let swing = if minute % 2 == 0 { 50.0 } else { -50.0 };
        rows.push(node_sample(minute, "a01n01", 1000.0 + swing, 35.0));
        rows.push(node_sample(minute, "h22n05", 800.0, 28.0));
        // down-sampling artefact: an exact duplicate every minute
        rows.push(node_sample(minute, "h22n05", 800.0, 28.0));
    }
    write_csv(&good, &rows);
    write_csv(&empty, &[]);

    let datasets = vec![
        DatasetSpec::new("Jan 20, 2020", &good),
        DatasetSpec::new("Aug 20, 2020", &empty),
        DatasetSpec::new("Feb 20, 2021", &missing),
    ];
    let config = PipelineConfig::default();
    let outcomes = process_all(&CsvLoader::default(), &datasets, &config);
    assert_eq!(outcomes.len(), 3);

    let report = outcomes[0].result.as_ref().unwrap();
    assert_eq!(report.raw_rows, 90);
    assert_eq!(report.nodes.len(), 60);
    assert_eq!(report.system_power.len(), 30);
    assert_eq!(report.spectral.magnitudes.len(), 29);
    assert!(report.spectral.magnitudes.iter().all(|&m| (m - 100.0).abs() < 1e-9));
    // 29 fluctuations → PSD bins 1..14
    assert_eq!(report.spectral.psd.len(), 13);

    let empty_err = outcomes[1].result.as_ref().unwrap_err();
    assert_eq!(empty_err.dataset, "Aug 20, 2020");
    assert!(matches!(empty_err.source, PipelineError::InsufficientData));

    let missing_err = outcomes[2].result.as_ref().unwrap_err();
    assert!(matches!(missing_err.source, PipelineError::Io(_)));
    assert!(!missing_err.is_data_quality());

    let writer = ArtifactWriter::new(&tmp.path().join("out"), config).unwrap();
    let run_dir = writer.finish(&outcomes).unwrap();
    assert!(run_dir.join("Jan202020.json").is_file());
    assert!(run_dir.join("manifest.json").is_file());
    assert!(!run_dir.join("Aug202020.json").exists());
}

#[test]
fn parallel_run_matches_sequential() {
    let tmp = tempfile::tempdir().unwrap();
    let mut datasets = Vec::new();
    for d in 0..4 {
        let path = tmp.path().join(format!("d{d}.csv"));
        let rows: Vec<_> = (0..20)
            .flat_map(|minute| {
                let p = 1000.0 + ((minute * (d + 3)) % 11) as f64 * 10.0;
                vec![node_sample(minute, "c03n01", p, 31.0), node_sample(minute, "c04n01", p, 32.0)]
            })
            .collect();
        write_csv(&path, &rows);
        datasets.push(DatasetSpec::new(format!("d{d}"), path));
    }

    let sequential = process_all(&CsvLoader::default(), &datasets, &PipelineConfig::default());
    let parallel = process_all(
        &CsvLoader::default(),
        &datasets,
        &PipelineConfig {
            parallel: true,
            ..PipelineConfig::default()
        },
    );
    for (s, p) in sequential.iter().zip(&parallel) {
        assert_eq!(s.dataset, p.dataset);
        let (s, p) = (s.result.as_ref().unwrap(), p.result.as_ref().unwrap());
        assert_eq!(s.system_power, p.system_power);
        assert_eq!(s.spectral, p.spectral);
    }
}

#[test]
fn missing_column_fails_only_that_dataset() {
    let tmp = tempfile::tempdir().unwrap();
    let broken = tmp.path().join("broken.csv");
    fs::write(&broken, "timestamp,hostname,ps0_input_power\n60,a01n01,5\n").unwrap();
    let fine = tmp.path().join("fine.csv");
    write_csv(
        &fine,
        &[node_sample(0, "a01n01", 10.0, 20.0), node_sample(1, "a01n01", 12.0, 20.0)],
    );

    let outcomes = process_all(
        &CsvLoader::default(),
        &[DatasetSpec::new("broken", &broken), DatasetSpec::new("fine", &fine)],
        &PipelineConfig::default(),
    );
    let err = outcomes[0].result.as_ref().unwrap_err();
    assert!(matches!(err.source, PipelineError::MissingField { .. }));
    assert!(err.to_string().contains("broken"));
    assert!(outcomes[1].is_ok());
}
