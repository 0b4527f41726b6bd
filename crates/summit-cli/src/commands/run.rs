//! `summit run`: process snapshots and write artifacts.

use std::path::{Path, PathBuf};

use log::info;
use summit_core::{
    ArtifactWriter, CsvLoader, DatasetOutcome, DatasetSpec, RunConfig, process_all,
};

use super::format_watts;

pub struct RunCommandConfig<'a> {
    pub config_path: Option<&'a str>,
    pub datasets: &'a [String],
    pub output_dir: Option<&'a str>,
    pub nan_policy: Option<&'a str>,
    pub parallel: bool,
    pub json: bool,
}

pub fn run(cfg: RunCommandConfig<'_>) {
    let config = match build_config(&cfg) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    info!(
        "processing {} dataset(s), nan policy {}{}",
        config.datasets.len(),
        config.pipeline.nan_policy,
        if config.pipeline.parallel { ", parallel" } else { "" }
    );
    let outcomes = process_all(&CsvLoader::default(), &config.datasets, &config.pipeline);

    let run_dir = match ArtifactWriter::new(&config.output_dir, config.pipeline)
        .and_then(|writer| writer.finish(&outcomes))
    {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to write artifacts under {}: {e}", config.output_dir.display());
            std::process::exit(1);
        }
    };

    if cfg.json {
        print_json(&outcomes, &run_dir);
    } else {
        print_table(&outcomes, &run_dir);
    }

    if !outcomes.is_empty() && outcomes.iter().all(|o| !o.is_ok()) {
        std::process::exit(1);
    }
}

/// Merge the optional config file with command-line overrides.
fn build_config(cfg: &RunCommandConfig<'_>) -> Result<RunConfig, String> {
    let mut config = match cfg.config_path {
        Some(path) => RunConfig::load(Path::new(path)).map_err(|e| e.to_string())?,
        None => RunConfig::default(),
    };
    if !cfg.datasets.is_empty() {
        config.datasets = cfg
            .datasets
            .iter()
            .map(|arg| DatasetSpec::parse(arg))
            .collect::<Result<_, _>>()
            .map_err(|e| e.to_string())?;
    }
    if let Some(dir) = cfg.output_dir {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(policy) = cfg.nan_policy {
        config.pipeline.nan_policy = super::parse_nan_policy(policy);
    }
    if cfg.parallel {
        config.pipeline.parallel = true;
    }
    Ok(config)
}

fn print_table(outcomes: &[DatasetOutcome], run_dir: &Path) {
    println!();
    println!(
        "{:<16} {:>8} {:>6} {:>5} {:>6} {:>11} {:>11} {:>11}  Status",
        "Dataset", "Rows", "Nodes", "Cabs", "Mins", "Mean", "Peak-Peak", "Max |dP|"
    );
    println!("{}", "-".repeat(96));
    for outcome in outcomes {
        match &outcome.result {
            Ok(r) => println!(
                "{:<16} {:>8} {:>6} {:>5} {:>6} {:>11} {:>11} {:>11}  ok",
                r.label,
                r.raw_rows,
                r.node_count(),
                r.cabinet_count(),
                r.system_power.len(),
                format_watts(r.summary.mean_power),
                format_watts(r.summary.peak_to_peak),
                format_watts(r.summary.max_fluctuation),
            ),
            Err(e) => println!("{:<16} {:>66}  FAILED: {}", outcome.dataset.label, "", e.source),
        }
    }
    let ok = outcomes.iter().filter(|o| o.is_ok()).count();
    println!();
    println!("{ok}/{} datasets processed. Artifacts: {}", outcomes.len(), run_dir.display());
}

fn print_json(outcomes: &[DatasetOutcome], run_dir: &Path) {
    let datasets: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(r) => serde_json::json!({
                "label": r.label,
                "status": "ok",
                "raw_rows": r.raw_rows,
                "nodes": r.node_count(),
                "cabinets": r.cabinet_count(),
                "summary": r.summary,
            }),
            Err(e) => serde_json::json!({
                "label": o.dataset.label,
                "status": "failed",
                "error": e.source.to_string(),
                "data_quality": e.is_data_quality(),
            }),
        })
        .collect();
    let doc = serde_json::json!({
        "run_dir": run_dir.display().to_string(),
        "datasets": datasets,
    });
    match serde_json::to_string_pretty(&doc) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to serialize summary: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use summit_core::NanPolicy;

    fn cfg<'a>(datasets: &'a [String]) -> RunCommandConfig<'a> {
        RunCommandConfig {
            config_path: None,
            datasets,
            output_dir: None,
            nan_policy: None,
            parallel: false,
            json: false,
        }
    }

    #[test]
    fn defaults_to_reference_dates() {
        let config = build_config(&cfg(&[])).unwrap();
        assert_eq!(config.datasets.len(), 5);
        assert_eq!(config.output_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn overrides_apply() {
        let datasets = vec!["Jan 20, 2020=/data/a.csv".to_string(), "/data/b.csv".to_string()];
        let mut c = cfg(&datasets);
        c.output_dir = Some("out");
        c.nan_policy = Some("skip");
        c.parallel = true;
        let config = build_config(&c).unwrap();
        assert_eq!(config.datasets[0].label, "Jan 20, 2020");
        assert_eq!(config.datasets[1].label, "b");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.pipeline.nan_policy, NanPolicy::Skip);
        assert!(config.pipeline.parallel);
    }

    #[test]
    fn bad_dataset_argument_is_an_error() {
        let datasets = vec!["=x.csv".to_string()];
        assert!(build_config(&cfg(&datasets)).is_err());
    }
}
