//! `summit spectrum`: strongest PSD bins of one snapshot.

use summit_core::{CsvLoader, DatasetSpec, PipelineConfig, process_dataset, strongest_bins};

use super::format_watts;

pub fn run(dataset: &str, top: usize, nan_policy: &str) {
    let dataset = match DatasetSpec::parse(dataset) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let config = PipelineConfig {
        nan_policy: super::parse_nan_policy(nan_policy),
        ..PipelineConfig::default()
    };

    let report = match process_dataset(&CsvLoader::default(), &dataset, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let s = &report.summary;
    println!("{}: {} minutes of system power", report.label, s.samples);
    println!(
        "  mean {}  min {}  max {}  mean |dP| {}",
        format_watts(s.mean_power),
        format_watts(s.min_power),
        format_watts(s.max_power),
        format_watts(s.mean_fluctuation),
    );
    match s.dominant_frequency {
        Some(f) => println!("  dominant frequency {f:.2} cycles/day (period {:.1} min)", 1440.0 / f),
        None => println!("  flat spectrum: no dominant frequency"),
    }
    println!();

    let bins = strongest_bins(&report.spectral, top);
    if bins.is_empty() {
        println!("No spectral bins (series too short).");
        return;
    }
    println!("{:>4} {:>14} {:>14} {:>16}", "#", "cycles/day", "period (min)", "PSD");
    println!("{}", "-".repeat(51));
    for (rank, (freq, density)) in bins.iter().enumerate() {
        println!(
            "{:>4} {:>14.3} {:>14.1} {:>16.4e}",
            rank + 1,
            freq,
            1440.0 / freq,
            density
        );
    }
}
