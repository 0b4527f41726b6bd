//! CLI for summit: node power telemetry in the time and frequency domains.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "summit")]
#[command(about = "summit: node power and temperature telemetry, cleaned and turned into spectra")]
#[command(version = summit_core::VERSION)]
struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every configured snapshot and write per-dataset artifacts
    Run {
        /// JSON run configuration (datasets, pipeline settings, output dir)
        #[arg(long)]
        config: Option<String>,

        /// Snapshot as LABEL=PATH (repeatable). Replaces the configured datasets.
        #[arg(long = "dataset")]
        datasets: Vec<String>,

        /// Artifact output directory (default: ./artifacts/)
        #[arg(long)]
        output: Option<String>,

        /// Missing-value handling for means: propagate (default) or skip
        #[arg(long, value_parser = ["propagate", "skip"])]
        nan_policy: Option<String>,

        /// Process datasets in parallel
        #[arg(long)]
        parallel: bool,

        /// Print the run summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the sensor columns a snapshot must carry
    Fields {
        /// Only the temperature sensors averaged into node_temp_mean
        #[arg(long)]
        temperature_only: bool,
    },

    /// Show the strongest spectral bins of one snapshot's system power
    Spectrum {
        /// Snapshot as LABEL=PATH
        #[arg(long)]
        dataset: String,

        /// Number of bins to show
        #[arg(long, default_value = "10")]
        top: usize,

        /// Missing-value handling for means: propagate (default) or skip
        #[arg(long, default_value = "propagate", value_parser = ["propagate", "skip"])]
        nan_policy: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            datasets,
            output,
            nan_policy,
            parallel,
            json,
        } => commands::run::run(commands::run::RunCommandConfig {
            config_path: config.as_deref(),
            datasets: &datasets,
            output_dir: output.as_deref(),
            nan_policy: nan_policy.as_deref(),
            parallel,
            json,
        }),
        Commands::Fields { temperature_only } => commands::fields::run(temperature_only),
        Commands::Spectrum {
            dataset,
            top,
            nan_policy,
        } => commands::spectrum::run(&dataset, top, &nan_policy),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .init();
}
