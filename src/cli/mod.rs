use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod info;
mod report;
mod scan;

pub use config::Config;

/// renaflow - Machine-Perfusion Batch Analysis
#[derive(Parser)]
#[command(name = "renaflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the batch over a directory of export files and write the report
    Report(ReportArgs),

    /// Generate synthetic demo run files for testing
    Demo {
        /// Directory the run files are written into
        #[arg(value_name = "OUTPUT_DIR", default_value = "demo_runs")]
        output_dir: PathBuf,

        /// Number of runs to generate
        #[arg(short, long, default_value = "12")]
        runs: usize,

        /// Seed for the deterministic generator
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Display the parsed records of a single export file
    Info {
        /// Input export file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Smoothing window for the process stage, in samples
        #[arg(short, long, default_value = "9")]
        window: usize,

        /// Ice-classification threshold in °C
        #[arg(short = 't', long, default_value = "4.0")]
        ice_threshold: f64,
    },

    /// Check every input file against the read stage
    Scan {
        /// Input directory of export files
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Scan only the first N files
        #[arg(short, long)]
        max_files: Option<usize>,
    },
}

/// Arguments for the report subcommand
#[derive(Args)]
pub struct ReportArgs {
    /// Input directory of export files
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output HTML report path
    #[arg(short, long, default_value = "perfusion_report.html")]
    pub output: PathBuf,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Process only the first N discovered files
    #[arg(short, long)]
    pub max_files: Option<usize>,

    /// Smoothing window for the process stage, in samples
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Ice-classification threshold in °C
    #[arg(short = 't', long)]
    pub ice_threshold: Option<f64>,

    /// Record per-file failures and continue instead of aborting the batch
    #[arg(long)]
    pub keep_going: bool,

    /// Zero-based run whose time series is plotted
    #[arg(long)]
    pub series_index: Option<usize>,

    /// Samples of the selected series to plot
    #[arg(long)]
    pub series_window: Option<usize>,

    /// Also export devices/organs/summaries CSV tables into this directory
    #[arg(long, value_name = "DIR")]
    pub export_tables: Option<PathBuf>,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Report(args) => report::run(args),
        Commands::Demo {
            output_dir,
            runs,
            seed,
        } => demo::run(output_dir, runs, seed),
        Commands::Info {
            file,
            window,
            ice_threshold,
        } => info::run(file, window, ice_threshold),
        Commands::Scan {
            input_dir,
            max_files,
        } => scan::run(input_dir, max_files),
    }
}
