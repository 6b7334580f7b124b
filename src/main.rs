//! # renaflow CLI
//!
//! Command-line front end for the perfusion batch analysis library.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a demo batch of synthetic run files
//! renaflow demo demo_runs --runs 12
//!
//! # Scan the inputs for unreadable files
//! renaflow scan demo_runs
//!
//! # Run the batch and write the HTML report
//! renaflow report demo_runs -o perfusion_report.html
//!
//! # Inspect a single run file
//! renaflow info demo_runs/run_004.txt
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::init_logging(args.verbosity());
    cli::dispatch(args)
}
