//! soc-synth CLI
//!
//! Generates the synthetic SOC tables, or validates previously written ones.

use std::process::ExitCode;

use soc_synth::cli::{run_cli, Args};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // stdout carries the confirmation lines; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    run_cli(Args::parse())
}
