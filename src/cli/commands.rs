//! CLI command handlers.
//!
//! Each handler returns an `ExitCode`; errors are printed to stderr.

use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};

use crate::config::ScenarioConfig;
use crate::error::SynthResult;
use crate::generate::SyntheticDataset;
use crate::output::read_soc_tables;
use crate::validate::{pool_consistency_check, sanity_check_soc_timeseries, summarize_consistency};

use super::args::ConfigSource;
use super::output::{print_help, print_validation_report, print_verify_result, print_version, print_written};
use super::{Args, Command};

/// Largest pool-sum deviation `validate` accepts (t C/ha).
pub const CONSISTENCY_TOLERANCE: f64 = 1e-9;

/// Main CLI entry point.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Generate { out_dir, source } => generate(&out_dir, &source),
        Command::Validate { dir } => validate_dir(&dir),
        Command::Verify { runs, source } => verify(runs, &source),
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Resolve the scenario configuration for a command.
///
/// # Errors
///
/// Returns error if the YAML file cannot be loaded or the result is invalid.
pub fn load_config(source: &ConfigSource) -> SynthResult<ScenarioConfig> {
    let mut config = match &source.config_path {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = source.seed_override {
        config.seed = seed;
    }
    config.check()?;
    Ok(config)
}

/// Generate the dataset and write it to `out_dir`.
#[must_use]
pub fn generate(out_dir: &Path, source: &ConfigSource) -> ExitCode {
    let result = load_config(source).and_then(|config| {
        let dataset = SyntheticDataset::generate(&config);
        dataset.write_to_dir(out_dir)
    });

    match result {
        Ok(paths) => {
            print_written(&paths);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "generation failed");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Run both consistency checks over the tables in `dir`.
#[must_use]
pub fn validate_dir(dir: &Path) -> ExitCode {
    let result = read_soc_tables(dir).and_then(|(timeseries, pools)| {
        let sanity = sanity_check_soc_timeseries(&timeseries)?;
        let rows = pool_consistency_check(&pools, &timeseries)?;
        Ok((sanity, rows))
    });

    match result {
        Ok((sanity, rows)) => {
            let summary = summarize_consistency(&rows);
            print_validation_report(dir, &sanity, &summary);
            let passed = summary.is_consistent(CONSISTENCY_TOLERANCE) && !sanity.has_negative_soc;
            info!(dir = %dir.display(), passed, "validated tables");
            if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!(error = %e, "validation failed");
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Regenerate `runs` times and compare the CSV renders.
#[must_use]
pub fn verify(runs: usize, source: &ConfigSource) -> ExitCode {
    let config = match load_config(source) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let identical = verify_reproducibility(&config, runs);
    print_verify_result(config.seed, runs, identical);
    if identical {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Whether `runs` independent generations render identical tables.
#[must_use]
pub fn verify_reproducibility(config: &ScenarioConfig, runs: usize) -> bool {
    let reference = SyntheticDataset::generate(config).to_csv_strings();
    (1..runs).all(|_| SyntheticDataset::generate(config).to_csv_strings() == reference)
}
