//! CLI output formatting.

use std::path::{Path, PathBuf};

use crate::validate::{ConsistencySummary, TimeseriesSanity, EXTREME_DELTA_THRESHOLD};

/// Print version information.
pub fn print_version() {
    println!("soc-synth {}", env!("CARGO_PKG_VERSION"));
    if let Some(hash) = option_env!("SOC_SYNTH_GIT_HASH") {
        println!("commit {hash}");
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"soc-synth - Synthetic soil organic carbon datasets

USAGE:
    soc-synth [COMMAND] [OPTIONS]

COMMANDS:
    generate                    Write soc_timeseries.csv, soc_pools.csv and
                                sensitivity_results.csv (default command)
        -o, --out <DIR>         Output directory (default: data/synthetic)
        -c, --config <FILE>     Scenario YAML; unset fields keep defaults
        --seed <N>              Override the scenario seed

    validate                    Check written tables for consistency
        -d, --dir <DIR>         Directory to read (default: data/synthetic)

    verify                      Regenerate and compare outputs byte for byte
        --runs <N>              Number of runs, at least 2 (default: 3)
        -c, --config <FILE>     Scenario YAML
        --seed <N>              Override the scenario seed

    help                        Show this help message
    version                     Show version information

Set RUST_LOG=debug for generation details on stderr.
"
    );
}

/// Print the confirmation line for each written file.
pub fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", written_line(path));
    }
}

/// Confirmation line for one written file.
#[must_use]
pub fn written_line(path: &Path) -> String {
    format!("[OK] Wrote: {}", path.display())
}

/// Print the sanity report and consistency summary.
pub fn print_validation_report(dir: &Path, sanity: &TimeseriesSanity, summary: &ConsistencySummary) {
    for line in validation_report_lines(dir, sanity, summary) {
        println!("{line}");
    }
}

/// Lines printed by [`print_validation_report`].
#[must_use]
pub fn validation_report_lines(
    dir: &Path,
    sanity: &TimeseriesSanity,
    summary: &ConsistencySummary,
) -> Vec<String> {
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |x| format!("{x:.6}"));
    vec![
        format!("Validating: {}", dir.display()),
        "Timeseries sanity:".to_string(),
        format!("  min_soc:              {}", fmt(sanity.min_soc)),
        format!("  max_soc:              {}", fmt(sanity.max_soc)),
        format!("  has_negative_soc:     {}", sanity.has_negative_soc),
        format!(
            "  extreme_delta_count:  {} (|delta| > {EXTREME_DELTA_THRESHOLD})",
            sanity.extreme_delta_count
        ),
        "Pool consistency:".to_string(),
        format!("  groups:               {}", summary.groups),
        format!("  unmatched_groups:     {}", summary.unmatched_groups),
        format!("  undefined_abs_diff:   {}", summary.undefined_abs_diff),
        format!("  undefined_rel_diff:   {}", summary.undefined_rel_diff),
        format!(
            "  max_abs_diff:         {}",
            summary.max_abs_diff.map_or_else(|| "n/a".to_string(), |x| format!("{x:.3e}"))
        ),
        format!(
            "  max_rel_diff:         {}",
            summary.max_rel_diff.map_or_else(|| "n/a".to_string(), |x| format!("{x:.3e}"))
        ),
    ]
}

/// Print the outcome of a reproducibility check.
pub fn print_verify_result(seed: u64, runs: usize, identical: bool) {
    let sym = if identical { "✓" } else { "✗" };
    println!("Seed: {seed}");
    println!("Runs: {runs}");
    println!("{sym} Identical outputs: {identical}");
}
