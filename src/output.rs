//! CSV output of the generated tables.
//!
//! Floats are written with Rust's shortest round-trip formatting and
//! undefined values as empty cells, so a table read back parses to the
//! same numbers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{SynthError, SynthResult};
use crate::generate::{SensitivityRow, SocPoolRow, SocTimeseriesRow, SyntheticDataset};
use crate::table::{format_opt, Record, Table};

/// Timeseries file name.
pub const TIMESERIES_FILE: &str = "soc_timeseries.csv";
/// Pools file name.
pub const POOLS_FILE: &str = "soc_pools.csv";
/// Sensitivity file name.
pub const SENSITIVITY_FILE: &str = "sensitivity_results.csv";

/// Timeseries table name.
pub const TIMESERIES_TABLE: &str = "soc_timeseries";
/// Pools table name.
pub const POOLS_TABLE: &str = "soc_pools";
/// Sensitivity table name.
pub const SENSITIVITY_TABLE: &str = "sensitivity_results";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "data/synthetic";

impl Record for SocTimeseriesRow {
    const COLUMNS: &'static [&'static str] = &[
        "year",
        "scenario",
        "total_soc_tCha",
        "management_change_year",
        "delta_soc_tCha_per_yr",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.scenario.to_string(),
            self.total_soc.to_string(),
            self.management_change_year.to_string(),
            format_opt(self.delta_soc_per_yr),
        ]
    }
}

impl Record for SocPoolRow {
    const COLUMNS: &'static [&'static str] = &[
        "year",
        "scenario",
        "pool",
        "fraction",
        "soc_tCha",
        "pools_sum_tCha",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.scenario.to_string(),
            self.pool.to_string(),
            self.fraction.to_string(),
            self.soc.to_string(),
            self.pools_sum.to_string(),
        ]
    }
}

impl Record for SensitivityRow {
    const COLUMNS: &'static [&'static str] = &["parameter", "impact", "rank"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.parameter.clone(),
            self.impact.to_string(),
            self.rank.to_string(),
        ]
    }
}

/// In-memory CSV renders of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTables {
    /// `soc_timeseries.csv` contents.
    pub timeseries: String,
    /// `soc_pools.csv` contents.
    pub pools: String,
    /// `sensitivity_results.csv` contents.
    pub sensitivity: String,
}

/// Timeseries rows as a table.
#[must_use]
pub fn timeseries_table(rows: &[SocTimeseriesRow]) -> Table {
    Table::from_records(TIMESERIES_TABLE, rows)
}

/// Pool rows as a table.
#[must_use]
pub fn pools_table(rows: &[SocPoolRow]) -> Table {
    Table::from_records(POOLS_TABLE, rows)
}

/// Render timeseries rows as CSV.
#[must_use]
pub fn timeseries_csv(rows: &[SocTimeseriesRow]) -> String {
    timeseries_table(rows).to_csv()
}

/// Render pool rows as CSV.
#[must_use]
pub fn pools_csv(rows: &[SocPoolRow]) -> String {
    pools_table(rows).to_csv()
}

/// Render sensitivity rows as CSV.
#[must_use]
pub fn sensitivity_csv(rows: &[SensitivityRow]) -> String {
    Table::from_records(SENSITIVITY_TABLE, rows).to_csv()
}

/// Write `contents` to `path`.
///
/// # Errors
///
/// Returns error if the file cannot be created or written.
pub fn write_text(path: &Path, contents: &str) -> SynthResult<()> {
    let file = File::create(path)
        .map_err(|e| SynthError::io(format!("Failed to create {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .map_err(|e| SynthError::io(format!("Write failed: {e}")))?;
    writer
        .flush()
        .map_err(|e| SynthError::io(format!("Flush failed: {e}")))?;
    Ok(())
}

/// Write all three tables of `dataset` into `dir`.
///
/// # Errors
///
/// Returns error if the directory or any file cannot be written.
pub fn write_dataset(dataset: &SyntheticDataset, dir: &Path) -> SynthResult<[PathBuf; 3]> {
    std::fs::create_dir_all(dir)
        .map_err(|e| SynthError::io(format!("Failed to create {}: {e}", dir.display())))?;

    let tables = dataset.to_csv_strings();
    let paths = [
        dir.join(TIMESERIES_FILE),
        dir.join(POOLS_FILE),
        dir.join(SENSITIVITY_FILE),
    ];
    for (path, contents) in paths
        .iter()
        .zip([&tables.timeseries, &tables.pools, &tables.sensitivity])
    {
        write_text(path, contents)?;
        info!(path = %path.display(), bytes = contents.len(), "wrote table");
    }
    Ok(paths)
}

/// Read `soc_timeseries.csv` and `soc_pools.csv` from `dir`.
///
/// # Errors
///
/// Returns error if either file is missing or malformed.
pub fn read_soc_tables(dir: &Path) -> SynthResult<(Table, Table)> {
    let timeseries = Table::read_csv(TIMESERIES_TABLE, &dir.join(TIMESERIES_FILE))?;
    let pools = Table::read_csv(POOLS_TABLE, &dir.join(POOLS_FILE))?;
    Ok((timeseries, pools))
}
