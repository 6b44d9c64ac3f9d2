//! Synthetic dataset generation.
//!
//! Data flows strictly forward: config → timeseries → pools. The
//! sensitivity table is independent and only joins the others at output
//! time.

pub mod pools;
pub mod sensitivity;
pub mod timeseries;

pub use pools::{generate_soc_pools, SocPoolRow};
pub use sensitivity::{generate_sensitivity_results, SensitivityRow};
pub use timeseries::{generate_soc_timeseries, SocTimeseriesRow};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ScenarioConfig;
use crate::error::SynthResult;
use crate::output::{self, CsvTables};

/// Management scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Business-as-usual trajectory.
    Baseline,
    /// Trajectory under the changed management practice.
    Project,
}

impl Scenario {
    /// Label used in tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseline" => Ok(Self::Baseline),
            "project" => Ok(Self::Project),
            other => Err(format!("unknown scenario '{other}'")),
        }
    }
}

/// RothC-style SOC pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pool {
    /// Decomposable plant material.
    Dpm,
    /// Resistant plant material.
    Rpm,
    /// Microbial biomass.
    Bio,
    /// Humified organic matter.
    Hum,
    /// Inert organic matter.
    Iom,
}

impl Pool {
    /// All pools in table order.
    pub const ALL: [Self; 5] = [Self::Dpm, Self::Rpm, Self::Bio, Self::Hum, Self::Iom];

    /// Label used in tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dpm => "DPM",
            Self::Rpm => "RPM",
            Self::Bio => "BIO",
            Self::Hum => "HUM",
            Self::Iom => "IOM",
        }
    }

    /// Share of total SOC before jitter.
    #[must_use]
    pub const fn base_fraction(self) -> f64 {
        match self {
            Self::Dpm => 0.03,
            Self::Rpm => 0.20,
            Self::Bio => 0.04,
            Self::Hum => 0.55,
            Self::Iom => 0.18,
        }
    }

    /// Position in [`Pool::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three generated tables of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticDataset {
    /// Timeseries rows, baseline block then project block.
    pub timeseries: Vec<SocTimeseriesRow>,
    /// Five pool rows per timeseries row.
    pub pools: Vec<SocPoolRow>,
    /// Sensitivity table ordered by rank.
    pub sensitivity: Vec<SensitivityRow>,
}

impl SyntheticDataset {
    /// Run the full generation pipeline for `cfg`.
    #[must_use]
    pub fn generate(cfg: &ScenarioConfig) -> Self {
        let timeseries = generate_soc_timeseries(cfg);
        let pools = generate_soc_pools(cfg, &timeseries);
        let sensitivity = generate_sensitivity_results();

        info!(
            seed = cfg.seed,
            start_year = cfg.start_year,
            end_year = cfg.end_year,
            climate_regime = %cfg.climate_regime,
            timeseries_rows = timeseries.len(),
            pool_rows = pools.len(),
            "generated synthetic dataset"
        );

        Self {
            timeseries,
            pools,
            sensitivity,
        }
    }

    /// Render all three tables as CSV text.
    #[must_use]
    pub fn to_csv_strings(&self) -> CsvTables {
        CsvTables {
            timeseries: output::timeseries_csv(&self.timeseries),
            pools: output::pools_csv(&self.pools),
            sensitivity: output::sensitivity_csv(&self.sensitivity),
        }
    }

    /// Write the three CSV files into `dir`, creating it if needed.
    ///
    /// Returns the written paths in timeseries, pools, sensitivity order.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or any file cannot be written.
    pub fn write_to_dir(&self, dir: &Path) -> SynthResult<[PathBuf; 3]> {
        output::write_dataset(self, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_labels() {
        assert_eq!(Scenario::Baseline.to_string(), "baseline");
        assert_eq!("project".parse::<Scenario>(), Ok(Scenario::Project));
        assert!("managed".parse::<Scenario>().is_err());
        assert!(Scenario::Baseline < Scenario::Project);
    }

    #[test]
    fn test_pool_order_and_base_fractions() {
        let labels: Vec<&str> = Pool::ALL.iter().map(|p| p.as_str()).collect();
        assert_eq!(labels, vec!["DPM", "RPM", "BIO", "HUM", "IOM"]);
        for (i, p) in Pool::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
        let sum: f64 = Pool::ALL.iter().map(|p| p.base_fraction()).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dataset_shapes() {
        let ds = SyntheticDataset::generate(&ScenarioConfig::default());
        assert_eq!(ds.timeseries.len(), 50);
        assert_eq!(ds.pools.len(), 250);
        assert_eq!(ds.sensitivity.len(), 5);
    }

    #[test]
    fn test_dataset_deterministic() {
        let cfg = ScenarioConfig::default();
        let a = SyntheticDataset::generate(&cfg).to_csv_strings();
        let b = SyntheticDataset::generate(&cfg).to_csv_strings();
        assert_eq!(a, b);
    }
}
