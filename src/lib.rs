//! # soc-synth
//!
//! Synthetic soil organic carbon (SOC) datasets for reviewing model output
//! when real measurements are unavailable or restricted.
//!
//! The pipeline produces three tables:
//! - a yearly SOC trajectory for a baseline and a project scenario
//! - a RothC-style allocation of each total into DPM, RPM, BIO, HUM, IOM
//! - a fixed, normalized parameter sensitivity ranking
//!
//! Generation is deterministic for a given seed. The `validate` module
//! checks written tables against each other.
//!
//! ## Example
//!
//! ```rust
//! use soc_synth::prelude::*;
//!
//! let config = ScenarioConfig::builder().seed(42).years(2000, 2010).build();
//! let dataset = SyntheticDataset::generate(&config);
//! assert_eq!(dataset.timeseries.len(), 20);
//! assert_eq!(dataset.pools.len(), 100);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_const_for_fn,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod rng;
pub mod table;
pub mod validate;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ScenarioConfig, ScenarioConfigBuilder, SocRange};
    pub use crate::error::{SynthError, SynthResult};
    pub use crate::generate::{
        generate_sensitivity_results, generate_soc_pools, generate_soc_timeseries, Pool,
        Scenario, SensitivityRow, SocPoolRow, SocTimeseriesRow, SyntheticDataset,
    };
    pub use crate::rng::SocRng;
    pub use crate::table::Table;
    pub use crate::validate::{
        pool_consistency_check, sanity_check_soc_timeseries, summarize_consistency,
        ConsistencyRow, ConsistencySummary, TimeseriesSanity,
    };
}
