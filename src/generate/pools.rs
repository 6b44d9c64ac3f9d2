//! RothC-like pool allocation of each total SOC value.
//!
//! Fractions start from fixed base shares, get a small jitter, and are
//! renormalized so the five pools of one (scenario, year) always sum to the
//! total. After the management change the project scenario shifts a little
//! material from the plant pools into HUM.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::timeseries::SocTimeseriesRow;
use super::{Pool, Scenario};
use crate::config::ScenarioConfig;
use crate::rng::SocRng;

/// Smallest share any pool may hold before normalization.
pub const MIN_FRACTION: f64 = 0.001;

/// Std of the per-pool jitter applied to base fractions.
pub const JITTER_SIGMA: f64 = 0.01;

/// HUM gain after the management change (project only).
pub const HUM_SHIFT: f64 = 0.01;

/// RPM and DPM loss each after the management change (project only).
pub const PLANT_SHIFT: f64 = 0.005;

/// One pool of one (scenario, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocPoolRow {
    /// Calendar year.
    pub year: i32,
    /// Scenario.
    pub scenario: Scenario,
    /// Pool.
    pub pool: Pool,
    /// Normalized share of the total, in (0, 1].
    pub fraction: f64,
    /// `fraction × total_soc` (t C/ha).
    pub soc: f64,
    /// Sum of all five pool values for this (scenario, year).
    pub pools_sum: f64,
}

/// Allocate pools for every timeseries row, in the order given.
///
/// The random stream is seeded from `cfg.seed + 1` and consumed five draws
/// per row, so row order determines the output.
#[must_use]
pub fn generate_soc_pools(cfg: &ScenarioConfig, timeseries: &[SocTimeseriesRow]) -> Vec<SocPoolRow> {
    let mut rng = SocRng::new(cfg.pool_seed());
    let mut rows = Vec::with_capacity(timeseries.len() * Pool::ALL.len());

    for ts in timeseries {
        let shifted =
            ts.scenario == Scenario::Project && ts.year >= ts.management_change_year;
        let fractions = allocate_fractions(&mut rng, shifted);

        for (pool, fraction) in Pool::ALL.into_iter().zip(fractions) {
            rows.push(SocPoolRow {
                year: ts.year,
                scenario: ts.scenario,
                pool,
                fraction,
                soc: ts.total_soc * fraction,
                pools_sum: 0.0,
            });
        }
    }

    let mut sums: BTreeMap<(Scenario, i32), f64> = BTreeMap::new();
    for row in &rows {
        *sums.entry((row.scenario, row.year)).or_insert(0.0) += row.soc;
    }
    for row in &mut rows {
        row.pools_sum = sums[&(row.scenario, row.year)];
    }

    debug!(
        seed = cfg.pool_seed(),
        rows = rows.len(),
        groups = sums.len(),
        "allocated soc pools"
    );
    rows
}

/// Draw one set of normalized fractions in [`Pool::ALL`] order.
fn allocate_fractions(rng: &mut SocRng, shifted: bool) -> [f64; 5] {
    let jitter = Pool::ALL.map(|_| rng.gen_normal(0.0, JITTER_SIGMA));
    normalize(jittered_fractions(jitter, shifted))
}

/// Base shares plus `jitter`, clipped at [`MIN_FRACTION`], with the project
/// shift applied and clipped again. Not yet normalized.
fn jittered_fractions(jitter: [f64; 5], shifted: bool) -> [f64; 5] {
    let mut fractions = Pool::ALL.map(Pool::base_fraction);
    for (f, j) in fractions.iter_mut().zip(jitter) {
        *f = (*f + j).max(MIN_FRACTION);
    }

    if shifted {
        fractions[Pool::Hum.index()] += HUM_SHIFT;
        fractions[Pool::Rpm.index()] -= PLANT_SHIFT;
        fractions[Pool::Dpm.index()] -= PLANT_SHIFT;
        for f in &mut fractions {
            *f = f.max(MIN_FRACTION);
        }
    }

    fractions
}

fn normalize(fractions: [f64; 5]) -> [f64; 5] {
    let total: f64 = fractions.iter().sum();
    fractions.map(|f| f / total)
}
