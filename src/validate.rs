//! Consistency checks over generated tables.
//!
//! Both checks are pure: they read tables and return reports, never
//! mutating their inputs. They are invoked explicitly (see the `validate`
//! CLI command); generation does not run them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{SynthError, SynthResult};
use crate::generate::Scenario;
use crate::table::Table;

/// Year-over-year SOC change (t C/ha/yr) treated as implausible for arable
/// topsoil.
pub const EXTREME_DELTA_THRESHOLD: f64 = 2.0;

/// Columns the timeseries sanity check needs.
pub const TIMESERIES_SANITY_COLUMNS: [&str; 4] =
    ["year", "scenario", "total_soc_tCha", "delta_soc_tCha_per_yr"];

/// Pool table columns the consistency check needs.
pub const POOL_CONSISTENCY_COLUMNS: [&str; 3] = ["year", "scenario", "soc_tCha"];

/// Timeseries columns the consistency check needs.
pub const TIMESERIES_CONSISTENCY_COLUMNS: [&str; 3] = ["year", "scenario", "total_soc_tCha"];

/// Fail with [`SynthError::Schema`] naming every column of `required` that
/// `table` lacks.
///
/// # Errors
///
/// Returns a schema error if any column is missing.
pub fn assert_required_columns(table: &Table, required: &[&str]) -> SynthResult<()> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| table.column_index(c).is_none())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SynthError::schema(table.name(), missing))
    }
}

/// Summary statistics of a timeseries table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesSanity {
    /// Smallest total SOC, `None` for an empty table.
    pub min_soc: Option<f64>,
    /// Largest total SOC, `None` for an empty table.
    pub max_soc: Option<f64>,
    /// Whether any total SOC is negative.
    pub has_negative_soc: bool,
    /// Rows whose |delta| exceeds [`EXTREME_DELTA_THRESHOLD`]; rows with an
    /// undefined delta are not counted.
    pub extreme_delta_count: usize,
}

/// Check value ranges and continuity of a timeseries table.
///
/// # Errors
///
/// Returns [`SynthError::Schema`] if required columns are missing, or
/// [`SynthError::Parse`] for malformed cells.
pub fn sanity_check_soc_timeseries(table: &Table) -> SynthResult<TimeseriesSanity> {
    assert_required_columns(table, &TIMESERIES_SANITY_COLUMNS)?;
    let total = table.column("total_soc_tCha")?;
    let delta = table.column("delta_soc_tCha_per_yr")?;

    let mut min_soc: Option<f64> = None;
    let mut max_soc: Option<f64> = None;
    let mut has_negative_soc = false;
    let mut extreme_delta_count = 0;

    for row in 0..table.len() {
        let soc: f64 = total.get(row)?;
        min_soc = Some(min_soc.map_or(soc, |m| m.min(soc)));
        max_soc = Some(max_soc.map_or(soc, |m| m.max(soc)));
        has_negative_soc |= soc < 0.0;

        if let Some(d) = delta.get_opt_f64(row)? {
            if d.abs() > EXTREME_DELTA_THRESHOLD {
                extreme_delta_count += 1;
            }
        }
    }

    if has_negative_soc {
        warn!(table = table.name(), "negative SOC values present");
    }
    if extreme_delta_count > 0 {
        warn!(
            table = table.name(),
            count = extreme_delta_count,
            threshold = EXTREME_DELTA_THRESHOLD,
            "extreme year-over-year SOC changes"
        );
    }

    Ok(TimeseriesSanity {
        min_soc,
        max_soc,
        has_negative_soc,
        extreme_delta_count,
    })
}

/// Pool sum against timeseries total for one (scenario, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyRow {
    /// Scenario.
    pub scenario: Scenario,
    /// Year.
    pub year: i32,
    /// Sum of pool SOC values.
    pub pools_sum: f64,
    /// Whether the key exists in the timeseries table.
    pub matched: bool,
    /// Matching timeseries total; `None` if the key is absent there or the
    /// cell is empty, `NaN` or infinite.
    pub total_soc: Option<f64>,
    /// `|pools_sum - total_soc|`; `None` when either side is undefined.
    pub abs_diff: Option<f64>,
    /// `abs_diff / total_soc`; `None` when the total is 0 or undefined.
    pub rel_diff: Option<f64>,
}

/// Compare per-(scenario, year) pool sums with timeseries totals.
///
/// Left join from pools to timeseries: every pool group yields one row per
/// matching timeseries row, or a single row with `total_soc = None` when
/// there is no match. Empty or `NaN` totals count as undefined rather than
/// as parse errors. Sorted by scenario, then year.
///
/// # Errors
///
/// Returns [`SynthError::Schema`] if either table lacks required columns,
/// or [`SynthError::Parse`] for malformed cells.
pub fn pool_consistency_check(pools: &Table, timeseries: &Table) -> SynthResult<Vec<ConsistencyRow>> {
    assert_required_columns(pools, &POOL_CONSISTENCY_COLUMNS)?;
    assert_required_columns(timeseries, &TIMESERIES_CONSISTENCY_COLUMNS)?;

    let mut sums: BTreeMap<(Scenario, i32), f64> = BTreeMap::new();
    {
        let year = pools.column("year")?;
        let scenario = pools.column("scenario")?;
        let soc = pools.column("soc_tCha")?;
        for row in 0..pools.len() {
            let key = (scenario.get::<Scenario>(row)?, year.get::<i32>(row)?);
            *sums.entry(key).or_insert(0.0) += soc.get::<f64>(row)?;
        }
    }

    let mut totals: BTreeMap<(Scenario, i32), Vec<Option<f64>>> = BTreeMap::new();
    {
        let year = timeseries.column("year")?;
        let scenario = timeseries.column("scenario")?;
        let total = timeseries.column("total_soc_tCha")?;
        for row in 0..timeseries.len() {
            let key = (scenario.get::<Scenario>(row)?, year.get::<i32>(row)?);
            totals.entry(key).or_default().push(total.get_opt_f64(row)?);
        }
    }

    let mut report = Vec::with_capacity(sums.len());
    for ((scenario, year), pools_sum) in sums {
        match totals.get(&(scenario, year)) {
            Some(matches) => {
                for &total in matches {
                    report.push(compare(scenario, year, pools_sum, true, total));
                }
            }
            None => report.push(compare(scenario, year, pools_sum, false, None)),
        }
    }
    Ok(report)
}

fn compare(
    scenario: Scenario,
    year: i32,
    pools_sum: f64,
    matched: bool,
    total_soc: Option<f64>,
) -> ConsistencyRow {
    let total_soc = total_soc.filter(|t| t.is_finite());
    let abs_diff = total_soc
        .filter(|_| pools_sum.is_finite())
        .map(|t| (pools_sum - t).abs());
    let rel_diff = match (abs_diff, total_soc) {
        (Some(d), Some(t)) if t != 0.0 => Some(d / t),
        _ => None,
    };
    ConsistencyRow {
        scenario,
        year,
        pools_sum,
        matched,
        total_soc,
        abs_diff,
        rel_diff,
    }
}

/// Aggregate view of a consistency report.
///
/// Undefined differences are counted separately and never enter the maxima.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencySummary {
    /// Report rows.
    pub groups: usize,
    /// Rows whose key is absent from the timeseries table.
    pub unmatched_groups: usize,
    /// Rows with an undefined absolute difference (unmatched key, or an
    /// empty or non-finite total or pool sum).
    pub undefined_abs_diff: usize,
    /// Rows with an undefined relative difference.
    pub undefined_rel_diff: usize,
    /// Largest defined absolute difference.
    pub max_abs_diff: Option<f64>,
    /// Largest defined relative difference.
    pub max_rel_diff: Option<f64>,
}

impl ConsistencySummary {
    /// Every group matched with a defined difference, and no difference
    /// exceeds `tolerance`.
    #[must_use]
    pub fn is_consistent(&self, tolerance: f64) -> bool {
        self.unmatched_groups == 0
            && self.undefined_abs_diff == 0
            && self.max_abs_diff.map_or(true, |d| d <= tolerance)
    }
}

/// Summarize a consistency report.
#[must_use]
pub fn summarize_consistency(rows: &[ConsistencyRow]) -> ConsistencySummary {
    let max = |acc: Option<f64>, v: f64| Some(acc.map_or(v, |m: f64| m.max(v)));
    let mut summary = ConsistencySummary {
        groups: rows.len(),
        unmatched_groups: 0,
        undefined_abs_diff: 0,
        undefined_rel_diff: 0,
        max_abs_diff: None,
        max_rel_diff: None,
    };
    for row in rows {
        if !row.matched {
            summary.unmatched_groups += 1;
        }
        match row.rel_diff {
            Some(r) => summary.max_rel_diff = max(summary.max_rel_diff, r),
            None => summary.undefined_rel_diff += 1,
        }
        match row.abs_diff {
            Some(d) => summary.max_abs_diff = max(summary.max_abs_diff, d),
            None => summary.undefined_abs_diff += 1,
        }
    }
    summary
}
