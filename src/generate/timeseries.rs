//! Year-indexed SOC trajectories for the baseline and project scenarios.
//!
//! Both scenarios start from one shared stock and integrate annual
//! increments. The project scenario adds a management effect that ramps in
//! over three years from the management change year.
//!
//! Draw order on the stream seeded from `cfg.seed`:
//! 1. one uniform initial stock
//! 2. `n` baseline increments
//! 3. `n` project-delta increments
//! 4. `n` baseline observation noise values
//! 5. `n` project observation noise values

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Scenario;
use crate::config::ScenarioConfig;
use crate::rng::SocRng;

/// Hard floor applied to every observed SOC value (t C/ha).
pub const SOC_FLOOR: f64 = 1.0;

/// Years over which the management effect ramps from 0 to 1.
pub const RAMP_YEARS: f64 = 3.0;

/// One year of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocTimeseriesRow {
    /// Calendar year.
    pub year: i32,
    /// Scenario this value belongs to.
    pub scenario: Scenario,
    /// Observed total SOC stock (t C/ha), never below [`SOC_FLOOR`].
    pub total_soc: f64,
    /// Year the management practice changes (constant per run).
    pub management_change_year: i32,
    /// Change from the previous year of the same scenario; `None` for the
    /// first year.
    pub delta_soc_per_yr: Option<f64>,
}

/// Median of the simulated years, truncated toward zero for even spans.
#[must_use]
pub fn management_change_year(start_year: i32, end_year: i32) -> i32 {
    let n = i64::from(end_year) - i64::from(start_year);
    if n <= 0 {
        return start_year;
    }
    let start = i64::from(start_year);
    let mid = start + n / 2;
    let median = if n % 2 == 1 {
        mid as f64
    } else {
        (mid - 1 + mid) as f64 / 2.0
    };
    median.trunc() as i32
}

/// Fraction of the management effect active in `year`.
///
/// Zero up to and including `change_year`, then rising linearly to 1 over
/// [`RAMP_YEARS`].
#[must_use]
pub fn management_ramp(year: i32, change_year: i32) -> f64 {
    let t = f64::from(year) - f64::from(change_year);
    (t / RAMP_YEARS).clamp(0.0, 1.0)
}

/// Generate the SOC timeseries: baseline block first, then project block,
/// years ascending within each.
#[must_use]
pub fn generate_soc_timeseries(cfg: &ScenarioConfig) -> Vec<SocTimeseriesRow> {
    let mut rng = SocRng::new(cfg.seed);
    let years: Vec<i32> = cfg.years().collect();
    let n = years.len();

    let soc0 = rng.gen_range_f64(cfg.initial_soc_range.low, cfg.initial_soc_range.high);
    let baseline_incr = rng.normal_n(n, cfg.baseline_mu, cfg.baseline_sigma);

    let change_year = management_change_year(cfg.start_year, cfg.end_year);
    let ramp: Vec<f64> = years
        .iter()
        .map(|&y| management_ramp(y, change_year))
        .collect();

    let project_delta = rng.normal_n(n, cfg.project_delta_mu, cfg.project_delta_sigma);
    let project_incr: Vec<f64> = baseline_incr
        .iter()
        .zip(&ramp)
        .zip(&project_delta)
        .map(|((b, r), d)| b + r * d)
        .collect();

    let baseline_soc = integrate(soc0, &baseline_incr);
    let project_soc = integrate(soc0, &project_incr);

    let baseline_noise = rng.normal_n(n, 0.0, cfg.obs_noise_sigma);
    let project_noise = rng.normal_n(n, 0.0, cfg.obs_noise_sigma);

    let baseline_obs = observe(&baseline_soc, &baseline_noise);
    let project_obs = observe(&project_soc, &project_noise);

    debug!(
        seed = cfg.seed,
        soc0,
        change_year,
        years = n,
        "generated soc trajectories"
    );

    let mut rows = Vec::with_capacity(2 * n);
    for (scenario, series) in [
        (Scenario::Baseline, &baseline_obs),
        (Scenario::Project, &project_obs),
    ] {
        let mut prev: Option<f64> = None;
        for (&year, &total_soc) in years.iter().zip(series.iter()) {
            rows.push(SocTimeseriesRow {
                year,
                scenario,
                total_soc,
                management_change_year: change_year,
                delta_soc_per_yr: prev.map(|p| total_soc - p),
            });
            prev = Some(total_soc);
        }
    }
    rows
}

/// `soc0` plus the inclusive running sum of `increments`.
fn integrate(soc0: f64, increments: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    increments
        .iter()
        .map(|inc| {
            acc += inc;
            soc0 + acc
        })
        .collect()
}

fn observe(levels: &[f64], noise: &[f64]) -> Vec<f64> {
    levels
        .iter()
        .zip(noise)
        .map(|(level, eps)| (level + eps).max(SOC_FLOOR))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> ScenarioConfig {
        ScenarioConfig::builder().years(2000, 2003).build()
    }

    #[test]
    fn test_change_year_is_median() {
        assert_eq!(management_change_year(2000, 2003), 2001);
        assert_eq!(management_change_year(2000, 2025), 2012);
        // even span: median 2001.5 truncates to 2001
        assert_eq!(management_change_year(2000, 2004), 2001);
        assert_eq!(management_change_year(2000, 2001), 2000);
    }

    #[test]
    fn test_ramp_shape() {
        let change = management_change_year(2000, 2003);
        let ramp: Vec<f64> = (2000..2003).map(|y| management_ramp(y, change)).collect();
        assert!(ramp[0].abs() < f64::EPSILON, "ramp must be 0 before change");
        for (y, r) in (2000..2003).zip(&ramp) {
            let expected = ((f64::from(y) - 2001.0) / 3.0).clamp(0.0, 1.0);
            assert!((r - expected).abs() < 1e-15);
        }
        assert!((management_ramp(2002, 2001) - 1.0 / 3.0).abs() < 1e-15);
        assert!((management_ramp(2003, 2001) - 2.0 / 3.0).abs() < 1e-15);
        assert!((management_ramp(2004, 2001) - 1.0).abs() < 1e-15);
        assert!((management_ramp(2030, 2001) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_row_layout() {
        let rows = generate_soc_timeseries(&short_config());
        assert_eq!(rows.len(), 6);
        let layout: Vec<(Scenario, i32)> = rows.iter().map(|r| (r.scenario, r.year)).collect();
        assert_eq!(
            layout,
            vec![
                (Scenario::Baseline, 2000),
                (Scenario::Baseline, 2001),
                (Scenario::Baseline, 2002),
                (Scenario::Project, 2000),
                (Scenario::Project, 2001),
                (Scenario::Project, 2002),
            ]
        );
        assert!(rows.iter().all(|r| r.management_change_year == 2001));
    }

    #[test]
    fn test_delta_is_first_difference() {
        let rows = generate_soc_timeseries(&ScenarioConfig::default());
        for block in rows.chunks(25) {
            assert!(block[0].delta_soc_per_yr.is_none());
            for pair in block.windows(2) {
                let delta = pair[1].delta_soc_per_yr.unwrap();
                assert!((delta - (pair[1].total_soc - pair[0].total_soc)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let cfg = ScenarioConfig::default();
        assert_eq!(generate_soc_timeseries(&cfg), generate_soc_timeseries(&cfg));
    }

    #[test]
    fn test_seed_changes_output() {
        let a = generate_soc_timeseries(&ScenarioConfig::builder().seed(1).build());
        let b = generate_soc_timeseries(&ScenarioConfig::builder().seed(2).build());
        assert_ne!(a, b);
    }

    /// Without noise or drift variance, the scenarios share soc0 and only
    /// diverge once the ramp is positive.
    #[test]
    fn test_noise_free_scenarios_share_start() {
        let cfg = ScenarioConfig::builder()
            .years(2000, 2010)
            .baseline(0.0, 0.0)
            .project_delta(0.5, 0.0)
            .obs_noise_sigma(0.0)
            .build();
        let rows = generate_soc_timeseries(&cfg);
        let (baseline, project) = rows.split_at(10);
        let change = baseline[0].management_change_year;
        assert_eq!(change, 2004);

        for (b, p) in baseline.iter().zip(project) {
            if b.year <= change {
                assert!((b.total_soc - p.total_soc).abs() < 1e-12);
            } else {
                assert!(p.total_soc > b.total_soc);
            }
        }
        // full effect after the ramp: 0.5 per year
        let last = project[9].delta_soc_per_yr.unwrap();
        assert!((last - 0.5).abs() < 1e-12);
    }

    /// Draw order: the initial stock is the first uniform of the stream.
    #[test]
    fn test_initial_stock_is_first_draw() {
        let cfg = ScenarioConfig::builder()
            .seed(9)
            .baseline(0.0, 0.0)
            .project_delta(0.0, 0.0)
            .obs_noise_sigma(0.0)
            .build();
        let rows = generate_soc_timeseries(&cfg);
        let mut rng = SocRng::new(9);
        let expected = rng.gen_range_f64(40.0, 75.0);
        assert!(rows
            .iter()
            .all(|r| (r.total_soc - expected).abs() < 1e-12));
    }

    #[test]
    fn test_floor_applied() {
        let cfg = ScenarioConfig::builder()
            .initial_soc_range(1.0, 1.5)
            .baseline(-1.0, 0.1)
            .build();
        let rows = generate_soc_timeseries(&cfg);
        assert!(rows.iter().all(|r| r.total_soc >= SOC_FLOOR));
        assert!(rows
            .iter()
            .any(|r| (r.total_soc - SOC_FLOOR).abs() < f64::EPSILON));
    }

    #[test]
    fn test_integrate_inclusive() {
        let out = integrate(10.0, &[1.0, 2.0, 3.0]);
        assert_eq!(out, vec![11.0, 13.0, 16.0]);
    }
}
