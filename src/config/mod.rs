//! Scenario configuration with YAML loading and validation.
//!
//! `ScenarioConfig` is an immutable value: generators only borrow it.
//! Mistakes are rejected up front through:
//! - Type-safe configuration structs
//! - Field ranges via `validator`
//! - Semantic checks spanning several fields

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{SynthError, SynthResult};

/// Parameter bundle driving generation.
///
/// Every field has a default, so YAML files only need to name what they
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Seed for the timeseries stream; the pool stream uses `seed + 1`.
    pub seed: u64,
    /// First simulated year.
    pub start_year: i32,
    /// Year after the last simulated year (exclusive).
    pub end_year: i32,
    /// Informational label.
    pub climate_regime: String,
    /// Informational label.
    pub soil_texture_class: String,
    /// Informational label.
    pub system: String,
    /// Envelope for the initial topsoil SOC stock (t C/ha).
    #[validate(nested)]
    pub initial_soc_range: SocRange,
    /// Mean baseline annual SOC change (t C/ha/yr).
    pub baseline_mu: f64,
    /// Std of baseline annual SOC change.
    #[validate(range(min = 0.0))]
    pub baseline_sigma: f64,
    /// Mean project effect on annual change (t C/ha/yr).
    pub project_delta_mu: f64,
    /// Std of project effect.
    #[validate(range(min = 0.0))]
    pub project_delta_sigma: f64,
    /// Std of observation noise added to SOC levels (t C/ha).
    #[validate(range(min = 0.0))]
    pub obs_noise_sigma: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_year: 2000,
            end_year: 2025,
            climate_regime: "temperate_eu".to_string(),
            soil_texture_class: "loam_to_clay_loam".to_string(),
            system: "rainfed_arable".to_string(),
            initial_soc_range: SocRange::default(),
            baseline_mu: 0.02,
            baseline_sigma: 0.12,
            project_delta_mu: 0.18,
            project_delta_sigma: 0.06,
            obs_noise_sigma: 0.20,
        }
    }
}

impl ScenarioConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> SynthResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SynthResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Run field and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn check(&self) -> SynthResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> ScenarioConfigBuilder {
        ScenarioConfigBuilder::default()
    }

    /// Number of simulated years.
    #[must_use]
    pub fn n_years(&self) -> usize {
        usize::try_from(i64::from(self.end_year) - i64::from(self.start_year)).unwrap_or(0)
    }

    /// Simulated years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..self.end_year
    }

    /// Seed of the pool allocation stream.
    #[must_use]
    pub const fn pool_seed(&self) -> u64 {
        self.seed.wrapping_add(1)
    }

    fn validate_semantic(&self) -> SynthResult<()> {
        if self.start_year >= self.end_year {
            return Err(SynthError::config(format!(
                "start_year ({}) must be less than end_year ({})",
                self.start_year, self.end_year
            )));
        }

        let SocRange { low, high } = self.initial_soc_range;
        if !low.is_finite() || !high.is_finite() {
            return Err(SynthError::config("initial_soc_range bounds must be finite"));
        }
        if low > high {
            return Err(SynthError::config(format!(
                "initial_soc_range low ({low}) exceeds high ({high})"
            )));
        }

        let params = [
            ("baseline_mu", self.baseline_mu),
            ("baseline_sigma", self.baseline_sigma),
            ("project_delta_mu", self.project_delta_mu),
            ("project_delta_sigma", self.project_delta_sigma),
            ("obs_noise_sigma", self.obs_noise_sigma),
        ];
        if let Some((name, _)) = params.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SynthError::config(format!("{name} must be finite")));
        }

        Ok(())
    }
}

/// Initial SOC envelope (t C/ha), `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SocRange {
    /// Inclusive lower bound.
    #[validate(range(min = 0.0))]
    pub low: f64,
    /// Exclusive upper bound.
    #[validate(range(min = 0.0))]
    pub high: f64,
}

impl Default for SocRange {
    fn default() -> Self {
        Self {
            low: 40.0,
            high: 75.0,
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct ScenarioConfigBuilder {
    seed: Option<u64>,
    years: Option<(i32, i32)>,
    initial_soc_range: Option<SocRange>,
    baseline: Option<(f64, f64)>,
    project_delta: Option<(f64, f64)>,
    obs_noise_sigma: Option<f64>,
}

impl ScenarioConfigBuilder {
    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the simulated span `[start, end)`.
    #[must_use]
    pub const fn years(mut self, start: i32, end: i32) -> Self {
        self.years = Some((start, end));
        self
    }

    /// Set the initial SOC envelope.
    #[must_use]
    pub const fn initial_soc_range(mut self, low: f64, high: f64) -> Self {
        self.initial_soc_range = Some(SocRange { low, high });
        self
    }

    /// Set baseline drift mean and std.
    #[must_use]
    pub const fn baseline(mut self, mu: f64, sigma: f64) -> Self {
        self.baseline = Some((mu, sigma));
        self
    }

    /// Set project effect mean and std.
    #[must_use]
    pub const fn project_delta(mut self, mu: f64, sigma: f64) -> Self {
        self.project_delta = Some((mu, sigma));
        self
    }

    /// Set observation noise std.
    #[must_use]
    pub const fn obs_noise_sigma(mut self, sigma: f64) -> Self {
        self.obs_noise_sigma = Some(sigma);
        self
    }

    /// Build the configuration without validating it.
    #[must_use]
    pub fn build(self) -> ScenarioConfig {
        let mut config = ScenarioConfig::default();

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some((start, end)) = self.years {
            config.start_year = start;
            config.end_year = end;
        }
        if let Some(range) = self.initial_soc_range {
            config.initial_soc_range = range;
        }
        if let Some((mu, sigma)) = self.baseline {
            config.baseline_mu = mu;
            config.baseline_sigma = sigma;
        }
        if let Some((mu, sigma)) = self.project_delta {
            config.project_delta_mu = mu;
            config.project_delta_sigma = sigma;
        }
        if let Some(sigma) = self.obs_noise_sigma {
            config.obs_noise_sigma = sigma;
        }

        config
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid.
    pub fn try_build(self) -> SynthResult<ScenarioConfig> {
        let config = self.build();
        config.check()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScenarioConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.seed, 42);
        assert_eq!(config.n_years(), 25);
        assert_eq!(config.pool_seed(), 43);
    }

    #[test]
    fn test_years_end_exclusive() {
        let config = ScenarioConfig::builder().years(2000, 2003).build();
        let years: Vec<i32> = config.years().collect();
        assert_eq!(years, vec![2000, 2001, 2002]);
        assert_eq!(config.n_years(), 3);
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r"
seed: 7
start_year: 1990
end_year: 2000
initial_soc_range:
  low: 30.0
  high: 60.0
";
        let config = ScenarioConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.start_year, 1990);
        assert!((config.initial_soc_range.high - 60.0).abs() < f64::EPSILON);
        // untouched fields keep their defaults
        assert!((config.baseline_mu - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.system, "rainfed_arable");
    }

    #[test]
    fn test_from_yaml_unknown_field_rejected() {
        let result = ScenarioConfig::from_yaml("seed: 1\nrothc_version: 26.3\n");
        assert!(matches!(result, Err(SynthError::YamlParse(_))));
    }

    #[test]
    fn test_empty_span_rejected() {
        let result = ScenarioConfig::builder().years(2010, 2010).try_build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("start_year"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = ScenarioConfig::builder()
            .initial_soc_range(80.0, 40.0)
            .try_build();
        assert!(matches!(result, Err(SynthError::Config { .. })));
    }

    #[test]
    fn test_degenerate_range_allowed() {
        let result = ScenarioConfig::builder()
            .initial_soc_range(50.0, 50.0)
            .try_build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_negative_sigma_rejected() {
        let result = ScenarioConfig::builder().baseline(0.0, -0.1).try_build();
        assert!(matches!(result, Err(SynthError::Validation(_))));
    }

    #[test]
    fn test_non_finite_mean_rejected() {
        let result = ScenarioConfig::builder()
            .project_delta(f64::NAN, 0.1)
            .try_build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("project_delta_mu"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.yaml");
        std::fs::write(&path, "seed: 11\nobs_noise_sigma: 0.0\n").unwrap();
        let config = ScenarioConfig::load(&path).unwrap();
        assert_eq!(config.seed, 11);
        assert!(config.obs_noise_sigma.abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ScenarioConfig::load("/nonexistent/scenario.yaml");
        assert!(matches!(result, Err(SynthError::Io(_))));
    }

    #[test]
    fn test_yaml_roundtrip_preserves_config() {
        let config = ScenarioConfig::builder().seed(5).years(2001, 2011).build();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = ScenarioConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
