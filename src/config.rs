//! Configuration file model
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock scoring model and the built-in region catalog.

use crate::carbon_aware::types::Urgency;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Top-level configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub impact: ImpactConfig,
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub history: HistoryConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.impact.validate()
    }
}

/// Weights and reference ceilings of the region score
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the carbon term
    pub carbon_weight: f64,
    /// Carbon intensity (gCO2/kWh) at which the carbon term reaches zero
    pub carbon_ceiling: f64,
    pub cost_weight: f64,
    /// Cost per compute-hour at which the cost term reaches zero
    pub cost_ceiling: f64,
    /// Latency (ms) at which the latency term reaches zero
    pub latency_ceiling: f64,
    pub availability_weight: f64,
    /// Urgency-dependent weight of the latency term
    pub latency_weights: LatencyWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            carbon_weight: 50.0,
            carbon_ceiling: 500.0,
            cost_weight: 20.0,
            cost_ceiling: 0.2,
            latency_ceiling: 200.0,
            availability_weight: 5.0,
            latency_weights: LatencyWeights::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("scoring.carbon_weight", self.carbon_weight),
            ("scoring.cost_weight", self.cost_weight),
            ("scoring.availability_weight", self.availability_weight),
            ("scoring.latency_weights.low", self.latency_weights.low),
            ("scoring.latency_weights.medium", self.latency_weights.medium),
            ("scoring.latency_weights.high", self.latency_weights.high),
        ];
        for (key, value) in weights {
            if !value.is_finite() {
                return Err(Error::validation(format!("{} must be finite", key)));
            }
        }

        let ceilings = [
            ("scoring.carbon_ceiling", self.carbon_ceiling),
            ("scoring.cost_ceiling", self.cost_ceiling),
            ("scoring.latency_ceiling", self.latency_ceiling),
        ];
        for (key, value) in ceilings {
            require_positive(key, value)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LatencyWeights {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for LatencyWeights {
    fn default() -> Self {
        Self {
            low: 5.0,
            medium: 15.0,
            high: 25.0,
        }
    }
}

impl LatencyWeights {
    pub fn for_urgency(&self, urgency: Urgency) -> f64 {
        match urgency {
            Urgency::Low => self.low,
            Urgency::Medium => self.medium,
            Urgency::High => self.high,
        }
    }
}

/// Constants of the impact model
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImpactConfig {
    /// Energy drawn per core-hour (kWh)
    pub kwh_per_core_hour: f64,
    /// Global-average grid intensity that carbon savings are measured against (gCO2/kWh)
    pub baseline_carbon_intensity: f64,
    pub trees_per_kg_saved: f64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            kwh_per_core_hour: 0.3,
            baseline_carbon_intensity: 475.0,
            trees_per_kg_saved: 0.00045,
        }
    }
}

impl ImpactConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("impact.kwh_per_core_hour", self.kwh_per_core_hour)?;
        require_positive(
            "impact.baseline_carbon_intensity",
            self.baseline_carbon_intensity,
        )?;
        if !self.trees_per_kg_saved.is_finite() || self.trees_per_kg_saved < 0.0 {
            return Err(Error::validation(
                "impact.trees_per_kg_saved must be a non-negative number",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TOML file with `[[regions]]` tables; the built-in catalog is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// JSON file the job history is persisted to; in-memory only when unset
    pub path: Option<PathBuf>,
}

fn require_positive(key: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::validation(format!(
            "{} must be a positive number, got {}",
            key, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_stock_model() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.scoring, ScoringConfig::default());
        assert_eq!(config.scoring.latency_weights.for_urgency(Urgency::Low), 5.0);
        assert_eq!(config.scoring.latency_weights.for_urgency(Urgency::Medium), 15.0);
        assert_eq!(config.scoring.latency_weights.for_urgency(Urgency::High), 25.0);
        assert_eq!(config.impact.baseline_carbon_intensity, 475.0);
        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert!(config.catalog.path.is_none());
        assert!(config.history.path.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            [impact]
            baseline_carbon_intensity = 420.0

            [scoring.latency_weights]
            high = 40.0
            "#,
        )
        .unwrap();
        assert_eq!(config.impact.baseline_carbon_intensity, 420.0);
        assert_eq!(config.impact.kwh_per_core_hour, 0.3);
        assert_eq!(config.scoring.latency_weights.high, 40.0);
        assert_eq!(config.scoring.latency_weights.medium, 15.0);
    }

    #[test]
    fn test_rejects_non_positive_ceiling() {
        let err = Config::from_toml_str("[scoring]\ncost_ceiling = 0.0\n").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        let infinite = ScoringConfig {
            carbon_weight: f64::INFINITY,
            ..ScoringConfig::default()
        };
        assert!(infinite.validate().unwrap_err().is_validation());

        let mut nan_latency = ScoringConfig::default();
        nan_latency.latency_weights.high = f64::NAN;
        assert!(nan_latency.validate().unwrap_err().is_validation());

        let err = Config::from_toml_str("[scoring]\ncost_weight = nan\n").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_trees_factor_must_be_non_negative() {
        let negative = ImpactConfig {
            trees_per_kg_saved: -0.1,
            ..ImpactConfig::default()
        };
        assert!(negative.validate().unwrap_err().is_validation());

        let zero = ImpactConfig {
            trees_per_kg_saved: 0.0,
            ..ImpactConfig::default()
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_rejects_unparseable_toml() {
        let err = Config::from_toml_str("[scoring\n").unwrap_err();
        assert!(matches!(err, Error::TomlError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nlisten_addr = \"127.0.0.1:9090\"").unwrap();

        let config = Config::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:9090");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/green-scheduler.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
