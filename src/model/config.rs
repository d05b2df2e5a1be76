use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scoring weights must be non-negative and sum to 1 (got sum {sum})")]
    InvalidWeights { sum: f64 },
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub horizon: u32,
    pub scoring: ScoringConfig,
    pub cost: CostModel,
    pub animation: AnimationConfig,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub throughput_cap: f64,
    pub weights: ScoringWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    pub throughput: f64,
    pub rework: f64,
    pub precision: f64,
    pub agreement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostModel {
    pub hours_per_item: f64,
    pub hourly_rate: f64,
    pub sales_impact_per_precision_point: f64,
    pub benchmark_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub tick_interval_ms: u64,
    /// Step applied by `start()`; 0 means nothing is drawn until the first tick.
    pub start_step: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub period: u32,
    pub message: String,
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl DashboardConfig {
    pub fn default_v1() -> Self {
        Self {
            horizon: 24,
            scoring: ScoringConfig::default(),
            cost: CostModel::default(),
            animation: AnimationConfig::default(),
            milestones: vec![Milestone {
                period: 9,
                message: "New annotator 'Alex' joins.".to_string(),
            }],
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(invalid("horizon", "must be at least 1"));
        }
        self.scoring.validate()?;
        self.cost.validate()?;
        if self.animation.tick_interval_ms == 0 {
            return Err(invalid("animation.tick_interval_ms", "must be positive"));
        }
        if self.animation.start_step > 1 {
            return Err(invalid("animation.start_step", "must be 0 or 1"));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.throughput_cap > 0.0) {
            return Err(invalid("scoring.throughput_cap", "must be positive"));
        }
        self.weights.validate()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            throughput_cap: 1200.0,
            weights: ScoringWeights::default(),
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.throughput + self.rework + self.precision + self.agreement
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [self.throughput, self.rework, self.precision, self.agreement];
        let sum = self.sum();
        if all.iter().any(|w| !(*w >= 0.0)) || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights { sum });
        }
        Ok(())
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            throughput: 0.25,
            rework: 0.25,
            precision: 0.25,
            agreement: 0.25,
        }
    }
}

impl CostModel {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("cost.hours_per_item", self.hours_per_item),
            ("cost.hourly_rate", self.hourly_rate),
            (
                "cost.sales_impact_per_precision_point",
                self.sales_impact_per_precision_point,
            ),
        ];
        for (field, value) in fields {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(invalid(field, "must be a finite non-negative number"));
            }
        }
        Ok(())
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            hours_per_item: 0.25,
            hourly_rate: 45.0,
            sales_impact_per_precision_point: 10_000_000.0,
            benchmark_index: 0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            start_step: 0,
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/config.rs"]
mod tests;
