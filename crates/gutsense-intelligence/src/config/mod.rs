// ABOUTME: Analysis configuration for trigger inference heuristics
// ABOUTME: Thresholds, windows, limits, and impact weights with env overrides and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

//! Analysis Configuration
//!
//! The margins and cutoffs used by the analyzers are empirical heuristics for
//! small personal datasets (roughly 5-50 meals). They are exposed here as
//! plain values with conservative defaults so deployments can tune them
//! through `GUTSENSE_*` environment variables.

/// Configuration error types
pub mod error;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

/// Longest accepted analysis window, ten years in days
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Global configuration singleton
static ANALYSIS_CONFIG: OnceLock<AnalysisConfig> = OnceLock::new();

/// Main analysis configuration container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Rating thresholds and significance margins
    pub thresholds: AnalysisThresholds,
    /// Time windows, in days
    pub windows: AnalysisWindows,
    /// Minimum data requirements and output caps
    pub limits: AnalysisLimits,
    /// Bounds for the enhanced impact multipliers
    pub weights: ImpactWeights,
}

/// Rating thresholds and significance margins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisThresholds {
    /// Ratings at or below this count as a comfortable meal
    pub comfortable_max_rating: f64,
    /// Average rating at or above this counts as high bloating
    pub high_bloating_min_avg: f64,
    /// Rating points by which a combination must exceed its parts
    pub combination_margin: f64,
    /// Rating points by which this week must differ from overall
    pub trend_margin: f64,
    /// Percent change that makes an experiment conclusive
    pub experiment_significance_percent: f64,
}

/// Time windows, in days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisWindows {
    /// Window for "this week" and recency weighting
    pub recent_days: i64,
    /// Length of each success-tracking period
    pub success_period_days: i64,
    /// Minimum absence before suggesting reintroduction
    pub reintroduce_min_days: i64,
    /// Maximum absence for which reintroduction is still suggested
    pub reintroduce_max_days: i64,
}

/// Minimum data requirements and output caps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisLimits {
    /// Qualifying records required for combinations and recommendations
    pub min_records_for_patterns: usize,
    /// Occurrences needed for the investigating tier
    pub investigating_min_occurrences: u32,
    /// Occurrences needed for the high confidence tier
    pub high_confidence_occurrences: u32,
    /// Maximum combinations returned
    pub max_combinations: usize,
    /// Maximum recommendations returned
    pub max_recommendations: usize,
    /// Maximum food names listed per category
    pub top_foods_per_category: usize,
    /// Maximum control meals used for an experiment baseline
    pub max_control_meals: usize,
}

/// Bounds for the enhanced impact multipliers
///
/// Each multiplier is clamped to its own range so the product stays bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactWeights {
    /// Consistency factor for widely scattered ratings
    pub consistency_min: f64,
    /// Consistency factor for identical ratings
    pub consistency_max: f64,
    /// Frequency weight at one occurrence
    pub frequency_min: f64,
    /// Frequency weight at saturation
    pub frequency_max: f64,
    /// Occurrence scale of the saturation curve
    pub frequency_saturation: f64,
    /// Extra weight when every occurrence is recent
    pub recency_max_boost: f64,
    /// How strongly deviation from the personal average scales the score
    pub baseline_sensitivity: f64,
    /// Lower clamp of the personal baseline adjustment
    pub baseline_min: f64,
    /// Upper clamp of the personal baseline adjustment
    pub baseline_max: f64,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            comfortable_max_rating: 2.0,
            high_bloating_min_avg: 3.5,
            combination_margin: 0.5,
            trend_margin: 0.5,
            experiment_significance_percent: 30.0,
        }
    }
}

impl Default for AnalysisWindows {
    fn default() -> Self {
        Self {
            recent_days: 7,
            success_period_days: 14,
            reintroduce_min_days: 10,
            reintroduce_max_days: 30,
        }
    }
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            min_records_for_patterns: 5,
            investigating_min_occurrences: 2,
            high_confidence_occurrences: 5,
            max_combinations: 3,
            max_recommendations: 3,
            top_foods_per_category: 3,
            max_control_meals: 5,
        }
    }
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            consistency_min: 0.8,
            consistency_max: 1.2,
            frequency_min: 0.5,
            frequency_max: 1.0,
            frequency_saturation: 3.0,
            recency_max_boost: 0.25,
            baseline_sensitivity: 0.5,
            baseline_min: 0.75,
            baseline_max: 1.25,
        }
    }
}

impl AnalysisConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        ANALYSIS_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load analysis config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from defaults plus environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistent value
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if t.comfortable_max_rating < 1.0 || t.high_bloating_min_avg > 5.0 {
            return Err(ConfigError::ValueOutOfRange(
                "rating thresholds must lie on the 1-5 scale",
            ));
        }
        if t.comfortable_max_rating >= t.high_bloating_min_avg {
            return Err(ConfigError::InvalidRange(
                "comfortable_max_rating must be < high_bloating_min_avg",
            ));
        }
        if t.combination_margin < 0.0 || t.trend_margin < 0.0 {
            return Err(ConfigError::ValueOutOfRange("margins must be non-negative"));
        }
        if t.experiment_significance_percent <= 0.0 || t.experiment_significance_percent >= 100.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "experiment_significance_percent must be between 0 and 100",
            ));
        }

        let w = &self.windows;
        if w.recent_days < 1 || w.success_period_days < 1 {
            return Err(ConfigError::ValueOutOfRange("windows must be at least one day"));
        }
        if [
            w.recent_days,
            w.success_period_days,
            w.reintroduce_min_days,
            w.reintroduce_max_days,
        ]
        .iter()
        .any(|days| *days > MAX_WINDOW_DAYS)
        {
            return Err(ConfigError::ValueOutOfRange(
                "windows must not exceed MAX_WINDOW_DAYS (3650)",
            ));
        }
        if w.reintroduce_min_days >= w.reintroduce_max_days {
            return Err(ConfigError::InvalidRange(
                "reintroduce_min_days must be < reintroduce_max_days",
            ));
        }

        let l = &self.limits;
        if l.max_combinations == 0
            || l.max_recommendations == 0
            || l.top_foods_per_category == 0
            || l.max_control_meals == 0
        {
            return Err(ConfigError::ValueOutOfRange("output caps must be at least 1"));
        }
        if l.investigating_min_occurrences < 2
            || l.investigating_min_occurrences >= l.high_confidence_occurrences
        {
            return Err(ConfigError::InvalidRange(
                "investigating_min_occurrences must be >= 2 and < high_confidence_occurrences",
            ));
        }

        let iw = &self.weights;
        if iw.consistency_min > iw.consistency_max
            || iw.frequency_min > iw.frequency_max
            || iw.baseline_min > iw.baseline_max
        {
            return Err(ConfigError::InvalidRange(
                "impact multiplier bounds must satisfy min <= max",
            ));
        }
        if iw.consistency_min <= 0.0 || iw.frequency_min <= 0.0 || iw.baseline_min <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "impact multiplier lower bounds must be positive",
            ));
        }
        if iw.frequency_saturation <= 0.0 || iw.recency_max_boost < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "frequency_saturation must be positive and recency_max_boost non-negative",
            ));
        }

        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        let t = &mut self.thresholds;
        Self::apply_env_var("GUTSENSE_COMFORTABLE_MAX_RATING", &mut t.comfortable_max_rating)?;
        Self::apply_env_var("GUTSENSE_HIGH_BLOATING_MIN_AVG", &mut t.high_bloating_min_avg)?;
        Self::apply_env_var("GUTSENSE_COMBINATION_MARGIN", &mut t.combination_margin)?;
        Self::apply_env_var("GUTSENSE_TREND_MARGIN", &mut t.trend_margin)?;
        Self::apply_env_var(
            "GUTSENSE_EXPERIMENT_SIGNIFICANCE_PERCENT",
            &mut t.experiment_significance_percent,
        )?;

        let w = &mut self.windows;
        Self::apply_env_var("GUTSENSE_RECENT_DAYS", &mut w.recent_days)?;
        Self::apply_env_var("GUTSENSE_SUCCESS_PERIOD_DAYS", &mut w.success_period_days)?;
        Self::apply_env_var("GUTSENSE_REINTRODUCE_MIN_DAYS", &mut w.reintroduce_min_days)?;
        Self::apply_env_var("GUTSENSE_REINTRODUCE_MAX_DAYS", &mut w.reintroduce_max_days)?;

        let l = &mut self.limits;
        Self::apply_env_var("GUTSENSE_MIN_RECORDS_FOR_PATTERNS", &mut l.min_records_for_patterns)?;
        Self::apply_env_var("GUTSENSE_MAX_COMBINATIONS", &mut l.max_combinations)?;
        Self::apply_env_var("GUTSENSE_MAX_RECOMMENDATIONS", &mut l.max_recommendations)?;
        Self::apply_env_var("GUTSENSE_TOP_FOODS_PER_CATEGORY", &mut l.top_foods_per_category)?;
        Self::apply_env_var("GUTSENSE_MAX_CONTROL_MEALS", &mut l.max_control_meals)?;

        Ok(self)
    }
}
