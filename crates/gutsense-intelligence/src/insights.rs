// ABOUTME: Full analysis pass bundling every derived trigger structure into one report
// ABOUTME: Runs confidence, combination, trend, success, and recommendation analysis in order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use crate::combinations::{Combination, CombinationAnalyzer};
use crate::confidence::{ConfidenceModel, TriggerConfidence};
use crate::config::AnalysisConfig;
use crate::recommendation_engine::{Recommendation, RecommendationEngine};
use crate::success::{SuccessMetrics, SuccessTracker};
use crate::trends::{TrendAnalyzer, WeeklyComparison};
use chrono::{DateTime, Utc};
use gutsense_core::models::MealRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Every structure derived from one record set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerReport {
    /// When the report was computed
    pub generated_at: Option<DateTime<Utc>>,
    /// Number of rated meals the report is based on
    pub rated_meals: usize,
    /// Per-category statistics, highest impact first
    pub confidences: Vec<TriggerConfidence>,
    /// Notable category combinations
    pub combinations: Vec<Combination>,
    /// This week against the overall average
    pub weekly: WeeklyComparison,
    /// Comfort rate, streaks, improvement
    pub success: SuccessMetrics,
    /// Ranked action list
    pub recommendations: Vec<Recommendation>,
}

/// Facade running the complete analysis
pub struct TriggerAnalyzer<'a> {
    config: &'a AnalysisConfig,
}

impl Default for TriggerAnalyzer<'static> {
    fn default() -> Self {
        Self::new(AnalysisConfig::global())
    }
}

impl<'a> TriggerAnalyzer<'a> {
    /// Create an analyzer with explicit configuration
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Compute the full report for `now`
    #[must_use]
    pub fn analyze(&self, records: &[MealRecord], now: DateTime<Utc>) -> TriggerReport {
        let confidences = ConfidenceModel::new(self.config).analyze(records, now);
        let combinations = CombinationAnalyzer::new(self.config).analyze(records);
        let weekly = TrendAnalyzer::new(self.config).analyze(records, now);
        let success = SuccessTracker::new(self.config).analyze(records, now);
        let recommendations = RecommendationEngine::new(self.config).recommend(
            records,
            &confidences,
            &combinations,
            now,
        );
        let rated_meals = records.iter().filter(|r| r.is_qualifying()).count();

        debug!(
            records = records.len(),
            rated_meals,
            categories = confidences.len(),
            combinations = combinations.len(),
            recommendations = recommendations.len(),
            "trigger analysis complete"
        );

        TriggerReport {
            generated_at: Some(now),
            rated_meals,
            confidences,
            combinations,
            weekly,
            success,
            recommendations,
        }
    }
}
