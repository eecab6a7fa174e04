// ABOUTME: Weekly trend analysis comparing the recent window with the overall baseline
// ABOUTME: Classifies improving/worsening/stable and detects newly emerging categories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use crate::config::AnalysisConfig;
use crate::statistics::{days_before, mean_rating, rated_meals, round_to, within_last_days};
use chrono::{DateTime, Utc};
use gutsense_core::models::{MealRecord, TriggerCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Direction of the symptom trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// This week is meaningfully better than overall
    Improving,
    /// This week is meaningfully worse than overall
    Worsening,
    /// Within the margin
    Stable,
}

/// This week compared with the full history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyComparison {
    /// Mean rating over the recent window, 0 when empty
    pub this_week_avg_bloating: f64,
    /// Mean rating over all rated meals, 0 when empty
    pub overall_avg_bloating: f64,
    /// Trend classification
    pub trend: TrendDirection,
    /// Categories seen this week that never appeared before it
    pub new_patterns: Vec<TriggerCategory>,
}

impl Default for WeeklyComparison {
    fn default() -> Self {
        Self {
            this_week_avg_bloating: 0.0,
            overall_avg_bloating: 0.0,
            trend: TrendDirection::Stable,
            new_patterns: Vec::new(),
        }
    }
}

/// Weekly trend analyzer
pub struct TrendAnalyzer<'a> {
    config: &'a AnalysisConfig,
}

impl Default for TrendAnalyzer<'static> {
    fn default() -> Self {
        Self::new(AnalysisConfig::global())
    }
}

impl<'a> TrendAnalyzer<'a> {
    /// Create an analyzer with explicit configuration
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Compare the recent window against the overall average
    #[must_use]
    pub fn analyze(&self, records: &[MealRecord], now: DateTime<Utc>) -> WeeklyComparison {
        let window = self.config.windows.recent_days;
        let rated = rated_meals(records);

        let this_week_avg = mean_rating(
            rated
                .iter()
                .filter(|m| within_last_days(m.record.created_at, now, window)),
        );
        let overall_avg = mean_rating(&rated);

        let trend = match (this_week_avg, overall_avg) {
            (Some(week), Some(overall)) => self.classify(week, overall),
            _ => TrendDirection::Stable,
        };

        WeeklyComparison {
            this_week_avg_bloating: round_to(this_week_avg.unwrap_or(0.0), 2),
            overall_avg_bloating: round_to(overall_avg.unwrap_or(0.0), 2),
            trend,
            new_patterns: Self::new_patterns(records, now, window),
        }
    }

    fn classify(&self, this_week: f64, overall: f64) -> TrendDirection {
        let margin = self.config.thresholds.trend_margin;
        if this_week < overall - margin {
            TrendDirection::Improving
        } else if this_week > overall + margin {
            TrendDirection::Worsening
        } else {
            TrendDirection::Stable
        }
    }

    /// Categories present this week and absent from all earlier records
    ///
    /// Uses every logged meal, rated or not. A user with no history before
    /// this week has no baseline, so nothing counts as new.
    fn new_patterns(
        records: &[MealRecord],
        now: DateTime<Utc>,
        window: i64,
    ) -> Vec<TriggerCategory> {
        let cutoff = days_before(now, window);
        let mut before: BTreeSet<TriggerCategory> = BTreeSet::new();
        let mut this_week: BTreeSet<TriggerCategory> = BTreeSet::new();
        let mut has_history = false;

        for record in records {
            if cutoff.is_some_and(|cutoff| record.created_at <= cutoff) {
                has_history = true;
                before.extend(record.categories());
            } else if record.created_at <= now {
                this_week.extend(record.categories());
            }
        }

        if !has_history {
            return Vec::new();
        }
        this_week.difference(&before).copied().collect()
    }
}
