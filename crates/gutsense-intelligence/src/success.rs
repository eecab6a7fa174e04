// ABOUTME: Success tracking for comfortable meals, streaks, and period-over-period improvement
// ABOUTME: Streaks count consecutive comfortable rated meals, not calendar days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors
#![allow(clippy::cast_precision_loss)] // Safe: counts are tiny

use crate::config::AnalysisConfig;
use crate::statistics::{mean_rating, rated_meals, round_to, within_days_ago};
use chrono::{DateTime, Utc};
use gutsense_core::models::MealRecord;
use serde::{Deserialize, Serialize};

/// Progress indicators for the user's symptom history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessMetrics {
    /// Mean rating over the current period
    pub current_avg_bloating: f64,
    /// Mean rating over the preceding period
    pub previous_period_avg_bloating: f64,
    /// Relative drop from previous to current, in percent
    pub improvement_percentage: f64,
    /// Share of rated meals that were comfortable, 0-100
    pub comfortable_meal_rate: f64,
    /// Comfortable meals in a row ending at the latest rated meal
    pub current_streak: u32,
    /// Longest run of comfortable meals ever observed
    pub longest_streak: u32,
}

/// Success tracker
pub struct SuccessTracker<'a> {
    config: &'a AnalysisConfig,
}

impl Default for SuccessTracker<'static> {
    fn default() -> Self {
        Self::new(AnalysisConfig::global())
    }
}

impl<'a> SuccessTracker<'a> {
    /// Create a tracker with explicit configuration
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Compute success metrics
    #[must_use]
    pub fn analyze(&self, records: &[MealRecord], now: DateTime<Utc>) -> SuccessMetrics {
        let rated = rated_meals(records);
        if rated.is_empty() {
            return SuccessMetrics::default();
        }

        let period = self.config.windows.success_period_days;
        let current = mean_rating(
            rated
                .iter()
                .filter(|m| within_days_ago(m.record.created_at, now, 0, period)),
        );
        let previous_end = period.saturating_mul(2);
        let previous = mean_rating(
            rated
                .iter()
                .filter(|m| within_days_ago(m.record.created_at, now, period, previous_end)),
        );

        let improvement_percentage = match (current, previous) {
            (Some(cur), Some(prev)) if prev > 0.0 => round_to((prev - cur) / prev * 100.0, 1),
            _ => 0.0,
        };

        let comfortable: Vec<bool> = rated.iter().map(|m| self.is_comfortable(m.rating)).collect();
        let comfortable_count = comfortable.iter().filter(|c| **c).count();
        let comfortable_meal_rate =
            round_to(comfortable_count as f64 / comfortable.len() as f64 * 100.0, 1);

        let (current_streak, longest_streak) = Self::streaks(&comfortable);

        SuccessMetrics {
            current_avg_bloating: round_to(current.unwrap_or(0.0), 2),
            previous_period_avg_bloating: round_to(previous.unwrap_or(0.0), 2),
            improvement_percentage,
            comfortable_meal_rate,
            current_streak,
            longest_streak,
        }
    }

    /// Whether a rating counts as a comfortable meal
    #[must_use]
    pub fn is_comfortable(&self, rating: f64) -> bool {
        rating <= self.config.thresholds.comfortable_max_rating
    }

    /// Walk comfortable flags oldest to newest, returning (current, longest)
    fn streaks(comfortable: &[bool]) -> (u32, u32) {
        let mut run = 0_u32;
        let mut longest = 0_u32;
        for is_comfortable in comfortable {
            if *is_comfortable {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }
        (run, longest)
    }
}
