// ABOUTME: Detects category sets that are worse together than apart
// ABOUTME: Enumerates co-occurrence sets observed within real meals and compares symptom averages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors
#![allow(clippy::cast_precision_loss)] // Safe: counts are tiny

use crate::config::AnalysisConfig;
use crate::statistics::{mean, rated_meals, round_to, RatedMeal};
use gutsense_core::models::{MealRecord, TriggerCategory};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// A set of categories eaten together in at least two meals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    /// Member categories, sorted
    pub categories: Vec<TriggerCategory>,
    /// Rated meals containing every member
    pub occurrence_count: u32,
    /// Mean rating of meals containing every member
    pub avg_bloating_together: f64,
    /// Weighted mean of each member's rating when eaten without the full set
    pub avg_bloating_apart: f64,
    /// Together exceeds apart by more than the configured margin
    pub is_worse_together: bool,
    /// Relative difference of together over apart, in percent
    pub delta_percent: f64,
}

/// Co-occurrence analyzer
pub struct CombinationAnalyzer<'a> {
    config: &'a AnalysisConfig,
}

impl Default for CombinationAnalyzer<'static> {
    fn default() -> Self {
        Self::new(AnalysisConfig::global())
    }
}

impl<'a> CombinationAnalyzer<'a> {
    /// Create an analyzer with explicit configuration
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Find combinations, highest together-average first
    ///
    /// Only sets observed as the exact category set of at least two meals are
    /// candidates. Returns an empty list below the minimum record count.
    #[must_use]
    pub fn analyze(&self, records: &[MealRecord]) -> Vec<Combination> {
        let rated = rated_meals(records);
        if rated.len() < self.config.limits.min_records_for_patterns {
            return Vec::new();
        }

        let meal_sets: Vec<(BTreeSet<TriggerCategory>, &RatedMeal<'_>)> =
            rated.iter().map(|m| (m.record.categories(), m)).collect();

        let mut exact_counts: BTreeMap<BTreeSet<TriggerCategory>, u32> = BTreeMap::new();
        for (set, _) in &meal_sets {
            if set.len() >= 2 {
                *exact_counts.entry(set.clone()).or_insert(0) += 1;
            }
        }

        let overall = mean(&rated.iter().map(|m| m.rating).collect::<Vec<_>>()).unwrap_or(0.0);

        let mut combinations: Vec<Combination> = exact_counts
            .into_iter()
            .filter(|(_, count)| *count >= 2)
            .filter_map(|(set, _)| self.evaluate(&set, &meal_sets, overall))
            .collect();

        combinations.sort_by(|a, b| {
            b.avg_bloating_together
                .partial_cmp(&a.avg_bloating_together)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.occurrence_count.cmp(&a.occurrence_count))
                .then_with(|| a.categories.cmp(&b.categories))
        });
        combinations.truncate(self.config.limits.max_combinations);
        combinations
    }

    fn evaluate(
        &self,
        set: &BTreeSet<TriggerCategory>,
        meal_sets: &[(BTreeSet<TriggerCategory>, &RatedMeal<'_>)],
        overall: f64,
    ) -> Option<Combination> {
        let together: Vec<f64> = meal_sets
            .iter()
            .filter(|(meal_set, _)| set.is_subset(meal_set))
            .map(|(_, meal)| meal.rating)
            .collect();
        let avg_together = mean(&together)?;

        // Each member's solo average weighted by its solo meal count
        let mut weighted_sum = 0.0;
        let mut weight = 0.0;
        for category in set {
            let solo: Vec<f64> = meal_sets
                .iter()
                .filter(|(meal_set, _)| meal_set.contains(category) && !set.is_subset(meal_set))
                .map(|(_, meal)| meal.rating)
                .collect();
            if let Some(avg) = mean(&solo) {
                weighted_sum += avg * solo.len() as f64;
                weight += solo.len() as f64;
            }
        }
        let avg_apart = if weight > 0.0 {
            weighted_sum / weight
        } else {
            overall
        };

        let delta_percent = if avg_apart > 0.0 {
            (avg_together - avg_apart) / avg_apart * 100.0
        } else {
            0.0
        };

        Some(Combination {
            categories: set.iter().copied().collect(),
            occurrence_count: together.len() as u32,
            avg_bloating_together: round_to(avg_together, 2),
            avg_bloating_apart: round_to(avg_apart, 2),
            is_worse_together: avg_together > avg_apart + self.config.thresholds.combination_margin,
            delta_percent: round_to(delta_percent, 1),
        })
    }
}
