// ABOUTME: Per-category confidence model converting rated meals into trigger impact scores
// ABOUTME: Computes occurrence statistics, confidence tiers, and bounded enhanced impact scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors
#![allow(clippy::cast_precision_loss)] // Safe: counts are far below f64 precision limits

use crate::config::AnalysisConfig;
use crate::statistics::{mean, rated_meals, round_to, std_dev, within_last_days, RatedMeal};
use chrono::{DateTime, Utc};
use gutsense_core::models::{MealRecord, TriggerCategory};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// How much evidence backs a category's statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// A single occurrence
    NeedsData,
    /// A few occurrences, worth a deliberate test
    Investigating,
    /// Enough occurrences to act on
    High,
}

/// Derived statistics for one category; recomputed on every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfidence {
    /// Category
    pub category: TriggerCategory,
    /// Evidence tier
    pub confidence_tier: ConfidenceTier,
    /// Distinct rated meals containing the category
    pub occurrences: u32,
    /// Share of rated meals containing the category, 0-100
    pub percentage_of_meals: u32,
    /// Mean rating of meals containing the category
    pub avg_bloating_with: f64,
    /// Mean rating of meals without the category
    pub avg_bloating_without: f64,
    /// Baseline difference scaled by log frequency
    pub impact_score: f64,
    /// Impact score after the bounded multipliers; `None` if not computable
    pub enhanced_impact_score: Option<f64>,
    /// Multiplier rewarding tightly clustered ratings
    pub consistency_factor: f64,
    /// Saturating multiplier for occurrence count
    pub frequency_weight: f64,
    /// Multiplier for recent occurrences
    pub recency_boost: f64,
    /// Multiplier relative to the user's own average rating
    pub personal_baseline_adjustment: f64,
    /// Occurrences in the recent window
    pub recent_occurrences: u32,
    /// Most frequent food names, most frequent first
    pub top_foods: Vec<String>,
    /// Most recent rated meal containing the category
    pub last_seen: DateTime<Utc>,
}

impl TriggerConfidence {
    /// Score used for ranking
    #[must_use]
    pub fn ranking_score(&self) -> f64 {
        self.enhanced_impact_score.unwrap_or(self.impact_score)
    }
}

/// Confidence model over the full record set
pub struct ConfidenceModel<'a> {
    config: &'a AnalysisConfig,
}

impl Default for ConfidenceModel<'static> {
    fn default() -> Self {
        Self::new(AnalysisConfig::global())
    }
}

impl<'a> ConfidenceModel<'a> {
    /// Create a model with explicit configuration
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Map an occurrence count to its evidence tier
    #[must_use]
    pub fn tier_for(&self, occurrences: u32) -> ConfidenceTier {
        let limits = &self.config.limits;
        if occurrences >= limits.high_confidence_occurrences {
            ConfidenceTier::High
        } else if occurrences >= limits.investigating_min_occurrences {
            ConfidenceTier::Investigating
        } else {
            ConfidenceTier::NeedsData
        }
    }

    /// Compute per-category statistics, sorted by descending ranking score
    ///
    /// Returns an empty list when no record qualifies.
    #[must_use]
    pub fn analyze(&self, records: &[MealRecord], now: DateTime<Utc>) -> Vec<TriggerConfidence> {
        let rated = rated_meals(records);
        if rated.is_empty() {
            return Vec::new();
        }

        let all_ratings: Vec<f64> = rated.iter().map(|m| m.rating).collect();
        let overall_avg = mean(&all_ratings).unwrap_or(0.0);

        let mut by_category: BTreeMap<TriggerCategory, Vec<&RatedMeal<'_>>> = BTreeMap::new();
        for meal in &rated {
            let categories = meal.record.categories();
            if categories.is_empty() && !meal.record.detected_triggers.is_empty() {
                debug!(
                    meal_id = %meal.record.id,
                    "no detected trigger resolved to a known category"
                );
            }
            for category in categories {
                by_category.entry(category).or_default().push(meal);
            }
        }

        let mut results: Vec<TriggerConfidence> = by_category
            .into_iter()
            .map(|(category, meals)| {
                self.category_statistics(category, &meals, &rated, overall_avg, now)
            })
            .collect();

        results.sort_by(|a, b| {
            b.ranking_score()
                .partial_cmp(&a.ranking_score())
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.occurrences.cmp(&a.occurrences))
                .then_with(|| a.category.cmp(&b.category))
        });
        results
    }

    fn category_statistics(
        &self,
        category: TriggerCategory,
        meals_with: &[&RatedMeal<'_>],
        all_meals: &[RatedMeal<'_>],
        overall_avg: f64,
        now: DateTime<Utc>,
    ) -> TriggerConfidence {
        let occurrences = meals_with.len() as u32;
        let total = all_meals.len() as f64;

        let with_ratings: Vec<f64> = meals_with.iter().map(|m| m.rating).collect();
        let without_ratings: Vec<f64> = all_meals
            .iter()
            .filter(|m| !m.record.contains(category))
            .map(|m| m.rating)
            .collect();

        let avg_with = mean(&with_ratings).unwrap_or(0.0);
        let avg_without = mean(&without_ratings).unwrap_or(overall_avg);

        let percentage_of_meals = ((f64::from(occurrences) / total) * 100.0)
            .round()
            .clamp(0.0, 100.0) as u32;

        let impact_score = (avg_with - avg_without) * f64::from(occurrences).ln_1p();

        let recent_window = self.config.windows.recent_days;
        let recent_occurrences = meals_with
            .iter()
            .filter(|m| within_last_days(m.record.created_at, now, recent_window))
            .count() as u32;

        let consistency_factor = self.consistency_factor(&with_ratings);
        let frequency_weight = self.frequency_weight(occurrences);
        let recency_boost = self.recency_boost(recent_occurrences, occurrences);
        let personal_baseline_adjustment = self.personal_baseline_adjustment(avg_with, overall_avg);

        let enhanced = impact_score
            * consistency_factor
            * frequency_weight
            * recency_boost
            * personal_baseline_adjustment;
        let enhanced_impact_score = enhanced.is_finite().then(|| round_to(enhanced, 3));

        let last_seen = meals_with
            .iter()
            .map(|m| m.record.created_at)
            .max()
            .unwrap_or(now);

        TriggerConfidence {
            category,
            confidence_tier: self.tier_for(occurrences),
            occurrences,
            percentage_of_meals,
            avg_bloating_with: round_to(avg_with, 2),
            avg_bloating_without: round_to(avg_without, 2),
            impact_score: round_to(impact_score, 3),
            enhanced_impact_score,
            consistency_factor: round_to(consistency_factor, 3),
            frequency_weight: round_to(frequency_weight, 3),
            recency_boost: round_to(recency_boost, 3),
            personal_baseline_adjustment: round_to(personal_baseline_adjustment, 3),
            recent_occurrences,
            top_foods: self.top_foods(category, meals_with),
            last_seen,
        }
    }

    /// Low spread boosts the score; a single rating is neutral
    fn consistency_factor(&self, ratings: &[f64]) -> f64 {
        let w = &self.config.weights;
        if ratings.len() < 2 {
            return 1.0_f64.clamp(w.consistency_min, w.consistency_max);
        }
        // Spread of 2 rating points or more is treated as fully inconsistent
        let spread = std_dev(ratings).unwrap_or(0.0) / 2.0;
        let factor = w.consistency_max - (w.consistency_max - w.consistency_min) * spread.min(1.0);
        factor.clamp(w.consistency_min, w.consistency_max)
    }

    /// Saturating curve from `frequency_min` toward `frequency_max`
    fn frequency_weight(&self, occurrences: u32) -> f64 {
        let w = &self.config.weights;
        let saturation = 1.0 - (-f64::from(occurrences) / w.frequency_saturation).exp();
        (w.frequency_min + (w.frequency_max - w.frequency_min) * saturation)
            .clamp(w.frequency_min, w.frequency_max)
    }

    fn recency_boost(&self, recent: u32, occurrences: u32) -> f64 {
        if occurrences == 0 {
            return 1.0;
        }
        let share = f64::from(recent) / f64::from(occurrences);
        1.0 + self.config.weights.recency_max_boost * share.clamp(0.0, 1.0)
    }

    /// Scale by how far this category sits above or below the user's own average
    fn personal_baseline_adjustment(&self, avg_with: f64, overall_avg: f64) -> f64 {
        let w = &self.config.weights;
        if overall_avg <= 0.0 {
            return 1.0;
        }
        let relative = (avg_with - overall_avg) / overall_avg;
        (1.0 + relative * w.baseline_sensitivity).clamp(w.baseline_min, w.baseline_max)
    }

    fn top_foods(&self, category: TriggerCategory, meals: &[&RatedMeal<'_>]) -> Vec<String> {
        // Counted case-insensitively, first spelling seen is kept
        let mut counts: HashMap<String, (String, u32)> = HashMap::new();
        for meal in meals {
            for food in meal.record.foods_in(category) {
                let trimmed = food.trim();
                if trimmed.is_empty() {
                    continue;
                }
                counts
                    .entry(trimmed.to_lowercase())
                    .or_insert_with(|| (trimmed.to_owned(), 0))
                    .1 += 1;
            }
        }

        let mut ranked: Vec<(String, String, u32)> = counts
            .into_iter()
            .map(|(key, (name, count))| (key, name, count))
            .collect();
        ranked.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .take(self.config.limits.top_foods_per_category)
            .map(|(_, name, _)| name)
            .collect()
    }
}
