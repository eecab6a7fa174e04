// ABOUTME: Recommendation engine turning trigger statistics into a ranked action list
// ABOUTME: Produces eliminate, confirm, and reintroduce suggestions capped to the top few
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use crate::combinations::Combination;
use crate::confidence::{ConfidenceTier, TriggerConfidence};
use crate::config::AnalysisConfig;
use crate::statistics::rated_meals;
use chrono::{DateTime, Utc};
use gutsense_core::models::{MealRecord, TriggerCategory};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Suggested action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    /// Stop eating the category
    Eliminate,
    /// Run a deliberate test to confirm the suspicion
    Confirm,
    /// Try the category again under controlled conditions
    Reintroduce,
}

/// Urgency; orders high before medium before low
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    /// Act now
    High,
    /// Worth doing soon
    Medium,
    /// Optional
    Low,
}

/// A single suggested action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Action kind
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    /// Category the action concerns
    pub category: TriggerCategory,
    /// Urgency
    pub priority: RecommendationPriority,
    /// Explanation shown to the user
    pub rationale: String,
    /// Ranking score of the category, used for tie-breaks
    pub impact_score: f64,
}

/// Recommendation engine
pub struct RecommendationEngine<'a> {
    config: &'a AnalysisConfig,
}

impl Default for RecommendationEngine<'static> {
    fn default() -> Self {
        Self::new(AnalysisConfig::global())
    }
}

impl<'a> RecommendationEngine<'a> {
    /// Create an engine with explicit configuration
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Build the ranked, capped recommendation list
    ///
    /// Returns an empty list below the minimum qualifying record count. Each
    /// category appears at most once, under its most urgent recommendation.
    #[must_use]
    pub fn recommend(
        &self,
        records: &[MealRecord],
        confidences: &[TriggerConfidence],
        combinations: &[Combination],
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        if rated_meals(records).len() < self.config.limits.min_records_for_patterns {
            return Vec::new();
        }

        let mut candidates: Vec<Recommendation> = Vec::new();
        for confidence in confidences {
            let partner_note = Self::combination_note(confidence.category, combinations);
            candidates.extend(self.eliminate(confidence, partner_note.as_deref()));
            candidates.extend(self.confirm(confidence, partner_note.as_deref()));
            candidates.extend(self.reintroduce(confidence, now));
        }

        let mut best: HashMap<TriggerCategory, Recommendation> = HashMap::new();
        for candidate in candidates {
            match best.get(&candidate.category) {
                Some(existing) if existing.priority <= candidate.priority => {}
                _ => {
                    best.insert(candidate.category, candidate);
                }
            }
        }

        let mut merged: Vec<Recommendation> = best.into_values().collect();
        merged.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| {
                    b.impact_score
                        .partial_cmp(&a.impact_score)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.category.cmp(&b.category))
        });
        merged.truncate(self.config.limits.max_recommendations);
        merged
    }

    /// High-confidence category the user is still eating
    fn eliminate(
        &self,
        confidence: &TriggerConfidence,
        partner_note: Option<&str>,
    ) -> Option<Recommendation> {
        if confidence.confidence_tier != ConfidenceTier::High
            || confidence.recent_occurrences == 0
            || confidence.avg_bloating_with <= self.config.thresholds.comfortable_max_rating
        {
            return None;
        }

        let mut rationale = format!(
            "{} showed up in {} meals with an average bloating of {:.1}, and you ate it {} time{} this week. Try cutting it out.",
            confidence.category.display_name(),
            confidence.occurrences,
            confidence.avg_bloating_with,
            confidence.recent_occurrences,
            if confidence.recent_occurrences == 1 { "" } else { "s" },
        );
        if let Some(note) = partner_note {
            rationale.push(' ');
            rationale.push_str(note);
        }

        Some(Recommendation {
            recommendation_type: RecommendationType::Eliminate,
            category: confidence.category,
            priority: RecommendationPriority::High,
            rationale,
            impact_score: confidence.ranking_score(),
        })
    }

    /// Category with some evidence, worth a deliberate elimination test
    fn confirm(
        &self,
        confidence: &TriggerConfidence,
        partner_note: Option<&str>,
    ) -> Option<Recommendation> {
        if confidence.confidence_tier != ConfidenceTier::Investigating
            || confidence.avg_bloating_with <= self.config.thresholds.comfortable_max_rating
        {
            return None;
        }

        let mut rationale = format!(
            "{} appeared in {} meals averaging {:.1} bloating. Run an elimination experiment to confirm it.",
            confidence.category.display_name(),
            confidence.occurrences,
            confidence.avg_bloating_with,
        );
        if let Some(note) = partner_note {
            rationale.push(' ');
            rationale.push_str(note);
        }

        Some(Recommendation {
            recommendation_type: RecommendationType::Confirm,
            category: confidence.category,
            priority: RecommendationPriority::Medium,
            rationale,
            impact_score: confidence.ranking_score(),
        })
    }

    /// Previously troublesome category that has been absent long enough to retest
    fn reintroduce(
        &self,
        confidence: &TriggerConfidence,
        now: DateTime<Utc>,
    ) -> Option<Recommendation> {
        let windows = &self.config.windows;
        let days_absent = (now - confidence.last_seen).num_days();
        if days_absent < windows.reintroduce_min_days
            || days_absent > windows.reintroduce_max_days
            || confidence.avg_bloating_with < self.config.thresholds.high_bloating_min_avg
        {
            return None;
        }

        // Past the midpoint of the window the retest becomes more useful
        let midpoint = (windows.reintroduce_min_days + windows.reintroduce_max_days) / 2;
        let priority = if days_absent >= midpoint {
            RecommendationPriority::Medium
        } else {
            RecommendationPriority::Low
        };

        Some(Recommendation {
            recommendation_type: RecommendationType::Reintroduce,
            category: confidence.category,
            priority,
            rationale: format!(
                "You haven't had {} for {} days. It used to average {:.1} bloating, so try a small portion on a calm day and rate how you feel.",
                confidence.category.display_name().to_lowercase(),
                days_absent,
                confidence.avg_bloating_with,
            ),
            impact_score: confidence.ranking_score(),
        })
    }

    fn combination_note(
        category: TriggerCategory,
        combinations: &[Combination],
    ) -> Option<String> {
        let combination = combinations
            .iter()
            .find(|c| c.is_worse_together && c.categories.contains(&category))?;
        let partners: Vec<&str> = combination
            .categories
            .iter()
            .filter(|c| **c != category)
            .map(|c| c.display_name())
            .collect();
        Some(format!(
            "It is worse when combined with {}.",
            partners.join(" and ")
        ))
    }
}
