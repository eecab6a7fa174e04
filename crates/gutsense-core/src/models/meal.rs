// ABOUTME: Meal record model as delivered by the external record store
// ABOUTME: Rating status, detected trigger tags, and qualifying-record helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use super::TriggerCategory;
use crate::constants::rating;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Whether the post-meal symptom rating has been collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingStatus {
    /// Logged, waiting for the user to rate
    #[default]
    Pending,
    /// Rated
    Completed,
    /// User declined to rate
    Skipped,
}

/// A food tag produced by the upstream ingredient tagger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedTrigger {
    /// Raw category tag; resolved through [`TriggerCategory::resolve`]
    pub category: String,
    /// Food the tag was derived from
    pub food: String,
    /// Tagger confidence, 0-1
    #[serde(default)]
    pub confidence: f64,
}

impl DetectedTrigger {
    /// Resolved category, `None` for tags outside the taxonomy
    #[must_use]
    pub fn resolved_category(&self) -> Option<TriggerCategory> {
        TriggerCategory::resolve(&self.category)
    }
}

/// A logged meal
///
/// Owned by the external record store; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    /// Opaque record identifier
    pub id: String,
    /// When the meal was logged
    pub created_at: DateTime<Utc>,
    /// Rating collection status
    #[serde(default)]
    pub rating_status: RatingStatus,
    /// Bloating rating on the 1-5 scale
    #[serde(default)]
    pub bloating_rating: Option<u8>,
    /// Trigger tags detected in the meal
    #[serde(default)]
    pub detected_triggers: Vec<DetectedTrigger>,
    /// Optional meal title
    #[serde(default)]
    pub title: Option<String>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl MealRecord {
    /// Create an unrated record with no tags
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            rating_status: RatingStatus::Pending,
            bloating_rating: None,
            detected_triggers: Vec::new(),
            title: None,
            notes: None,
        }
    }

    /// Mark the record as rated with the given score
    #[must_use]
    pub fn rated(mut self, bloating_rating: u8) -> Self {
        self.rating_status = RatingStatus::Completed;
        self.bloating_rating = Some(bloating_rating);
        self
    }

    /// Mark the record as skipped
    #[must_use]
    pub fn skipped(mut self) -> Self {
        self.rating_status = RatingStatus::Skipped;
        self.bloating_rating = None;
        self
    }

    /// Add a detected trigger tag
    #[must_use]
    pub fn with_trigger(mut self, category: impl Into<String>, food: impl Into<String>) -> Self {
        self.detected_triggers.push(DetectedTrigger {
            category: category.into(),
            food: food.into(),
            confidence: 1.0,
        });
        self
    }

    /// Attach notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Rating usable for analysis
    ///
    /// Only completed records with a rating on the 1-5 scale qualify;
    /// everything else contributes zero weight.
    #[must_use]
    pub fn qualifying_rating(&self) -> Option<f64> {
        match (self.rating_status, self.bloating_rating) {
            (RatingStatus::Completed, Some(value)) if rating::is_valid(value) => {
                Some(f64::from(value))
            }
            _ => None,
        }
    }

    /// Whether the record takes part in rating-based analysis
    #[must_use]
    pub fn is_qualifying(&self) -> bool {
        self.qualifying_rating().is_some()
    }

    /// Distinct resolved categories in this meal
    ///
    /// Several foods of the same category count once.
    #[must_use]
    pub fn categories(&self) -> BTreeSet<TriggerCategory> {
        self.detected_triggers
            .iter()
            .filter_map(DetectedTrigger::resolved_category)
            .collect()
    }

    /// Whether the meal contains the category
    #[must_use]
    pub fn contains(&self, category: TriggerCategory) -> bool {
        self.detected_triggers
            .iter()
            .any(|t| t.resolved_category() == Some(category))
    }

    /// Food names tagged with the category
    pub fn foods_in(&self, category: TriggerCategory) -> impl Iterator<Item = &str> {
        self.detected_triggers
            .iter()
            .filter(move |t| t.resolved_category() == Some(category))
            .map(|t| t.food.as_str())
    }

    /// UTC calendar day the meal was logged on
    #[must_use]
    pub fn logged_day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}
