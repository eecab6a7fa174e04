// ABOUTME: Single-subject elimination experiment model persisted inside milestone state
// ABOUTME: Baseline control meals, trial meal, and before/after outcome classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use super::TriggerCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Outcome of a completed experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentResult {
    /// Symptoms dropped significantly without the category
    TriggerConfirmed,
    /// Symptoms rose significantly without the category
    TriggerCleared,
    /// No significant change, or no baseline to compare against
    Inconclusive,
}

impl fmt::Display for ExperimentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TriggerConfirmed => write!(f, "trigger_confirmed"),
            Self::TriggerCleared => write!(f, "trigger_cleared"),
            Self::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

/// An elimination test for one suspected category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment identifier
    pub id: Uuid,
    /// Category under test
    pub trigger_category: TriggerCategory,
    /// User-facing name of the suspected trigger
    pub trigger_name: String,
    /// What the user expects to learn
    pub hypothesis: String,
    /// When the experiment was started
    pub started_at: DateTime<Utc>,
    /// Most recent rated meals containing the category, newest first
    pub control_meal_ids: Vec<String>,
    /// Mean rating of the control meals; `None` when there were none
    pub bloating_with_trigger: Option<f64>,
    /// Meal eaten without the category
    pub experiment_meal_id: Option<String>,
    /// Rating of the trial meal
    pub bloating_without_trigger: Option<f64>,
    /// When the trial rating was recorded
    pub completed_at: Option<DateTime<Utc>>,
    /// Outcome, set on completion
    pub result: Option<ExperimentResult>,
    /// Relative drop from baseline to trial, in percent
    pub percentage_change: Option<f64>,
    /// Human-readable summary of the outcome
    pub result_explanation: Option<String>,
}

impl Experiment {
    /// Whether the experiment has been completed
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
