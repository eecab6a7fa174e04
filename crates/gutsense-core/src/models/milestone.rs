// ABOUTME: Persisted five-tier progression state, one aggregate per user
// ABOUTME: Per-tier sub-state, usage totals, active experiment, and cached generated content
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use super::{Experiment, TriggerCategory};
use crate::constants::tiers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tier 1: getting started
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundationProgress {
    /// At least one meal logged
    pub first_meal_logged: bool,
    /// At least one rating completed
    pub first_meal_rated: bool,
    /// Three ratings completed
    pub three_meals_completed: bool,
    /// Pattern detection available (unlocks tier 2)
    pub pattern_detection_unlocked: bool,
}

/// Category snapshotted as the suspected trigger when experiments unlock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspectedTrigger {
    /// Category id
    pub category: TriggerCategory,
    /// Display name at the time of the snapshot
    pub name: String,
    /// Enhanced impact score at the time of the snapshot
    pub impact_score: f64,
}

/// Tier 2: three consecutive logging days
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternProgress {
    /// First logging day reached
    pub day1_complete: bool,
    /// Two consecutive logging days reached
    pub day2_complete: bool,
    /// Three consecutive logging days reached
    pub day3_complete: bool,
    /// Top-impact category when experiments unlocked
    pub suspected_trigger: Option<SuspectedTrigger>,
    /// Experiments available (unlocks tier 3)
    pub experiments_unlocked: bool,
}

/// Tier 3: elimination experiments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentProgress {
    /// The single active experiment, if any
    pub current_experiment: Option<Experiment>,
    /// Append-only history of completed experiments
    pub completed_experiments: Vec<Experiment>,
    /// At least one experiment completed
    pub first_experiment_completed: bool,
    /// At least one experiment confirmed a trigger
    pub causality_confirmed: bool,
}

/// Tier 4: weekly baseline and AI guide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineProgress {
    /// Unique logging days counted toward the baseline, capped at seven
    pub days_completed: u32,
    /// Seven unique logging days reached
    pub weekly_baseline_complete: bool,
    /// AI guide generation available
    pub ai_guide_unlocked: bool,
    /// Generated guide, stored verbatim once delivered
    pub ai_guide: Option<String>,
}

/// Tier 5: long-term tracking and blueprint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryProgress {
    /// Days elapsed since the first record
    pub current_day: u32,
    /// 30-day checkpoint reached
    pub day30_complete: bool,
    /// 60-day checkpoint reached
    pub day60_complete: bool,
    /// 90-day checkpoint reached
    pub day90_complete: bool,
    /// Blueprint generation available
    pub blueprint_unlocked: bool,
    /// Generated blueprint, stored verbatim once delivered
    pub blueprint: Option<String>,
}

/// Persisted progression aggregate for one user
///
/// Flags only ever move from `false` to `true`, so the tier derived from them
/// never regresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneState {
    /// Highest tier whose unlock condition holds (1-5)
    pub current_tier: u8,
    /// Tier 1 sub-state
    pub tier1: FoundationProgress,
    /// Tier 2 sub-state
    pub tier2: PatternProgress,
    /// Tier 3 sub-state
    pub tier3: ExperimentProgress,
    /// Tier 4 sub-state
    pub tier4: BaselineProgress,
    /// Tier 5 sub-state
    pub tier5: MasteryProgress,
    /// Meals logged
    pub total_meals_logged: u32,
    /// Meals rated
    pub total_meals_rated: u32,
    /// Consecutive logging days ending at the latest logging day
    pub current_streak: u32,
    /// Longest consecutive logging-day run ever observed
    pub longest_streak: u32,
    /// Last time the state changed
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for MilestoneState {
    fn default() -> Self {
        Self {
            current_tier: tiers::FOUNDATION,
            tier1: FoundationProgress::default(),
            tier2: PatternProgress::default(),
            tier3: ExperimentProgress::default(),
            tier4: BaselineProgress::default(),
            tier5: MasteryProgress::default(),
            total_meals_logged: 0,
            total_meals_rated: 0,
            current_streak: 0,
            longest_streak: 0,
            updated_at: None,
        }
    }
}

impl MilestoneState {
    /// Whether the tier's unlock condition currently holds
    #[must_use]
    pub fn tier_condition_holds(&self, tier: u8) -> bool {
        match tier {
            tiers::FOUNDATION => true,
            tiers::PATTERNS => self.tier1.pattern_detection_unlocked,
            tiers::EXPERIMENTS => self.tier2.experiments_unlocked,
            tiers::AI_GUIDE => {
                self.tier3.first_experiment_completed && self.tier4.weekly_baseline_complete
            }
            tiers::MASTERY => self.tier4.ai_guide_unlocked,
            _ => false,
        }
    }

    /// Highest tier whose unlock condition holds, walking the gates in order
    #[must_use]
    pub fn derived_tier(&self) -> u8 {
        (tiers::FOUNDATION..=tiers::MASTERY)
            .take_while(|tier| self.tier_condition_holds(*tier))
            .last()
            .unwrap_or(tiers::FOUNDATION)
    }

    /// Active experiment, if any
    #[must_use]
    pub const fn active_experiment(&self) -> Option<&Experiment> {
        self.tier3.current_experiment.as_ref()
    }
}
