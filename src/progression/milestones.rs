// ABOUTME: Five-tier milestone reducer turning usage counters into unlocked capabilities
// ABOUTME: Pure (state, usage, now) -> (state, events); idempotent and monotonic by construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

//! # Milestone State Machine
//!
//! Tiers are strictly sequential gates. A tier's conditions are evaluated
//! only once the previous tier's unlock condition holds, so a single sync
//! over a long history may cross several gates in order but never skips one.
//!
//! | Tier | Unlock condition |
//! |------|------------------|
//! | 1 | always |
//! | 2 | three completed ratings (pattern detection) |
//! | 3 | three consecutive logging days (experiments) |
//! | 4 | first experiment completed and seven-day baseline |
//! | 5 | AI guide generation unlocked (long-term tracking) |
//!
//! The AI guide unlocks on the same sync that opens tier 4, so tiers 4 and 5
//! are crossed together. Whether the external service ever delivers the
//! guide text has no bearing on progression.
//!
//! Every flag only ever moves from `false` to `true` and each crossing emits
//! exactly one event, so re-running the reducer on unchanged input returns
//! the same state and no events.

use super::usage::UsageSnapshot;
use chrono::{DateTime, Utc};
use gutsense_core::constants::{milestones, tiers};
use gutsense_core::models::{MilestoneEvent, MilestoneEventType, MilestoneState};
use tracing::info;

/// Apply usage counters to the persisted state
///
/// `updated_at` is only touched when something else changed.
#[must_use]
pub fn reduce(
    state: MilestoneState,
    usage: &UsageSnapshot,
    now: DateTime<Utc>,
) -> (MilestoneState, Vec<MilestoneEvent>) {
    let before = state.clone();
    let mut next = state;
    let mut events = Vec::new();

    update_totals(&mut next, usage);
    foundation(&mut next, usage, &mut events);
    if next.tier1.pattern_detection_unlocked {
        patterns(&mut next, usage, &mut events);
    }
    if next.tier2.experiments_unlocked {
        baseline(&mut next, usage, &mut events);
    }
    advance_tier(&mut next, &mut events);
    if next.tier_condition_holds(tiers::MASTERY) {
        mastery(&mut next, usage, &mut events);
    }

    if next != before {
        next.updated_at = Some(now);
    }
    (next, events)
}

/// Raise `current_tier` to the derived tier, never lowering it
///
/// The final tier has no sub-state flag of its own, so its unlock event is
/// emitted here.
fn advance_tier(state: &mut MilestoneState, events: &mut Vec<MilestoneEvent>) {
    let derived = state.derived_tier();
    if derived <= state.current_tier {
        return;
    }
    if derived == tiers::MASTERY {
        events.push(MilestoneEvent::new(
            MilestoneEventType::TierUnlock,
            "long_term_tracking",
            "Long-term tracking unlocked",
            "Keep logging to reach the 30, 60 and 90 day checkpoints.",
            tiers::MASTERY,
        ));
    }
    info!(from = state.current_tier, to = derived, "tier advanced");
    state.current_tier = derived;
}

fn update_totals(state: &mut MilestoneState, usage: &UsageSnapshot) {
    state.total_meals_logged = usage.total_meals;
    state.total_meals_rated = usage.completed_meals;
    state.current_streak = usage.current_day_run;
    state.longest_streak = state.longest_streak.max(usage.longest_day_run);
}

fn foundation(state: &mut MilestoneState, usage: &UsageSnapshot, events: &mut Vec<MilestoneEvent>) {
    let tier1 = &mut state.tier1;

    if !tier1.first_meal_logged && usage.total_meals >= 1 {
        tier1.first_meal_logged = true;
        events.push(MilestoneEvent::new(
            MilestoneEventType::MilestoneComplete,
            "first_meal",
            "First meal logged",
            "You logged your first meal.",
            tiers::FOUNDATION,
        ));
    }

    if !tier1.first_meal_rated && usage.completed_meals >= 1 {
        tier1.first_meal_rated = true;
        events.push(MilestoneEvent::new(
            MilestoneEventType::MilestoneComplete,
            "first_rating",
            "First meal rated",
            "You rated how a meal made you feel.",
            tiers::FOUNDATION,
        ));
    }

    if !tier1.three_meals_completed
        && usage.completed_meals >= milestones::MEALS_FOR_PATTERN_DETECTION
    {
        tier1.three_meals_completed = true;
        tier1.pattern_detection_unlocked = true;
        info!(tier = tiers::PATTERNS, "pattern detection unlocked");
        events.push(MilestoneEvent::new(
            MilestoneEventType::TierUnlock,
            "three_meals",
            "Pattern detection unlocked",
            "Three rated meals are in. Trigger patterns will start to appear as you log.",
            tiers::PATTERNS,
        ));
    }
}

fn patterns(state: &mut MilestoneState, usage: &UsageSnapshot, events: &mut Vec<MilestoneEvent>) {
    let run = state.longest_streak;
    let tier2 = &mut state.tier2;

    if !tier2.day1_complete && run >= 1 {
        tier2.day1_complete = true;
        events.push(MilestoneEvent::new(
            MilestoneEventType::MilestoneComplete,
            "day1",
            "Day 1 complete",
            "First day of logging done.",
            tiers::PATTERNS,
        ));
    }

    if !tier2.day2_complete && run >= 2 {
        tier2.day2_complete = true;
        events.push(MilestoneEvent::new(
            MilestoneEventType::MilestoneComplete,
            "day2",
            "Day 2 complete",
            "Two consecutive days of logging.",
            tiers::PATTERNS,
        ));
    }

    if !tier2.day3_complete && run >= milestones::CONSECUTIVE_DAYS_FOR_EXPERIMENTS {
        tier2.day3_complete = true;
        tier2.experiments_unlocked = true;
        tier2.suspected_trigger.clone_from(&usage.top_trigger);
        let description = tier2.suspected_trigger.as_ref().map_or_else(
            || "Three days in a row. You can now run elimination experiments.".to_owned(),
            |trigger| {
                format!(
                    "Three days in a row. {} is your top suspect, try an elimination experiment.",
                    trigger.name
                )
            },
        );
        info!(
            tier = tiers::EXPERIMENTS,
            suspected = ?tier2.suspected_trigger.as_ref().map(|t| t.category),
            "experiments unlocked"
        );
        events.push(MilestoneEvent::new(
            MilestoneEventType::TierUnlock,
            "day3",
            "Experiments unlocked",
            description,
            tiers::EXPERIMENTS,
        ));
    }
}

fn baseline(state: &mut MilestoneState, usage: &UsageSnapshot, events: &mut Vec<MilestoneEvent>) {
    let first_experiment_completed = state.tier3.first_experiment_completed;
    let tier4 = &mut state.tier4;

    tier4.days_completed = tier4
        .days_completed
        .max(usage.unique_logging_days.min(milestones::BASELINE_UNIQUE_DAYS));

    if !tier4.weekly_baseline_complete && tier4.days_completed >= milestones::BASELINE_UNIQUE_DAYS {
        tier4.weekly_baseline_complete = true;
        events.push(MilestoneEvent::new(
            MilestoneEventType::MilestoneComplete,
            "weekly_baseline",
            "Weekly baseline complete",
            "Seven days of logging give a personal baseline to compare against.",
            tiers::AI_GUIDE,
        ));
    }

    if !tier4.ai_guide_unlocked && tier4.weekly_baseline_complete && first_experiment_completed {
        tier4.ai_guide_unlocked = true;
        info!(tier = tiers::AI_GUIDE, "AI guide unlocked");
        events.push(MilestoneEvent::new(
            MilestoneEventType::TierUnlock,
            "ai_guide",
            "AI guide unlocked",
            "Your baseline and first experiment are done. A personal guide can now be generated.",
            tiers::AI_GUIDE,
        ));
    }
}

fn mastery(state: &mut MilestoneState, usage: &UsageSnapshot, events: &mut Vec<MilestoneEvent>) {
    let tier5 = &mut state.tier5;
    tier5.current_day = tier5.current_day.max(usage.days_since_first_entry);
    let elapsed = i64::from(tier5.current_day);

    if !tier5.day30_complete && elapsed >= milestones::DAY_30 {
        tier5.day30_complete = true;
        events.push(MilestoneEvent::new(
            MilestoneEventType::MilestoneComplete,
            "day30",
            "30 days of tracking",
            "A month of data. Your trigger picture is getting sharper.",
            tiers::MASTERY,
        ));
    }

    if tier5.day30_complete && !tier5.day60_complete && elapsed >= milestones::DAY_60 {
        tier5.day60_complete = true;
        events.push(MilestoneEvent::new(
            MilestoneEventType::MilestoneComplete,
            "day60",
            "60 days of tracking",
            "Two months of data. Long-term trends are now reliable.",
            tiers::MASTERY,
        ));
    }

    if tier5.day60_complete && !tier5.day90_complete && elapsed >= milestones::DAY_90 {
        tier5.day90_complete = true;
        tier5.blueprint_unlocked = true;
        info!(tier = tiers::MASTERY, "blueprint unlocked");
        events.push(MilestoneEvent::new(
            MilestoneEventType::TierUnlock,
            "day90",
            "Blueprint unlocked",
            "Ninety days of tracking. Your personal food blueprint can now be generated.",
            tiers::MASTERY,
        ));
    }
}
