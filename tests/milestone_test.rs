// ABOUTME: Integration tests for the five-tier milestone reducer
// ABOUTME: Covers sequential gates, idempotence, monotonicity, and generated-content unlocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use common::{now, rated, unrated};
use gutsense::errors::ErrorCode;
use gutsense::models::{
    MilestoneEvent, MilestoneEventType, MilestoneState, SuspectedTrigger, TriggerCategory,
};
use gutsense::progression::{reduce, store_ai_guide, store_blueprint, UsageSnapshot};

fn usage(completed: u32, run: u32, unique_days: u32, days_since_first: u32) -> UsageSnapshot {
    UsageSnapshot {
        total_meals: completed.max(1),
        completed_meals: completed,
        unique_logging_days: unique_days,
        longest_day_run: run,
        current_day_run: run,
        days_since_first_entry: days_since_first,
        top_trigger: Some(SuspectedTrigger {
            category: TriggerCategory::Dairy,
            name: "Dairy".to_owned(),
            impact_score: 2.5,
        }),
    }
}

fn ids(events: &[MilestoneEvent]) -> Vec<&str> {
    events.iter().map(|e| e.milestone_id.as_str()).collect()
}

#[test]
fn test_empty_usage_changes_nothing() {
    let (state, events) = reduce(MilestoneState::default(), &UsageSnapshot::default(), now());
    assert!(events.is_empty());
    assert_eq!(state, MilestoneState::default());
    assert!(state.updated_at.is_none());
}

#[test]
fn test_three_logged_one_rated() {
    let records = vec![
        rated("1", 0, 3, &["dairy"]),
        unrated("2", 0, &["gluten"]),
        unrated("3", 0, &[]),
    ];
    let snapshot = UsageSnapshot::from_records(&records, &[], now());
    assert_eq!(snapshot.total_meals, 3);
    assert_eq!(snapshot.completed_meals, 1);

    let (state, events) = reduce(MilestoneState::default(), &snapshot, now());
    assert_eq!(ids(&events), vec!["first_meal", "first_rating"]);
    assert!(events
        .iter()
        .all(|e| e.event_type == MilestoneEventType::MilestoneComplete));
    assert!(state.tier1.first_meal_logged);
    assert!(state.tier1.first_meal_rated);
    assert!(!state.tier1.three_meals_completed);
    assert!(!state.tier1.pattern_detection_unlocked);
    assert_eq!(state.current_tier, 1);
    assert_eq!(state.updated_at, Some(now()));
}

#[test]
fn test_first_meal_fires_before_any_rating() {
    let records = vec![unrated("1", 0, &[])];
    let snapshot = UsageSnapshot::from_records(&records, &[], now());
    let (state, events) = reduce(MilestoneState::default(), &snapshot, now());
    assert_eq!(ids(&events), vec!["first_meal"]);
    assert!(!state.tier1.first_meal_rated);
}

#[test]
fn test_gates_are_sequential() {
    // Plenty of logging days but no ratings: tier 2 conditions are not evaluated
    let mut snapshot = usage(0, 10, 10, 100);
    snapshot.total_meals = 10;
    let (state, events) = reduce(MilestoneState::default(), &snapshot, now());

    assert_eq!(ids(&events), vec!["first_meal"]);
    assert!(!state.tier2.day1_complete);
    assert!(!state.tier2.experiments_unlocked);
    assert_eq!(state.tier4.days_completed, 0);
    assert_eq!(state.current_tier, 1);
}

#[test]
fn test_long_history_crosses_gates_in_order() {
    let (state, events) = reduce(MilestoneState::default(), &usage(10, 10, 10, 10), now());

    assert_eq!(
        ids(&events),
        vec![
            "first_meal",
            "first_rating",
            "three_meals",
            "day1",
            "day2",
            "day3",
            "weekly_baseline"
        ]
    );
    let unlocks: Vec<u8> = events
        .iter()
        .filter(|e| e.event_type == MilestoneEventType::TierUnlock)
        .map(|e| e.tier)
        .collect();
    assert_eq!(unlocks, vec![2, 3]);

    assert_eq!(state.current_tier, 3);
    assert_eq!(
        state.tier2.suspected_trigger.as_ref().map(|t| t.category),
        Some(TriggerCategory::Dairy)
    );
    assert!(state.tier4.weekly_baseline_complete);
    assert_eq!(state.tier4.days_completed, 7);
    // Baseline alone does not unlock the guide
    assert!(!state.tier4.ai_guide_unlocked);
}

#[test]
fn test_consecutive_run_required_for_experiments() {
    // Three unique days that are not consecutive
    let (state, events) = reduce(MilestoneState::default(), &usage(5, 1, 3, 10), now());
    assert!(ids(&events).contains(&"day1"));
    assert!(!state.tier2.day2_complete);
    assert!(!state.tier2.experiments_unlocked);
    assert_eq!(state.current_tier, 2);
}

#[test]
fn test_reduce_is_idempotent() {
    let snapshot = usage(10, 10, 10, 10);
    let (first, _) = reduce(MilestoneState::default(), &snapshot, now());
    let (second, events) = reduce(first.clone(), &snapshot, now() + Duration::hours(1));

    assert!(events.is_empty());
    assert_eq!(second, first);
}

#[test]
fn test_tier_is_monotonic() {
    let sequence = [
        usage(1, 1, 1, 0),
        usage(3, 2, 2, 1),
        usage(4, 3, 3, 2),
        // Records deleted upstream: counters drop
        usage(1, 1, 1, 2),
        usage(0, 0, 0, 0),
        usage(8, 4, 8, 9),
    ];

    let mut state = MilestoneState::default();
    let mut previous_tier = state.current_tier;
    for snapshot in &sequence {
        let (next, _) = reduce(state, snapshot, now());
        assert!(next.current_tier >= previous_tier);
        previous_tier = next.current_tier;
        state = next;
    }

    assert_eq!(state.current_tier, 3);
    assert!(state.tier1.three_meals_completed);
    assert_eq!(state.longest_streak, 4);
}

#[test]
fn test_ai_guide_needs_experiment_and_baseline() {
    let snapshot = usage(10, 10, 10, 10);
    let (mut state, _) = reduce(MilestoneState::default(), &snapshot, now());
    assert!(!state.tier4.ai_guide_unlocked);
    assert_eq!(state.current_tier, 3);

    state.tier3.first_experiment_completed = true;
    let (state, events) = reduce(state, &snapshot, now());
    assert_eq!(ids(&events), vec!["ai_guide", "long_term_tracking"]);
    assert_eq!(events[0].event_type, MilestoneEventType::TierUnlock);
    assert_eq!(events[0].tier, 4);
    assert_eq!(events[1].event_type, MilestoneEventType::TierUnlock);
    assert_eq!(events[1].tier, 5);
    assert_eq!(state.current_tier, 5);
    assert!(state.tier4.ai_guide_unlocked);
    assert!(state.tier4.ai_guide.is_none());
}

#[test]
fn test_checkpoints_do_not_wait_for_guide_delivery() {
    let snapshot = usage(100, 100, 100, 120);
    let (mut state, _) = reduce(MilestoneState::default(), &snapshot, now());
    state.tier3.first_experiment_completed = true;

    let (state, events) = reduce(state, &snapshot, now());
    assert_eq!(
        ids(&events),
        vec!["ai_guide", "long_term_tracking", "day30", "day60", "day90"]
    );
    assert_eq!(state.current_tier, 5);
    assert!(state.tier5.day30_complete);
    assert!(state.tier5.day90_complete);
    assert!(state.tier5.blueprint_unlocked);
    assert!(state.tier4.ai_guide.is_none());

    let (again, events) = reduce(state.clone(), &snapshot, now());
    assert!(events.is_empty());
    assert_eq!(again, state);
}

#[test]
fn test_guide_delivery_is_stored_without_changing_tier() {
    let snapshot = usage(10, 10, 10, 10);
    let (mut state, _) = reduce(MilestoneState::default(), &snapshot, now());
    state.tier3.first_experiment_completed = true;
    let (mut state, _) = reduce(state, &snapshot, now());
    assert_eq!(state.current_tier, 5);

    let stored = store_ai_guide(&mut state, "Avoid dairy after 6pm.").unwrap();
    assert_eq!(ids(&stored.events), vec!["ai_guide_ready"]);
    assert_eq!(stored.events[0].event_type, MilestoneEventType::AiGuideReady);
    assert_eq!(state.current_tier, 5);
    assert_eq!(state.tier4.ai_guide.as_deref(), Some("Avoid dairy after 6pm."));

    let (state, events) = reduce(state, &usage(40, 10, 40, 95), now());
    assert_eq!(ids(&events), vec!["day30", "day60", "day90"]);
    assert_eq!(events[0].event_type, MilestoneEventType::MilestoneComplete);
    assert_eq!(events[1].event_type, MilestoneEventType::MilestoneComplete);
    assert_eq!(events[2].event_type, MilestoneEventType::TierUnlock);
    assert!(state.tier5.blueprint_unlocked);
    assert_eq!(state.tier5.current_day, 95);
}

#[test]
fn test_generated_content_is_write_once_and_gated() {
    let mut state = MilestoneState::default();
    let err = store_ai_guide(&mut state, "guide").unwrap_err();
    assert_eq!(err.code, ErrorCode::FeatureLocked);
    let err = store_blueprint(&mut state, "blueprint").unwrap_err();
    assert_eq!(err.code, ErrorCode::FeatureLocked);
    assert_eq!(state, MilestoneState::default());

    state.tier5.blueprint_unlocked = true;
    let err = store_blueprint(&mut state, "   ").unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let first = store_blueprint(&mut state, "first").unwrap();
    assert_eq!(first.events.len(), 1);
    assert_eq!(first.events[0].event_type, MilestoneEventType::BlueprintReady);

    let again = store_blueprint(&mut state, "second").unwrap();
    assert_eq!(again.content, "first");
    assert!(again.events.is_empty());
}
