// ABOUTME: Usage counters derived from the raw record set for the milestone reducer
// ABOUTME: Meal totals, unique logging days, consecutive-day runs, and the top suspected trigger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use chrono::{DateTime, NaiveDate, Utc};
use gutsense_core::models::{MealRecord, SuspectedTrigger};
use gutsense_intelligence::TriggerConfidence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Counters the milestone reducer consumes
///
/// Recomputed from the full record set on every sync, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Meals logged, rated or not
    pub total_meals: u32,
    /// Meals with a completed 1-5 rating
    pub completed_meals: u32,
    /// Distinct UTC calendar days with at least one meal
    pub unique_logging_days: u32,
    /// Longest run of consecutive logging days
    pub longest_day_run: u32,
    /// Consecutive logging days ending at the latest logging day
    pub current_day_run: u32,
    /// Whole days between the first record and `now`
    pub days_since_first_entry: u32,
    /// Highest-ranked category from the confidence analysis
    pub top_trigger: Option<SuspectedTrigger>,
}

impl UsageSnapshot {
    /// Derive counters from records and their confidence analysis
    ///
    /// Records stamped after `now` are ignored.
    #[must_use]
    pub fn from_records(
        records: &[MealRecord],
        confidences: &[TriggerConfidence],
        now: DateTime<Utc>,
    ) -> Self {
        let visible: Vec<&MealRecord> = records.iter().filter(|r| r.created_at <= now).collect();

        let days: BTreeSet<NaiveDate> = visible.iter().map(|r| r.logged_day()).collect();
        let (current_day_run, longest_day_run) = day_runs(&days);

        let days_since_first_entry = visible
            .iter()
            .map(|r| r.created_at)
            .min()
            .map_or(0, |first| {
                u32::try_from((now - first).num_days().max(0)).unwrap_or(u32::MAX)
            });

        let top_trigger = confidences.first().map(|c| SuspectedTrigger {
            category: c.category,
            name: c.category.display_name().to_owned(),
            impact_score: c.ranking_score(),
        });

        Self {
            total_meals: count(visible.len()),
            completed_meals: count(visible.iter().filter(|r| r.is_qualifying()).count()),
            unique_logging_days: count(days.len()),
            longest_day_run,
            current_day_run,
            days_since_first_entry,
            top_trigger,
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// (current, longest) runs of consecutive calendar days
fn day_runs(days: &BTreeSet<NaiveDate>) -> (u32, u32) {
    let mut run = 0_u32;
    let mut longest = 0_u32;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(*day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }
    (run, longest)
}
