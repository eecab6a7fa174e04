// ABOUTME: Shared test utilities and record builders for integration tests
// ABOUTME: Fixed analysis instant, meal record factories, and quiet logging setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `gutsense`

use chrono::{DateTime, Duration, TimeZone, Utc};
use gutsense::config::AnalysisConfig;
use gutsense::models::MealRecord;
use std::env;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fixed analysis instant shared by every test
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 30, 20, 0, 0).unwrap()
}

/// `now` minus whole days
pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

/// Default heuristics, independent of the environment
pub fn test_config() -> AnalysisConfig {
    AnalysisConfig::default()
}

/// Completed meal with one food per category
pub fn rated(id: &str, days: i64, rating: u8, categories: &[&str]) -> MealRecord {
    categories
        .iter()
        .fold(MealRecord::new(id, days_ago(days)).rated(rating), |meal, category| {
            meal.with_trigger(*category, format!("{category} food"))
        })
}

/// Logged but not yet rated meal
pub fn unrated(id: &str, days: i64, categories: &[&str]) -> MealRecord {
    categories
        .iter()
        .fold(MealRecord::new(id, days_ago(days)), |meal, category| {
            meal.with_trigger(*category, format!("{category} food"))
        })
}

/// Ten rated meals: dairy in three rated 5, 4, 4; seven plain meals rated 2
pub fn dairy_scenario() -> Vec<MealRecord> {
    vec![
        rated("plain-1", 10, 2, &[]),
        rated("dairy-1", 9, 5, &["dairy"]),
        rated("plain-2", 8, 2, &[]),
        rated("plain-3", 7, 2, &[]),
        rated("dairy-2", 6, 4, &["dairy"]),
        rated("plain-4", 5, 2, &[]),
        rated("plain-5", 4, 2, &[]),
        rated("dairy-3", 3, 4, &["dairy"]),
        rated("plain-6", 2, 2, &[]),
        rated("plain-7", 1, 2, &[]),
    ]
}

/// One meal per day for `days` consecutive days ending today, all rated
pub fn daily_meals(days: i64, rating: u8, categories: &[&str]) -> Vec<MealRecord> {
    (0..days)
        .rev()
        .map(|d| rated(&format!("daily-{d}"), d, rating, categories))
        .collect()
}
