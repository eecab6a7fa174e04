// ABOUTME: Tests for environment-driven engine and analysis configuration
// ABOUTME: Serialised because each test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use gutsense::config::{
    AnalysisConfig, ConfigError, EngineConfig, DEFAULT_CACHE_CAPACITY, DEFAULT_DATABASE_URL,
    MAX_WINDOW_DAYS,
};
use gutsense::intelligence::{SuccessTracker, TrendAnalyzer, TrendDirection};
use gutsense::models::MealRecord;
use serial_test::serial;
use std::env;

const ENGINE_VARS: [&str; 2] = ["GUTSENSE_DATABASE_URL", "GUTSENSE_CACHE_CAPACITY"];

fn clear_engine_vars() {
    for var in ENGINE_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_engine_defaults_without_environment() {
    clear_engine_vars();
    let config = EngineConfig::from_env();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    assert!(config.is_in_memory());
}

#[test]
#[serial]
fn test_engine_environment_overrides() {
    env::set_var("GUTSENSE_DATABASE_URL", "sqlite:./data/gutsense.db");
    env::set_var("GUTSENSE_CACHE_CAPACITY", "8");
    let config = EngineConfig::from_env();
    clear_engine_vars();

    assert_eq!(config.database_url, "sqlite:./data/gutsense.db");
    assert_eq!(config.cache_capacity, 8);
    assert!(!config.is_in_memory());
}

#[test]
#[serial]
fn test_invalid_cache_capacity_falls_back() {
    for raw in ["0", "-3", "lots"] {
        env::set_var("GUTSENSE_CACHE_CAPACITY", raw);
        assert_eq!(EngineConfig::from_env().cache_capacity, DEFAULT_CACHE_CAPACITY);
    }
    clear_engine_vars();
}

#[test]
#[serial]
fn test_analysis_overrides_are_applied() {
    env::set_var("GUTSENSE_MAX_RECOMMENDATIONS", "3");
    env::set_var("GUTSENSE_EXPERIMENT_SIGNIFICANCE_PERCENT", "25");
    let config = AnalysisConfig::load();
    env::remove_var("GUTSENSE_MAX_RECOMMENDATIONS");
    env::remove_var("GUTSENSE_EXPERIMENT_SIGNIFICANCE_PERCENT");

    let config = config.unwrap();
    assert_eq!(config.limits.max_recommendations, 3);
    assert!((config.thresholds.experiment_significance_percent - 25.0).abs() < f64::EPSILON);
}

#[test]
#[serial]
fn test_unparseable_analysis_override_is_rejected() {
    env::set_var("GUTSENSE_RECENT_DAYS", "a week");
    let result = AnalysisConfig::load();
    env::remove_var("GUTSENSE_RECENT_DAYS");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
#[serial]
fn test_override_failing_validation_is_rejected() {
    env::set_var("GUTSENSE_MAX_CONTROL_MEALS", "0");
    let result = AnalysisConfig::load();
    env::remove_var("GUTSENSE_MAX_CONTROL_MEALS");
    assert!(matches!(result, Err(ConfigError::ValueOutOfRange(_))));
}

#[test]
#[serial]
fn test_oversized_window_override_is_rejected() {
    for var in [
        "GUTSENSE_RECENT_DAYS",
        "GUTSENSE_SUCCESS_PERIOD_DAYS",
        "GUTSENSE_REINTRODUCE_MAX_DAYS",
    ] {
        env::set_var(var, (i64::MAX / 1000).to_string());
        let result = AnalysisConfig::load();
        env::remove_var(var);
        assert!(
            matches!(result, Err(ConfigError::ValueOutOfRange(_))),
            "{var} accepted an oversized window"
        );
    }

    env::set_var("GUTSENSE_RECENT_DAYS", MAX_WINDOW_DAYS.to_string());
    let result = AnalysisConfig::load();
    env::remove_var("GUTSENSE_RECENT_DAYS");
    assert_eq!(result.unwrap().windows.recent_days, MAX_WINDOW_DAYS);
}

#[test]
fn test_unvalidated_oversized_windows_degrade_instead_of_panicking() {
    let now = Utc.with_ymd_and_hms(2025, 6, 30, 20, 0, 0).unwrap();
    let records = vec![
        MealRecord::new("old", Utc.with_ymd_and_hms(2020, 1, 1, 8, 0, 0).unwrap())
            .rated(4)
            .with_trigger("dairy", "cheese"),
        MealRecord::new("recent", now).rated(2),
    ];

    let mut config = AnalysisConfig::default();
    config.windows.recent_days = i64::MAX / 1000;
    config.windows.success_period_days = i64::MAX / 2;

    let weekly = TrendAnalyzer::new(&config).analyze(&records, now);
    assert_eq!(weekly.trend, TrendDirection::Stable);
    assert!(weekly.new_patterns.is_empty());
    assert!((weekly.this_week_avg_bloating - 3.0).abs() < f64::EPSILON);

    let success = SuccessTracker::new(&config).analyze(&records, now);
    assert!((success.current_avg_bloating - 3.0).abs() < f64::EPSILON);
    assert!(success.previous_period_avg_bloating.abs() < f64::EPSILON);
}

#[test]
fn test_default_heuristics() {
    let config = AnalysisConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.limits.min_records_for_patterns, 5);
    assert_eq!(config.limits.max_combinations, 3);
    assert_eq!(config.limits.max_recommendations, 3);
    assert_eq!(config.limits.max_control_meals, 5);
    assert_eq!(config.windows.reintroduce_min_days, 10);
    assert_eq!(config.windows.reintroduce_max_days, 30);
}
