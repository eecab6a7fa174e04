// ABOUTME: Integration tests for the recommendation engine
// ABOUTME: Covers eliminate, confirm, reintroduce rules, de-duplication, ordering, and the cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{dairy_scenario, now, rated, test_config};
use gutsense::intelligence::{
    AnalysisConfig, CombinationAnalyzer, ConfidenceModel, Recommendation, RecommendationEngine,
    RecommendationPriority, RecommendationType,
};
use gutsense::models::{MealRecord, TriggerCategory};
use std::collections::BTreeSet;

fn recommend(config: &AnalysisConfig, records: &[MealRecord]) -> Vec<Recommendation> {
    let confidences = ConfidenceModel::new(config).analyze(records, now());
    let combinations = CombinationAnalyzer::new(config).analyze(records);
    RecommendationEngine::new(config).recommend(records, &confidences, &combinations, now())
}

fn plain_meals(count: i64, first_day: i64) -> Vec<MealRecord> {
    (0..count)
        .map(|i| rated(&format!("plain-{i}"), first_day + i, 1, &[]))
        .collect()
}

#[test]
fn test_too_few_records_yields_nothing() {
    let config = test_config();
    let records = vec![
        rated("1", 3, 5, &["dairy"]),
        rated("2", 2, 5, &["dairy"]),
        rated("3", 1, 5, &["dairy"]),
        rated("4", 0, 1, &[]),
    ];
    assert!(recommend(&config, &records).is_empty());
}

#[test]
fn test_investigating_category_gets_confirm() {
    let config = test_config();
    let result = recommend(&config, &dairy_scenario());

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].recommendation_type, RecommendationType::Confirm);
    assert_eq!(result[0].category, TriggerCategory::Dairy);
    assert_eq!(result[0].priority, RecommendationPriority::Medium);
    assert!(result[0].rationale.contains("Dairy"));
}

#[test]
fn test_high_confidence_recent_category_gets_eliminate() {
    let config = test_config();
    let mut records: Vec<MealRecord> = (1..=5)
        .map(|d| rated(&format!("g{d}"), d, 4, &["gluten"]))
        .collect();
    records.extend(plain_meals(3, 6));

    let result = recommend(&config, &records);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].recommendation_type, RecommendationType::Eliminate);
    assert_eq!(result[0].priority, RecommendationPriority::High);
}

#[test]
fn test_absent_category_gets_reintroduce() {
    let config = test_config();
    let mut records = vec![
        rated("beans", 12, 5, &["beans"]),
        rated("alcohol", 22, 4, &["alcohol"]),
    ];
    records.extend(plain_meals(5, 1));

    let result = recommend(&config, &records);
    assert_eq!(result.len(), 2);
    assert!(result
        .iter()
        .all(|r| r.recommendation_type == RecommendationType::Reintroduce));

    // Longer absence is past the window midpoint and ranks first
    assert_eq!(result[0].category, TriggerCategory::Alcohol);
    assert_eq!(result[0].priority, RecommendationPriority::Medium);
    assert_eq!(result[1].category, TriggerCategory::Beans);
    assert_eq!(result[1].priority, RecommendationPriority::Low);
}

#[test]
fn test_absent_too_long_is_not_reintroduced() {
    let config = test_config();
    let mut records = vec![rated("beans", 45, 5, &["beans"])];
    records.extend(plain_meals(5, 1));
    assert!(recommend(&config, &records).is_empty());
}

#[test]
fn test_capped_sorted_and_one_per_category() {
    let config = test_config();
    let mut records: Vec<MealRecord> = (1..=5)
        .map(|d| rated(&format!("g{d}"), d, 4, &["gluten"]))
        .collect();
    records.push(rated("d1", 6, 5, &["dairy"]));
    records.push(rated("d2", 7, 5, &["dairy"]));
    records.push(rated("s1", 8, 4, &["spicy"]));
    records.push(rated("s2", 9, 4, &["spicy"]));
    records.push(rated("b1", 10, 3, &["beans"]));
    records.push(rated("b2", 11, 3, &["beans"]));
    records.push(rated("b3", 12, 3, &["beans"]));
    records.extend(plain_meals(2, 13));

    let result = recommend(&config, &records);
    assert_eq!(result.len(), 3);
    assert_eq!(result[0].category, TriggerCategory::Gluten);
    assert_eq!(result[0].priority, RecommendationPriority::High);
    for pair in result.windows(2) {
        assert!(pair[0].priority <= pair[1].priority);
        if pair[0].priority == pair[1].priority {
            assert!(pair[0].impact_score >= pair[1].impact_score);
        }
    }

    let categories: BTreeSet<TriggerCategory> = result.iter().map(|r| r.category).collect();
    assert_eq!(categories.len(), 3);
}

#[test]
fn test_rationale_mentions_worse_combination() {
    let config = test_config();
    let records = vec![
        rated("dg-1", 12, 5, &["dairy", "gluten"]),
        rated("dg-2", 9, 5, &["dairy", "gluten"]),
        rated("dg-3", 3, 4, &["dairy", "gluten"]),
        rated("d-1", 11, 2, &["dairy"]),
        rated("d-2", 6, 2, &["dairy"]),
        rated("g-1", 8, 2, &["gluten"]),
        rated("g-2", 5, 3, &["gluten"]),
        rated("plain", 1, 1, &[]),
    ];

    let result = recommend(&config, &records);
    let dairy = result
        .iter()
        .find(|r| r.category == TriggerCategory::Dairy)
        .expect("dairy recommendation");
    assert_eq!(dairy.recommendation_type, RecommendationType::Eliminate);
    assert!(dairy.rationale.contains("combined with Gluten"));
}
