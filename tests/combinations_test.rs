// ABOUTME: Integration tests for category combination analysis
// ABOUTME: Covers minimum data, observed-set enumeration, worse-together margin, and result cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{dairy_scenario, rated, test_config};
use gutsense::intelligence::CombinationAnalyzer;
use gutsense::models::{MealRecord, TriggerCategory};

fn dairy_gluten_history() -> Vec<MealRecord> {
    vec![
        rated("dg-1", 12, 5, &["dairy", "gluten"]),
        rated("dg-2", 9, 5, &["dairy", "gluten"]),
        rated("dg-3", 3, 4, &["dairy", "gluten"]),
        rated("d-1", 11, 2, &["dairy"]),
        rated("d-2", 6, 2, &["dairy"]),
        rated("g-1", 8, 2, &["gluten"]),
        rated("g-2", 5, 3, &["gluten"]),
        rated("plain", 1, 1, &[]),
    ]
}

#[test]
fn test_requires_minimum_records() {
    let config = test_config();
    let records: Vec<MealRecord> = dairy_gluten_history().into_iter().take(4).collect();
    assert!(CombinationAnalyzer::new(&config).analyze(&records).is_empty());
}

#[test]
fn test_pair_worse_together() {
    let config = test_config();
    let result = CombinationAnalyzer::new(&config).analyze(&dairy_gluten_history());

    assert_eq!(result.len(), 1);
    let combo = &result[0];
    assert_eq!(
        combo.categories,
        vec![TriggerCategory::Dairy, TriggerCategory::Gluten]
    );
    assert_eq!(combo.occurrence_count, 3);
    assert!((combo.avg_bloating_together - 4.67).abs() < 1e-9);
    assert!((combo.avg_bloating_apart - 2.25).abs() < 1e-9);
    assert!(combo.is_worse_together);
    assert!(combo.delta_percent > 100.0);
}

#[test]
fn test_small_difference_is_not_worse_together() {
    let config = test_config();
    let records = vec![
        rated("1", 10, 3, &["beans", "spicy"]),
        rated("2", 8, 3, &["beans", "spicy"]),
        rated("3", 7, 3, &["beans"]),
        rated("4", 5, 3, &["spicy"]),
        rated("5", 2, 2, &[]),
    ];

    let result = CombinationAnalyzer::new(&config).analyze(&records);
    assert_eq!(result.len(), 1);
    assert!(!result[0].is_worse_together);
}

#[test]
fn test_single_observation_is_not_a_candidate() {
    let config = test_config();
    let mut records = dairy_scenario();
    records.push(rated("once", 1, 5, &["alcohol", "carbonation"]));

    assert!(CombinationAnalyzer::new(&config).analyze(&records).is_empty());
}

#[test]
fn test_results_capped_and_counts_at_least_two() {
    let config = test_config();
    let pairs = [
        ["dairy", "gluten"],
        ["beans", "spicy"],
        ["alcohol", "carbonation"],
        ["caffeine", "refined_sugar"],
        ["fried_fatty", "processed_meat"],
    ];
    let mut records = Vec::new();
    for (i, pair) in pairs.iter().enumerate() {
        let day = i as i64 * 2;
        records.push(rated(&format!("{i}-a"), day + 1, 4, pair));
        records.push(rated(&format!("{i}-b"), day + 2, 3, pair));
    }

    let result = CombinationAnalyzer::new(&config).analyze(&records);
    assert_eq!(result.len(), 3);
    assert!(result.iter().all(|c| c.occurrence_count >= 2));
    for pair in result.windows(2) {
        assert!(pair[0].avg_bloating_together >= pair[1].avg_bloating_together);
    }
}
