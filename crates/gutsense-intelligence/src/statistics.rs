// ABOUTME: Small-sample statistics helpers shared by the trigger analyzers
// ABOUTME: Means, dispersion, rounding, windowing, and qualifying-record extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors
#![allow(clippy::cast_precision_loss)] // Safe: sample sizes are tiny

use chrono::{DateTime, Duration, Utc};
use gutsense_core::models::MealRecord;

/// A record that takes part in rating-based analysis, with its rating
#[derive(Debug, Clone, Copy)]
pub struct RatedMeal<'a> {
    /// Source record
    pub record: &'a MealRecord,
    /// Validated rating on the 1-5 scale
    pub rating: f64,
}

/// Completed records with valid ratings, oldest first
///
/// Ties on `created_at` keep their input order.
#[must_use]
pub fn rated_meals(records: &[MealRecord]) -> Vec<RatedMeal<'_>> {
    let mut rated: Vec<RatedMeal<'_>> = records
        .iter()
        .filter_map(|record| {
            record
                .qualifying_rating()
                .map(|rating| RatedMeal { record, rating })
        })
        .collect();
    rated.sort_by_key(|meal| meal.record.created_at);
    rated
}

/// Arithmetic mean, `None` for an empty sample
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean rating of a set of rated meals
#[must_use]
pub fn mean_rating<'a, 'b: 'a, I>(meals: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a RatedMeal<'b>>,
{
    let ratings: Vec<f64> = meals.into_iter().map(|m| m.rating).collect();
    mean(&ratings)
}

/// Population standard deviation, `None` for an empty sample
#[must_use]
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - avg;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// `now` minus whole days, `None` when the instant is not representable
#[must_use]
pub fn days_before(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|span| now.checked_sub_signed(span))
}

/// Whether `at` falls in the half-open window `(now - days, now]`
///
/// A window reaching past the representable range covers all of history.
#[must_use]
pub fn within_last_days(at: DateTime<Utc>, now: DateTime<Utc>, days: i64) -> bool {
    at <= now && days_before(now, days).is_none_or(|start| at > start)
}

/// Whether `at` falls in `(now - end_days, now - start_days]`
///
/// An unrepresentable window end means an open-ended past, an
/// unrepresentable start means an empty window.
#[must_use]
pub fn within_days_ago(
    at: DateTime<Utc>,
    now: DateTime<Utc>,
    start_days: i64,
    end_days: i64,
) -> bool {
    days_before(now, start_days).is_some_and(|end| at <= end)
        && days_before(now, end_days).is_none_or(|start| at > start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mean_and_std_dev() {
        assert_eq!(mean(&[]), None);
        assert!((mean(&[5.0, 4.0, 4.0]).unwrap() - 4.333).abs() < 0.001);
        assert_eq!(std_dev(&[3.0, 3.0, 3.0]), Some(0.0));
        assert!((std_dev(&[1.0, 5.0]).unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_oversized_windows_do_not_overflow() {
        let now = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
        let long_ago = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
        assert!(days_before(now, i64::MAX).is_none());
        assert!(within_last_days(long_ago, now, i64::MAX / 1000));
        assert!(!within_days_ago(long_ago, now, i64::MAX / 1000, i64::MAX));
        assert!(within_days_ago(long_ago, now, 14, i64::MAX));
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(4.333_333, 2) - 4.33).abs() < f64::EPSILON);
        assert!((round_to(2.5, 0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_windows_are_half_open() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        assert!(within_last_days(now, now, 7));
        assert!(!within_last_days(now - Duration::days(7), now, 7));
        assert!(within_last_days(now - Duration::days(6), now, 7));
        assert!(!within_last_days(now + Duration::hours(1), now, 7));

        assert!(within_days_ago(now - Duration::days(14), now, 14, 28));
        assert!(!within_days_ago(now - Duration::days(28), now, 14, 28));
    }

    #[test]
    fn test_rated_meals_sorted_and_filtered() {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let records = vec![
            MealRecord::new("late", base + Duration::days(2)).rated(2),
            MealRecord::new("pending", base),
            MealRecord::new("early", base).rated(4),
        ];
        let rated = rated_meals(&records);
        let ids: Vec<&str> = rated.iter().map(|m| m.record.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }
}
