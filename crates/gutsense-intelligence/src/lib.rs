// ABOUTME: Trigger inference engine over meal and symptom records
// ABOUTME: Extracted from the main crate so the pure analytics compile independently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

#![deny(unsafe_code)]

//! # Gutsense Intelligence
//!
//! Pure, synchronous analysis of meal records. Every function takes the full
//! record set plus a caller-supplied `now`, and recomputes its output from
//! scratch; nothing here holds state between calls.
//!
//! Data flow: records → [`ConfidenceModel`] → {[`CombinationAnalyzer`],
//! [`TrendAnalyzer`], [`SuccessTracker`]} → [`RecommendationEngine`].
//! [`TriggerAnalyzer`] runs the whole pipeline.

/// Analysis heuristics configuration
pub mod config;
/// Per-category statistics and impact scoring
pub mod confidence;
/// Category co-occurrence analysis
pub mod combinations;
/// Full-pipeline report
pub mod insights;
/// Ranked action list
pub mod recommendation_engine;
/// Shared small-sample statistics
pub mod statistics;
/// Comfort rate and streak tracking
pub mod success;
/// Weekly trend analysis
pub mod trends;

pub use combinations::{Combination, CombinationAnalyzer};
pub use confidence::{ConfidenceModel, ConfidenceTier, TriggerConfidence};
pub use config::{AnalysisConfig, ConfigError};
pub use insights::{TriggerAnalyzer, TriggerReport};
pub use recommendation_engine::{
    Recommendation, RecommendationEngine, RecommendationPriority, RecommendationType,
};
pub use success::{SuccessMetrics, SuccessTracker};
pub use trends::{TrendAnalyzer, TrendDirection, WeeklyComparison};
