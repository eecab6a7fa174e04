// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Rating scale bounds, analysis window lengths, and progression tier numbers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

//! Constants module
//!
//! Values that are part of the data contract live here. Tunable heuristics
//! (margins, thresholds, caps) live in the intelligence crate's
//! `AnalysisConfig` instead so they can be overridden at runtime.

/// Bloating rating scale
pub mod rating {
    /// Lowest valid bloating rating
    pub const MIN_RATING: u8 = 1;
    /// Highest valid bloating rating
    pub const MAX_RATING: u8 = 5;

    /// Whether a raw rating lies on the 1-5 scale
    #[must_use]
    pub const fn is_valid(rating: u8) -> bool {
        rating >= MIN_RATING && rating <= MAX_RATING
    }
}

/// Progression tiers
pub mod tiers {
    /// Entry tier, available from first use
    pub const FOUNDATION: u8 = 1;
    /// Pattern detection tier
    pub const PATTERNS: u8 = 2;
    /// Elimination experiments tier
    pub const EXPERIMENTS: u8 = 3;
    /// Baseline week and AI guide tier
    pub const AI_GUIDE: u8 = 4;
    /// Long-term tracking and blueprint tier
    pub const MASTERY: u8 = 5;
}

/// Progression milestone thresholds that define the tier structure
pub mod milestones {
    /// Completed ratings needed to unlock pattern detection
    pub const MEALS_FOR_PATTERN_DETECTION: u32 = 3;
    /// Consecutive logging days needed to unlock experiments
    pub const CONSECUTIVE_DAYS_FOR_EXPERIMENTS: u32 = 3;
    /// Unique logging days that make up the weekly baseline
    pub const BASELINE_UNIQUE_DAYS: u32 = 7;
    /// Long-term checkpoints, in days since the first record
    pub const DAY_30: i64 = 30;
    /// Second long-term checkpoint
    pub const DAY_60: i64 = 60;
    /// Final checkpoint, unlocks the blueprint
    pub const DAY_90: i64 = 90;
}

/// Service identity used in structured logs
pub mod service_names {
    /// Engine service name
    pub const GUTSENSE_ENGINE: &str = "gutsense-engine";
}
