// ABOUTME: Core data models for meal records, progression state, and events
// ABOUTME: Re-exports the record, taxonomy, milestone, experiment, and event types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

//! # Data Models
//!
//! `MealRecord` arrives from the external record store and is read-only here.
//! `MilestoneState` (with its nested `Experiment`) is the only persisted,
//! mutable aggregate. `MilestoneEvent` is transient.

/// Category taxonomy lookup table
pub mod category;
/// Meal records and detected trigger tags
pub mod meal;
/// Elimination experiments
pub mod experiment;
/// Progression events
pub mod event;
/// Persisted progression state
pub mod milestone;

pub use category::{CategoryInfo, TriggerCategory, UnknownCategory};
pub use event::{MilestoneEvent, MilestoneEventType};
pub use experiment::{Experiment, ExperimentResult};
pub use meal::{DetectedTrigger, MealRecord, RatingStatus};
pub use milestone::{
    BaselineProgress, ExperimentProgress, FoundationProgress, MasteryProgress, MilestoneState,
    PatternProgress, SuspectedTrigger,
};
