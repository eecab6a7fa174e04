// ABOUTME: Progression engine: usage counters, milestone reducer, experiments, generated content
// ABOUTME: Pure state transitions over MilestoneState; persistence lives in the service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

/// AI guide and blueprint caching
pub mod content;
/// Experiment lifecycle
pub mod experiments;
/// Milestone reducer
pub mod milestones;
/// Usage snapshot derivation
pub mod usage;

pub use content::{store_ai_guide, store_blueprint, StoredContent};
pub use experiments::ExperimentLifecycle;
pub use milestones::reduce;
pub use usage::UsageSnapshot;
