// ABOUTME: Transient progression events queued for the presentation layer
// ABOUTME: Milestone completions, tier unlocks, experiment outcomes, and generated content
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use serde::{Deserialize, Serialize};

/// Kind of progression event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneEventType {
    /// Checkpoint reached, no new capability
    MilestoneComplete,
    /// New capability or tier unlocked
    TierUnlock,
    /// An experiment produced a result
    ExperimentComplete,
    /// AI guide content was delivered and cached
    AiGuideReady,
    /// Blueprint content was delivered and cached
    BlueprintReady,
}

/// Event emitted when progression state changes; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneEvent {
    /// Event kind
    #[serde(rename = "type")]
    pub event_type: MilestoneEventType,
    /// Stable milestone identifier (e.g. `first_meal`, `day3`)
    pub milestone_id: String,
    /// Short title
    pub title: String,
    /// Longer description
    pub description: String,
    /// Tier the milestone belongs to
    pub tier: u8,
}

impl MilestoneEvent {
    /// Build an event
    pub fn new(
        event_type: MilestoneEventType,
        milestone_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        tier: u8,
    ) -> Self {
        Self {
            event_type,
            milestone_id: milestone_id.into(),
            title: title.into(),
            description: description.into(),
            tier,
        }
    }
}
