// ABOUTME: Write-once storage of externally generated AI guide and blueprint payloads
// ABOUTME: Gated behind their unlock flags; the first delivery is cached and returned verbatim
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use gutsense_core::constants::tiers;
use gutsense_core::errors::{AppError, AppResult};
use gutsense_core::models::{MilestoneEvent, MilestoneEventType, MilestoneState};
use tracing::{debug, info};

/// Result of a content delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    /// Cached payload, which is the earlier one if content was already stored
    pub content: String,
    /// Events emitted by this delivery, empty on a repeat
    pub events: Vec<MilestoneEvent>,
}

/// Cache the AI guide delivered by the external generator
///
/// # Errors
///
/// `FeatureLocked` before the guide is unlocked, `InvalidInput` for blank
/// content.
pub fn store_ai_guide(state: &mut MilestoneState, content: &str) -> AppResult<StoredContent> {
    if !state.tier4.ai_guide_unlocked {
        return Err(AppError::feature_locked("AI guide"));
    }
    if let Some(existing) = &state.tier4.ai_guide {
        debug!("AI guide already stored, returning cached copy");
        return Ok(StoredContent {
            content: existing.clone(),
            events: Vec::new(),
        });
    }
    ensure_not_blank(content, "AI guide")?;

    state.tier4.ai_guide = Some(content.to_owned());
    let events = vec![MilestoneEvent::new(
        MilestoneEventType::AiGuideReady,
        "ai_guide_ready",
        "Your AI guide is ready",
        "A personal guide built from your logs and experiments is available.",
        tiers::AI_GUIDE,
    )];
    info!(bytes = content.len(), "AI guide stored");

    Ok(StoredContent {
        content: content.to_owned(),
        events,
    })
}

/// Cache the long-term blueprint
///
/// # Errors
///
/// `FeatureLocked` before the blueprint is unlocked, `InvalidInput` for blank
/// content.
pub fn store_blueprint(state: &mut MilestoneState, content: &str) -> AppResult<StoredContent> {
    if !state.tier5.blueprint_unlocked {
        return Err(AppError::feature_locked("Blueprint"));
    }
    if let Some(existing) = &state.tier5.blueprint {
        debug!("blueprint already stored, returning cached copy");
        return Ok(StoredContent {
            content: existing.clone(),
            events: Vec::new(),
        });
    }
    ensure_not_blank(content, "Blueprint")?;

    state.tier5.blueprint = Some(content.to_owned());
    info!(bytes = content.len(), "blueprint stored");

    Ok(StoredContent {
        content: content.to_owned(),
        events: vec![MilestoneEvent::new(
            MilestoneEventType::BlueprintReady,
            "blueprint_ready",
            "Your blueprint is ready",
            "Your 90-day food blueprint is available.",
            tiers::MASTERY,
        )],
    })
}

fn ensure_not_blank(content: &str, what: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::invalid_input(format!("{what} content is empty")));
    }
    Ok(())
}
