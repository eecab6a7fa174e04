// ABOUTME: `experiment` commands driving the elimination experiment lifecycle
// ABOUTME: Start against a category, complete with a trial rating, or cancel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use crate::helpers::{load_records, print_json, service};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use gutsense::config::EngineConfig;
use gutsense::models::TriggerCategory;
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

/// Start an experiment and print it
pub async fn start(
    engine: &EngineConfig,
    records: &Path,
    user: Uuid,
    category: &str,
    name: &str,
    hypothesis: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let category = TriggerCategory::resolve(category)
        .ok_or_else(|| anyhow!("Unknown trigger category: {category}"))?;
    let records = load_records(records)?;
    let service = service(engine).await?;
    // Bring milestones up to date so a freshly unlocked tier is honoured
    service.sync(user, &records, now).await?;
    let experiment = service
        .start_experiment(user, &records, category, name, hypothesis, now)
        .await?;
    print_json(&experiment)
}

/// Complete the active experiment and print it with any new events
pub async fn complete(
    engine: &EngineConfig,
    records: &Path,
    user: Uuid,
    trial_meal: &str,
    score: u8,
    now: DateTime<Utc>,
) -> Result<()> {
    let records = load_records(records)?;
    let service = service(engine).await?;
    let experiment = service
        .complete_experiment(user, &records, trial_meal, score, now)
        .await?;
    print_json(&json!({
        "experiment": experiment,
        "events": service.pending_events(user),
    }))
}

/// Cancel the active experiment
pub async fn cancel(engine: &EngineConfig, user: Uuid, now: DateTime<Utc>) -> Result<()> {
    let service = service(engine).await?;
    let cancelled = service.cancel_experiment(user, now).await?;
    print_json(&json!({ "cancelled": cancelled }))
}
