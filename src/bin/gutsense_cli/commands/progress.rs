// ABOUTME: `progress` command syncing milestone state for one user
// ABOUTME: Prints the events emitted by this sync and the resulting tier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use crate::helpers::{load_records, print_json, service};
use anyhow::Result;
use chrono::{DateTime, Utc};
use gutsense::config::EngineConfig;
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

/// Sync and print `{ tier, events }`
pub async fn run(
    engine: &EngineConfig,
    records: &Path,
    user: Uuid,
    now: DateTime<Utc>,
) -> Result<()> {
    let records = load_records(records)?;
    let service = service(engine).await?;
    let events = service.sync(user, &records, now).await?;
    let state = service.state(user).await?;
    print_json(&json!({
        "user": user,
        "current_tier": state.current_tier,
        "events": events,
    }))
}
