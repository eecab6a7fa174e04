// ABOUTME: Shared helpers for gutsense-cli
// ABOUTME: Records file loading, instant parsing, service construction, and JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gutsense::config::{AnalysisConfig, EngineConfig};
use gutsense::models::MealRecord;
use gutsense::services::ProgressionService;
use gutsense::storage::SqliteMilestoneStore;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read a JSON array of meal records
pub fn load_records(path: &Path) -> Result<Vec<MealRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse records file {}", path.display()))
}

/// Parse the `--now` override, defaulting to the current time
pub fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    raw.map_or_else(
        || Ok(Utc::now()),
        |value| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("Invalid --now timestamp: {value}"))
        },
    )
}

/// Progression service over the configured `SQLite` store
pub async fn service(engine: &EngineConfig) -> Result<ProgressionService<SqliteMilestoneStore>> {
    let store = SqliteMilestoneStore::connect(&engine.database_url).await?;
    Ok(ProgressionService::new(
        store,
        AnalysisConfig::global().clone(),
        engine.cache_capacity,
    ))
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
