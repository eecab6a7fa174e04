// ABOUTME: `analyze` command printing the full trigger report for a records file
// ABOUTME: Confidences, combinations, weekly trend, success metrics, and recommendations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use crate::helpers::{load_records, print_json};
use anyhow::Result;
use chrono::{DateTime, Utc};
use gutsense::cache::AnalysisCache;
use gutsense::config::{AnalysisConfig, EngineConfig};
use std::path::Path;
use tracing::info;

/// Print the report as JSON
pub async fn run(engine: &EngineConfig, records: &Path, now: DateTime<Utc>) -> Result<()> {
    let records = load_records(records)?;
    let cache = AnalysisCache::new(AnalysisConfig::global().clone(), engine.cache_capacity);
    let report = cache.report(&records, now).await?;
    info!(
        records = records.len(),
        rated_meals = report.rated_meals,
        "analysis complete"
    );
    print_json(report.as_ref())
}
