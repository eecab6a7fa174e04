// ABOUTME: Memoised trigger analysis keyed by a fingerprint of the input records
// ABOUTME: Recompute on demand, reuse the last reports for unchanged input via an LRU map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use chrono::{DateTime, Utc};
use gutsense_core::errors::AppResult;
use gutsense_core::models::MealRecord;
use gutsense_intelligence::{AnalysisConfig, TriggerAnalyzer, TriggerReport};
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Bounded cache of analysis reports
pub struct AnalysisCache {
    config: AnalysisConfig,
    reports: Mutex<LruCache<String, Arc<TriggerReport>>>,
}

impl AnalysisCache {
    const MIN_CAPACITY: NonZeroUsize = NonZeroUsize::MIN;

    /// Create a cache holding up to `capacity` reports (at least one)
    #[must_use]
    pub fn new(config: AnalysisConfig, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(Self::MIN_CAPACITY);
        Self {
            config,
            reports: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Configuration the reports are computed with
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Report for `records` at `now`, computed once per distinct input
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be serialised for fingerprinting
    pub async fn report(
        &self,
        records: &[MealRecord],
        now: DateTime<Utc>,
    ) -> AppResult<Arc<TriggerReport>> {
        let key = fingerprint(records, now)?;
        let mut reports = self.reports.lock().await;
        if let Some(hit) = reports.get(&key) {
            debug!(fingerprint = %key, "analysis cache hit");
            return Ok(Arc::clone(hit));
        }

        let report = Arc::new(TriggerAnalyzer::new(&self.config).analyze(records, now));
        debug!(fingerprint = %key, "analysis cache miss");
        reports.put(key, Arc::clone(&report));
        Ok(report)
    }

    /// Number of cached reports
    pub async fn len(&self) -> usize {
        self.reports.lock().await.len()
    }

    /// Drop every cached report
    pub async fn clear(&self) {
        self.reports.lock().await.clear();
    }
}

/// SHA-256 over the serialised records and the analysis instant
///
/// # Errors
///
/// Returns an error if a record cannot be serialised
pub fn fingerprint(records: &[MealRecord], now: DateTime<Utc>) -> AppResult<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(records)?);
    hasher.update(now.to_rfc3339().as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
