// ABOUTME: Engine environment configuration for storage and analysis caching
// ABOUTME: Reads GUTSENSE_* variables with documented defaults, re-exports analysis config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

//! Environment-based engine configuration

use serde::{Deserialize, Serialize};
use std::env;

pub use gutsense_intelligence::config::{
    AnalysisConfig, AnalysisLimits, AnalysisThresholds, AnalysisWindows, ConfigError,
    ImpactWeights, MAX_WINDOW_DAYS,
};

/// Default database URL, an in-memory `SQLite` database
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
/// Default number of analysis reports kept in the cache
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Runtime configuration for the progression engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Milestone store connection string
    pub database_url: String,
    /// Maximum number of cached analysis reports
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Load engine configuration from environment
    ///
    /// A zero or unparseable cache capacity falls back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("GUTSENSE_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
            cache_capacity: env::var("GUTSENSE_CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_CACHE_CAPACITY),
        }
    }

    /// Whether the configured database lives only in memory
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }
}
