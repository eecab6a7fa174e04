// ABOUTME: Main library entry point for the gutsense trigger inference and progression engine
// ABOUTME: Wires analytics, milestone progression, persistence, caching, and logging together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

#![deny(unsafe_code)]

//! # Gutsense
//!
//! Infers which food categories are associated with post-meal bloating and
//! turns ongoing logging into a five-tier progression with single-subject
//! elimination experiments.
//!
//! ## Architecture
//!
//! - **`gutsense-core`**: records, taxonomy, progression state, errors
//! - **`gutsense-intelligence`**: pure confidence, combination, trend,
//!   success and recommendation analysis
//! - **this crate**: the milestone reducer and experiment lifecycle, the
//!   persistence seam, the analysis cache, and the per-user service
//!
//! Every computation takes a caller-supplied `now`, so the engine never reads
//! the wall clock on its own.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use gutsense::config::{AnalysisConfig, EngineConfig};
//! use gutsense::errors::AppResult;
//! use gutsense::services::ProgressionService;
//! use gutsense::storage::InMemoryMilestoneStore;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let engine = EngineConfig::from_env();
//!     let service = ProgressionService::new(
//!         InMemoryMilestoneStore::new(),
//!         AnalysisConfig::global().clone(),
//!         engine.cache_capacity,
//!     );
//!     let events = service.sync(Uuid::new_v4(), &[], Utc::now()).await?;
//!     assert!(events.is_empty());
//!     Ok(())
//! }
//! ```

pub use gutsense_core::{constants, errors, models};
pub use gutsense_intelligence as intelligence;

/// Memoised analysis reports
pub mod cache;
/// Engine environment configuration
pub mod config;
/// Pending milestone event queue
pub mod events;
/// Structured logging setup
pub mod logging;
/// Milestone reducer, experiments, generated content
pub mod progression;
/// Per-user orchestration
pub mod services;
/// Milestone state persistence
pub mod storage;
