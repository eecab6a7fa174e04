// ABOUTME: Key-value persistence for per-user milestone state
// ABOUTME: Whole-state read and write keyed by user id, with in-memory and SQLite backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

//! # Milestone Storage
//!
//! The engine needs no schema beyond "read whole state, write whole state".
//! Conflict handling across devices is the backend's concern.

use gutsense_core::errors::AppResult;
use gutsense_core::models::MilestoneState;
use uuid::Uuid;

/// `DashMap` backend
pub mod memory;
/// `SQLite` backend
pub mod sqlite;

pub use memory::InMemoryMilestoneStore;
pub use sqlite::SqliteMilestoneStore;

/// Persistence for [`MilestoneState`]
#[async_trait::async_trait]
pub trait MilestoneStore: Send + Sync {
    /// Load a user's state, `None` if nothing was saved yet
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the stored state
    /// cannot be decoded
    async fn load(&self, user_id: Uuid) -> AppResult<Option<MilestoneState>>;

    /// Replace a user's state
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written
    async fn save(&self, user_id: Uuid, state: &MilestoneState) -> AppResult<()>;

    /// Load a user's state, falling back to the all-false default
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read
    async fn load_or_default(&self, user_id: Uuid) -> AppResult<MilestoneState> {
        Ok(self.load(user_id).await?.unwrap_or_default())
    }
}
