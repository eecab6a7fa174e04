// ABOUTME: In-memory milestone store backed by a concurrent hash map
// ABOUTME: Used for tests, the CLI, and single-process deployments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use super::MilestoneStore;
use dashmap::DashMap;
use gutsense_core::errors::AppResult;
use gutsense_core::models::MilestoneState;
use std::sync::Arc;
use uuid::Uuid;

/// Process-local milestone store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct InMemoryMilestoneStore {
    states: Arc<DashMap<Uuid, MilestoneState>>,
}

impl InMemoryMilestoneStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with saved state
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state has been saved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[async_trait::async_trait]
impl MilestoneStore for InMemoryMilestoneStore {
    async fn load(&self, user_id: Uuid) -> AppResult<Option<MilestoneState>> {
        Ok(self.states.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, user_id: Uuid, state: &MilestoneState) -> AppResult<()> {
        self.states.insert(user_id, state.clone());
        Ok(())
    }
}
