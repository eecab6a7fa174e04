// ABOUTME: Per-user progression service: read-modify-write of milestone state under a user lock
// ABOUTME: Runs the reducer and experiment lifecycle, persists state, and queues events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

//! # Progression Service
//!
//! Every mutating call loads the user's state, applies a pure transition,
//! saves the result and queues the emitted events, all while holding that
//! user's lock. Rejected calls save nothing and queue nothing.

use crate::cache::AnalysisCache;
use crate::events::EventQueue;
use crate::progression::{
    milestones, store_ai_guide, store_blueprint, ExperimentLifecycle, UsageSnapshot,
};
use crate::storage::MilestoneStore;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use gutsense_core::errors::AppResult;
use gutsense_core::models::{
    Experiment, MealRecord, MilestoneEvent, MilestoneState, TriggerCategory,
};
use gutsense_intelligence::AnalysisConfig;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// Coordinates storage, analysis and progression for many users
pub struct ProgressionService<S: MilestoneStore> {
    store: S,
    cache: AnalysisCache,
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
    queues: DashMap<Uuid, EventQueue>,
}

impl<S: MilestoneStore> ProgressionService<S> {
    /// Create a service over `store`
    #[must_use]
    pub fn new(store: S, config: AnalysisConfig, cache_capacity: usize) -> Self {
        Self {
            store,
            cache: AnalysisCache::new(config, cache_capacity),
            locks: DashMap::new(),
            queues: DashMap::new(),
        }
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Analysis cache shared by every user
    #[must_use]
    pub const fn analysis(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Recompute progression after the user's records changed
    ///
    /// Returns the newly emitted events, which are also queued.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails
    pub async fn sync(
        &self,
        user_id: Uuid,
        records: &[MealRecord],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<MilestoneEvent>> {
        let _guard = self.lock_user(user_id).await;
        let state = self.store.load_or_default(user_id).await?;
        let (next, events) = self.apply_usage(state.clone(), records, now).await?;
        if next != state {
            self.store.save(user_id, &next).await?;
        }
        debug!(
            user_id = %user_id,
            tier = next.current_tier,
            events = events.len(),
            "progression synced"
        );
        self.enqueue(user_id, &events);
        Ok(events)
    }

    /// Current persisted state, the default if none was saved yet
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails
    pub async fn state(&self, user_id: Uuid) -> AppResult<MilestoneState> {
        self.store.load_or_default(user_id).await
    }

    /// Start an elimination experiment
    ///
    /// # Errors
    ///
    /// Rejected while experiments are locked or another experiment is
    /// active; storage failures are propagated
    pub async fn start_experiment(
        &self,
        user_id: Uuid,
        records: &[MealRecord],
        category: TriggerCategory,
        name: &str,
        hypothesis: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Experiment> {
        let _guard = self.lock_user(user_id).await;
        let mut state = self.store.load_or_default(user_id).await?;
        let experiment = self
            .lifecycle()
            .start(&mut state, records, category, name, hypothesis, now)?;
        state.updated_at = Some(now);
        self.store.save(user_id, &state).await?;
        Ok(experiment)
    }

    /// Record the trial meal of the active experiment
    ///
    /// # Errors
    ///
    /// Rejected when no experiment is active; storage failures are propagated
    pub async fn attach_trial_meal(
        &self,
        user_id: Uuid,
        meal_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let _guard = self.lock_user(user_id).await;
        let mut state = self.store.load_or_default(user_id).await?;
        self.lifecycle().attach_trial_meal(&mut state, meal_id)?;
        state.updated_at = Some(now);
        self.store.save(user_id, &state).await
    }

    /// Complete the active experiment, then re-run the reducer
    ///
    /// Completion can unlock the AI guide when the weekly baseline is already
    /// done, so the milestone events follow the experiment event.
    ///
    /// # Errors
    ///
    /// Rejected when no experiment is active or the score is off the scale;
    /// storage failures are propagated
    pub async fn complete_experiment(
        &self,
        user_id: Uuid,
        records: &[MealRecord],
        trial_meal_id: &str,
        bloating_score: u8,
        now: DateTime<Utc>,
    ) -> AppResult<Experiment> {
        let _guard = self.lock_user(user_id).await;
        let mut state = self.store.load_or_default(user_id).await?;
        let (experiment, event) = self
            .lifecycle()
            .complete(&mut state, trial_meal_id, bloating_score, now)?;

        let (mut next, milestone_events) = self.apply_usage(state, records, now).await?;
        next.updated_at = Some(now);
        self.store.save(user_id, &next).await?;

        let mut events = vec![event];
        events.extend(milestone_events);
        self.enqueue(user_id, &events);
        Ok(experiment)
    }

    /// Cancel the active experiment; a no-op when none is active
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails
    pub async fn cancel_experiment(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Experiment>> {
        let _guard = self.lock_user(user_id).await;
        let mut state = self.store.load_or_default(user_id).await?;
        let cancelled = self.lifecycle().cancel(&mut state);
        if cancelled.is_some() {
            state.updated_at = Some(now);
            self.store.save(user_id, &state).await?;
        }
        Ok(cancelled)
    }

    /// Cache the externally generated AI guide
    ///
    /// Returns the stored guide, which is the earlier one on a repeat call.
    ///
    /// # Errors
    ///
    /// Rejected while the guide is locked or the content is blank; storage
    /// failures are propagated
    pub async fn store_ai_guide(
        &self,
        user_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let _guard = self.lock_user(user_id).await;
        let mut state = self.store.load_or_default(user_id).await?;
        let stored = store_ai_guide(&mut state, content)?;
        if !stored.events.is_empty() {
            state.updated_at = Some(now);
            self.store.save(user_id, &state).await?;
            self.enqueue(user_id, &stored.events);
        }
        Ok(stored.content)
    }

    /// Cache the externally generated blueprint
    ///
    /// # Errors
    ///
    /// Rejected while the blueprint is locked or the content is blank;
    /// storage failures are propagated
    pub async fn store_blueprint(
        &self,
        user_id: Uuid,
        content: &str,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let _guard = self.lock_user(user_id).await;
        let mut state = self.store.load_or_default(user_id).await?;
        let stored = store_blueprint(&mut state, content)?;
        if !stored.events.is_empty() {
            state.updated_at = Some(now);
            self.store.save(user_id, &state).await?;
            self.enqueue(user_id, &stored.events);
        }
        Ok(stored.content)
    }

    /// Events waiting to be shown, oldest first
    #[must_use]
    pub fn pending_events(&self, user_id: Uuid) -> Vec<MilestoneEvent> {
        self.queues
            .get(&user_id)
            .map(|queue| queue.all())
            .unwrap_or_default()
    }

    /// Remove one shown event
    pub fn dismiss_event(&self, user_id: Uuid, index: usize) -> Option<MilestoneEvent> {
        let dismissed = self
            .queues
            .get_mut(&user_id)
            .and_then(|mut queue| queue.clear_at(index));
        self.queues.remove_if(&user_id, |_, queue| queue.is_empty());
        dismissed
    }

    /// Remove every pending event
    pub fn clear_events(&self, user_id: Uuid) {
        self.queues.remove(&user_id);
    }

    /// Number of per-user lock and queue entries held in memory
    ///
    /// Locks are released once no call holds or waits on them, and a queue
    /// is released once it is empty.
    #[must_use]
    pub fn retained_entries(&self) -> usize {
        self.locks.len() + self.queues.len()
    }

    fn lifecycle(&self) -> ExperimentLifecycle<'_> {
        ExperimentLifecycle::new(self.cache.config())
    }

    async fn apply_usage(
        &self,
        state: MilestoneState,
        records: &[MealRecord],
        now: DateTime<Utc>,
    ) -> AppResult<(MilestoneState, Vec<MilestoneEvent>)> {
        let report = self.cache.report(records, now).await?;
        let usage = UsageSnapshot::from_records(records, &report.confidences, now);
        Ok(milestones::reduce(state, &usage, now))
    }

    async fn lock_user(&self, user_id: Uuid) -> UserGuard<'_> {
        let lock = Arc::clone(self.locks.entry(user_id).or_default().value());
        UserGuard {
            locks: &self.locks,
            user_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    fn enqueue(&self, user_id: Uuid, events: &[MilestoneEvent]) {
        if events.is_empty() {
            return;
        }
        for event in events {
            info!(
                user_id = %user_id,
                event_type = ?event.event_type,
                milestone = %event.milestone_id,
                tier = event.tier,
                "milestone event"
            );
        }
        self.queues
            .entry(user_id)
            .or_default()
            .extend(events.iter().cloned());
    }
}

/// Holds a user's lock and drops the map entry when nobody else needs it
struct UserGuard<'a> {
    locks: &'a DashMap<Uuid, Arc<Mutex<()>>>,
    user_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // A waiter holds its own clone, so a count of one means the map is the only owner
        self.locks.remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
