// ABOUTME: Integration tests for milestone state persistence backends
// ABOUTME: Round-trips state through the in-memory map and SQLite file and memory databases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{daily_meals, now};
use gutsense::models::{MilestoneState, TriggerCategory};
use gutsense::progression::{milestones, ExperimentLifecycle, UsageSnapshot};
use gutsense::storage::{InMemoryMilestoneStore, MilestoneStore, SqliteMilestoneStore};
use tempfile::TempDir;
use uuid::Uuid;

/// A state with every sub-structure populated, including an active experiment
fn populated_state() -> MilestoneState {
    let records = daily_meals(7, 4, &["dairy", "gluten"]);
    let usage = UsageSnapshot::from_records(&records, &[], now());
    let (mut state, _) = milestones::reduce(MilestoneState::default(), &usage, now());
    ExperimentLifecycle::default()
        .start(&mut state, &records, TriggerCategory::Dairy, "", "", now())
        .unwrap();
    state
}

async fn assert_round_trip(store: &impl MilestoneStore) -> Result<()> {
    let user = Uuid::new_v4();
    assert!(store.load(user).await?.is_none());
    assert_eq!(store.load_or_default(user).await?, MilestoneState::default());

    let state = populated_state();
    store.save(user, &state).await?;
    assert_eq!(store.load(user).await?, Some(state.clone()));

    let mut updated = state;
    updated.tier3.current_experiment = None;
    updated.total_meals_logged += 1;
    store.save(user, &updated).await?;
    assert_eq!(store.load(user).await?, Some(updated));

    assert!(store.load(Uuid::new_v4()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_in_memory_round_trip() -> Result<()> {
    let store = InMemoryMilestoneStore::new();
    assert_round_trip(&store).await?;
    assert_eq!(store.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_in_memory_clones_share_state() -> Result<()> {
    let store = InMemoryMilestoneStore::new();
    let clone = store.clone();
    let user = Uuid::new_v4();
    store.save(user, &populated_state()).await?;
    assert!(clone.load(user).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_sqlite_memory_round_trip() -> Result<()> {
    let store = SqliteMilestoneStore::connect("sqlite::memory:").await?;
    assert_round_trip(&store).await
}

#[tokio::test]
async fn test_sqlite_file_survives_reconnect() -> Result<()> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.path().join("milestones.db").display());
    let user = Uuid::new_v4();
    let state = populated_state();

    {
        let store = SqliteMilestoneStore::connect(&url).await?;
        assert_round_trip(&store).await?;
        store.save(user, &state).await?;
    }

    let reopened = SqliteMilestoneStore::connect(&url).await?;
    assert_eq!(reopened.load(user).await?, Some(state));
    Ok(())
}

#[tokio::test]
async fn test_migrate_is_repeatable() -> Result<()> {
    let store = SqliteMilestoneStore::connect("sqlite::memory:").await?;
    store.migrate().await?;
    let user = Uuid::new_v4();
    let mut state = MilestoneState::default();
    state.total_meals_logged = 1;
    store.save(user, &state).await?;
    store.migrate().await?;
    assert_eq!(store.load(user).await?, Some(state));
    Ok(())
}
