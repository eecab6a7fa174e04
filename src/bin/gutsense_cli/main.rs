// ABOUTME: Gutsense CLI - run trigger analysis and milestone progression over a records file
// ABOUTME: Analyze, progress, and experiment subcommands backed by the SQLite milestone store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors
//!
//! Usage:
//! ```bash
//! # Print the full trigger report as JSON
//! gutsense-cli analyze --records meals.json
//!
//! # Sync milestones for a user and print the new events
//! gutsense-cli progress --records meals.json --user 6f1c... --database-url sqlite:./gutsense.db
//!
//! # Start, complete, or cancel an elimination experiment
//! gutsense-cli experiment start --records meals.json --user 6f1c... --category dairy
//! gutsense-cli experiment complete --records meals.json --user 6f1c... --trial-meal m42 --score 2
//! gutsense-cli experiment cancel --user 6f1c...
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gutsense::config::EngineConfig;
use gutsense::logging::LoggingConfig;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "gutsense-cli",
    about = "Gutsense trigger analysis CLI",
    long_about = "Analyze meal and bloating records, and drive milestone progression and elimination experiments."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (defaults to `GUTSENSE_DATABASE_URL`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Analysis instant as RFC 3339 (defaults to now)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the trigger report for a records file
    Analyze {
        /// JSON array of meal records
        #[arg(long)]
        records: PathBuf,
    },

    /// Sync milestone progression and print new events
    Progress {
        /// JSON array of meal records
        #[arg(long)]
        records: PathBuf,

        /// User the state belongs to
        #[arg(long)]
        user: Uuid,
    },

    /// Elimination experiment commands
    Experiment {
        #[command(subcommand)]
        action: ExperimentCommand,
    },
}

#[derive(Subcommand)]
enum ExperimentCommand {
    /// Start an experiment against a category
    Start {
        /// JSON array of meal records
        #[arg(long)]
        records: PathBuf,

        /// User the experiment belongs to
        #[arg(long)]
        user: Uuid,

        /// Category id or synonym (e.g. `dairy`, `milk`)
        #[arg(long)]
        category: String,

        /// Display name for the suspected trigger
        #[arg(long, default_value = "")]
        name: String,

        /// What the experiment should show
        #[arg(long, default_value = "")]
        hypothesis: String,
    },

    /// Complete the active experiment with the trial meal's rating
    Complete {
        /// JSON array of meal records
        #[arg(long)]
        records: PathBuf,

        /// User the experiment belongs to
        #[arg(long)]
        user: Uuid,

        /// Meal eaten without the category
        #[arg(long)]
        trial_meal: String,

        /// Bloating rating of the trial meal (1-5)
        #[arg(long)]
        score: u8,
    },

    /// Cancel the active experiment
    Cancel {
        /// User the experiment belongs to
        #[arg(long)]
        user: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    LoggingConfig::for_cli(cli.verbose).init()?;

    let mut engine = EngineConfig::from_env();
    if let Some(url) = cli.database_url {
        engine.database_url = url;
    }
    let now = helpers::parse_now(cli.now.as_deref())?;
    debug!(database_url = %engine.database_url, %now, "gutsense-cli starting");

    match cli.command {
        Command::Analyze { records } => commands::analyze::run(&engine, &records, now).await,
        Command::Progress { records, user } => {
            commands::progress::run(&engine, &records, user, now).await
        }
        Command::Experiment { action } => match action {
            ExperimentCommand::Start {
                records,
                user,
                category,
                name,
                hypothesis,
            } => {
                commands::experiment::start(
                    &engine,
                    &records,
                    user,
                    &category,
                    &name,
                    &hypothesis,
                    now,
                )
                .await
            }
            ExperimentCommand::Complete {
                records,
                user,
                trial_meal,
                score,
            } => {
                commands::experiment::complete(&engine, &records, user, &trial_meal, score, now)
                    .await
            }
            ExperimentCommand::Cancel { user } => {
                commands::experiment::cancel(&engine, user, now).await
            }
        },
    }
}
