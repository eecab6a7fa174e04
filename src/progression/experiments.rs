// ABOUTME: Single-subject elimination experiment lifecycle inside the tier 3 sub-state
// ABOUTME: Start with a baseline from recent meals, attach a trial meal, complete or cancel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

//! # Experiment Lifecycle
//!
//! `none -> active -> completed`, with `cancel` returning to `none` without
//! leaving a trace. Only one experiment is active at a time. Every rejection
//! leaves the state untouched.

use chrono::{DateTime, Utc};
use gutsense_core::constants::{rating, tiers};
use gutsense_core::errors::{AppError, AppResult};
use gutsense_core::models::{
    Experiment, ExperimentResult, MealRecord, MilestoneEvent, MilestoneEventType, MilestoneState,
    TriggerCategory,
};
use gutsense_intelligence::statistics::{mean, round_to};
use gutsense_intelligence::AnalysisConfig;
use tracing::{debug, info};
use uuid::Uuid;

/// Drives experiments stored in a [`MilestoneState`]
pub struct ExperimentLifecycle<'a> {
    config: &'a AnalysisConfig,
}

impl Default for ExperimentLifecycle<'static> {
    fn default() -> Self {
        Self::new(AnalysisConfig::global())
    }
}

impl<'a> ExperimentLifecycle<'a> {
    /// Create a lifecycle with explicit configuration
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Start an experiment against `category`
    ///
    /// The baseline is the mean rating of the most recent completed meals
    /// containing the category, up to the configured control-meal limit. With
    /// no such meals the baseline stays unset.
    ///
    /// # Errors
    ///
    /// `FeatureLocked` before experiments are unlocked, `InvalidState` while
    /// another experiment is active.
    pub fn start(
        &self,
        state: &mut MilestoneState,
        records: &[MealRecord],
        category: TriggerCategory,
        name: &str,
        hypothesis: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Experiment> {
        if !state.tier2.experiments_unlocked {
            return Err(AppError::feature_locked("Experiments"));
        }
        if let Some(active) = state.active_experiment() {
            return Err(AppError::invalid_state(format!(
                "An experiment on {} is already running; cancel it first",
                active.trigger_name
            ))
            .with_resource_id(active.id.to_string()));
        }

        let mut controls: Vec<(&MealRecord, f64)> = records
            .iter()
            .filter(|r| r.created_at <= now && r.contains(category))
            .filter_map(|r| r.qualifying_rating().map(|rating| (r, rating)))
            .collect();
        controls.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
        controls.truncate(self.config.limits.max_control_meals);

        let ratings: Vec<f64> = controls.iter().map(|(_, rating)| *rating).collect();
        let trigger_name = if name.trim().is_empty() {
            category.display_name().to_owned()
        } else {
            name.trim().to_owned()
        };
        let hypothesis = if hypothesis.trim().is_empty() {
            format!("Cutting out {trigger_name} will reduce my bloating")
        } else {
            hypothesis.trim().to_owned()
        };

        let experiment = Experiment {
            id: Uuid::new_v4(),
            trigger_category: category,
            trigger_name,
            hypothesis,
            started_at: now,
            control_meal_ids: controls.iter().map(|(r, _)| r.id.clone()).collect(),
            bloating_with_trigger: mean(&ratings).map(|avg| round_to(avg, 2)),
            experiment_meal_id: None,
            bloating_without_trigger: None,
            completed_at: None,
            result: None,
            percentage_change: None,
            result_explanation: None,
        };

        info!(
            experiment_id = %experiment.id,
            category = %category,
            control_meals = experiment.control_meal_ids.len(),
            baseline = ?experiment.bloating_with_trigger,
            "experiment started"
        );
        state.tier3.current_experiment = Some(experiment.clone());
        Ok(experiment)
    }

    /// Record which meal serves as the trial without the category
    ///
    /// # Errors
    ///
    /// `InvalidState` when no experiment is active.
    pub fn attach_trial_meal(&self, state: &mut MilestoneState, meal_id: &str) -> AppResult<()> {
        let experiment = state
            .tier3
            .current_experiment
            .as_mut()
            .ok_or_else(|| AppError::invalid_state("No experiment is active"))?;
        debug!(experiment_id = %experiment.id, meal_id, "trial meal attached");
        experiment.experiment_meal_id = Some(meal_id.to_owned());
        Ok(())
    }

    /// Complete the active experiment with the trial meal's rating
    ///
    /// The experiment moves into history and one `experiment_complete` event
    /// is returned.
    ///
    /// # Errors
    ///
    /// `InvalidState` when no experiment is active, `InvalidInput` when the
    /// score is outside the rating scale.
    pub fn complete(
        &self,
        state: &mut MilestoneState,
        trial_meal_id: &str,
        bloating_score: u8,
        now: DateTime<Utc>,
    ) -> AppResult<(Experiment, MilestoneEvent)> {
        if state.active_experiment().is_none() {
            return Err(AppError::invalid_state("No experiment is active"));
        }
        if !rating::is_valid(bloating_score) {
            return Err(AppError::invalid_input(format!(
                "Bloating score must be between {} and {}, got {bloating_score}",
                rating::MIN_RATING,
                rating::MAX_RATING
            )));
        }
        let Some(mut experiment) = state.tier3.current_experiment.take() else {
            return Err(AppError::invalid_state("No experiment is active"));
        };

        let trial = f64::from(bloating_score);
        let percentage_change = experiment
            .bloating_with_trigger
            .filter(|baseline| *baseline > 0.0)
            .map(|baseline| round_to((baseline - trial) / baseline * 100.0, 1));
        let result = percentage_change.map_or(ExperimentResult::Inconclusive, |change| {
            self.classify(change)
        });

        experiment.experiment_meal_id = Some(trial_meal_id.to_owned());
        experiment.bloating_without_trigger = Some(trial);
        experiment.completed_at = Some(now);
        experiment.result = Some(result);
        experiment.percentage_change = percentage_change;
        experiment.result_explanation = Some(self.explain(
            &experiment.trigger_name,
            result,
            percentage_change,
        ));

        let tier3 = &mut state.tier3;
        tier3.first_experiment_completed = true;
        if result == ExperimentResult::TriggerConfirmed {
            tier3.causality_confirmed = true;
        }
        tier3.completed_experiments.push(experiment.clone());

        info!(
            experiment_id = %experiment.id,
            category = %experiment.trigger_category,
            result = %result,
            percentage_change = ?percentage_change,
            "experiment completed"
        );

        let event = MilestoneEvent::new(
            MilestoneEventType::ExperimentComplete,
            format!("experiment_{}", experiment.id),
            format!("{} experiment complete", experiment.trigger_name),
            experiment.result_explanation.clone().unwrap_or_default(),
            tiers::EXPERIMENTS,
        );
        Ok((experiment, event))
    }

    /// Drop the active experiment without recording it
    ///
    /// Returns the cancelled experiment, or `None` when nothing was active.
    pub fn cancel(&self, state: &mut MilestoneState) -> Option<Experiment> {
        let cancelled = state.tier3.current_experiment.take();
        if let Some(experiment) = &cancelled {
            info!(experiment_id = %experiment.id, "experiment cancelled");
        }
        cancelled
    }

    /// Classify a relative drop from baseline to trial
    #[must_use]
    pub fn classify(&self, percentage_change: f64) -> ExperimentResult {
        let significance = self.config.thresholds.experiment_significance_percent;
        if percentage_change >= significance {
            ExperimentResult::TriggerConfirmed
        } else if percentage_change <= -significance {
            ExperimentResult::TriggerCleared
        } else {
            ExperimentResult::Inconclusive
        }
    }

    fn explain(
        &self,
        name: &str,
        result: ExperimentResult,
        percentage_change: Option<f64>,
    ) -> String {
        let Some(change) = percentage_change else {
            return format!(
                "There were no earlier rated meals with {name} to compare against, so this experiment is inconclusive."
            );
        };
        match result {
            ExperimentResult::TriggerConfirmed => format!(
                "Your bloating dropped {change:.0}% without {name}. {name} looks like a trigger for you."
            ),
            ExperimentResult::TriggerCleared => format!(
                "Your bloating rose {:.0}% without {name}, so {name} is probably not what bothers you.",
                change.abs()
            ),
            ExperimentResult::Inconclusive => format!(
                "Your bloating changed {change:.0}% without {name}, which is within the {:.0}% noise range. Try repeating the experiment.",
                self.config.thresholds.experiment_significance_percent
            ),
        }
    }
}
