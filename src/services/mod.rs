// ABOUTME: Service layer coordinating storage, analysis, and progression per user
// ABOUTME: Owns the single-writer locking and event queues
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

/// Milestone and experiment orchestration
pub mod progression;

pub use progression::ProgressionService;
