// ABOUTME: Core types and constants for the gutsense trigger inference engine
// ABOUTME: Foundation crate with error handling, domain models, and the category taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

#![deny(unsafe_code)]

//! # Gutsense Core
//!
//! Foundation crate providing shared types and constants for the gutsense
//! trigger inference engine. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Rating scale, analysis windows, and tier numbering
//! - **models**: Meal records, trigger categories, milestone state, experiments, events

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (meal records, milestone state, experiments, events)
pub mod models;

pub use errors::{AppError, AppResult, ErrorCode};
