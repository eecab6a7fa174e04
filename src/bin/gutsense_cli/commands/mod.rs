// ABOUTME: Command implementations for gutsense-cli
// ABOUTME: Analysis, milestone progression, and experiment commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

pub mod analyze;
pub mod experiment;
pub mod progress;
