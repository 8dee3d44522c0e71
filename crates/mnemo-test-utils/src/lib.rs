// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Mnemo integration tests.
//!
//! Provides a mock generative backend and a full-stack pipeline harness
//! over temp SQLite databases.

pub mod harness;
pub mod mock_backend;

pub use harness::{PipelineHarness, PipelineHarnessBuilder};
pub use mock_backend::{MockBackend, DEFAULT_EMBEDDING};
