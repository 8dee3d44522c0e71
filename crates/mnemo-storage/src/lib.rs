// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite transcript store for the Mnemo chat server.
//!
//! Implements the `TranscriptStore` collaborator contract: an append-only
//! ordered message log per conversation with a most-recent-N range query.

pub mod adapter;
pub mod database;
pub mod queries;

pub use adapter::SqliteTranscript;
pub use database::Database;
