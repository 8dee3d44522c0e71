// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed vector memory for the Mnemo chat server.
//!
//! Implements the `VectorMemory` collaborator contract: upsert of
//! (embedding, message reference, metadata) records and principal-scoped
//! top-K similarity queries.

pub mod store;
pub mod types;

pub use store::SqliteVectorMemory;
