// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message turn pipeline for the Mnemo chat server.
//!
//! Orchestrates one complete turn per inbound user message: durable
//! ingest, embedding, vector memory upsert, semantic + transcript recall,
//! prompt assembly, generation, room broadcast, and best-effort reply
//! persistence — tolerating mid-flight disconnects and partial failures
//! without losing data or corrupting conversation state.

pub mod context;
pub mod pipeline;

pub use context::MEMORY_PREAMBLE;
pub use pipeline::{TurnOutcome, TurnPipeline, ERROR_REPLY};
