// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mnemo chat server.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Mnemo workspace. All collaborator
//! adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MnemoError;
pub use types::{
    AdapterType, ChatId, HealthStatus, MessageId, PrincipalId, Role, SessionId,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    GenerativeBackend, PluginAdapter, SessionRegistry, TranscriptStore, VectorMemory,
};
