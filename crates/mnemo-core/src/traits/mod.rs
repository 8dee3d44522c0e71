// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators consumed by the pipeline.

pub mod adapter;
pub mod generative;
pub mod memory;
pub mod registry;
pub mod transcript;

pub use adapter::PluginAdapter;
pub use generative::GenerativeBackend;
pub use memory::VectorMemory;
pub use registry::SessionRegistry;
pub use transcript::TranscriptStore;
