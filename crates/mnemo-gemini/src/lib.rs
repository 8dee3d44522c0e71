// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini generative backend adapter for Mnemo.
//!
//! Implements the `GenerativeBackend` collaborator contract over the
//! Gemini REST API: `generateContent` for replies and `embedContent`
//! for semantic embeddings.

pub mod backend;
pub mod client;
pub mod types;

pub use backend::GeminiBackend;
pub use client::GeminiClient;
