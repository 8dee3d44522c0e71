// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generative backend trait: embedding and text generation as two opaque remote calls.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ContextTurn;

/// Remote model backend consumed by the pipeline.
///
/// Both operations are opaque: the pipeline makes no assumption about
/// the model behind them beyond the signatures here.
#[async_trait]
pub trait GenerativeBackend: PluginAdapter {
    /// Computes a semantic embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError>;

    /// Generates a reply from an ordered sequence of prompt turns.
    ///
    /// This is the single highest-latency call in a turn; callers are
    /// expected to bound it with a deadline.
    async fn generate(&self, turns: &[ContextTurn]) -> Result<String, MnemoError>;
}
