// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector memory trait: embedding storage and similarity recall.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MemoryRecord, PrincipalId, ScoredMemory};

/// Vector index over per-message embeddings.
///
/// Records are written once per message that reaches the embedding
/// stage and never mutated or deleted by the pipeline; retention is an
/// external concern.
#[async_trait]
pub trait VectorMemory: PluginAdapter {
    /// Stores a memory record. Re-upserting the same record id is a no-op
    /// beyond replacing identical content.
    async fn upsert(&self, record: MemoryRecord) -> Result<(), MnemoError>;

    /// Returns up to `limit` records belonging to `principal`, ranked
    /// most-similar-first against `vector`. The returned ordering is the
    /// index's own ranking; callers must not re-sort it.
    async fn query(
        &self,
        vector: &[f32],
        limit: usize,
        principal: &PrincipalId,
    ) -> Result<Vec<ScoredMemory>, MnemoError>;
}
