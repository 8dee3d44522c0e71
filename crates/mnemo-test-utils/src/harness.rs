// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `PipelineHarness` assembles a complete stack: temp SQLite transcript
//! and memory stores, a real room registry, a mock generative backend,
//! and the turn pipeline wired over all of them. Room members connect
//! through plain channels so tests can observe broadcast frames.

use std::sync::Arc;

use tokio::sync::mpsc;

use mnemo_config::model::{PipelineConfig, StorageConfig};
use mnemo_core::types::{ChatId, InboundEvent, Message, PrincipalId, ScoredMemory, SessionId};
use mnemo_core::{MnemoError, TranscriptStore, VectorMemory};
use mnemo_gateway::RoomRegistry;
use mnemo_memory::SqliteVectorMemory;
use mnemo_pipeline::{TurnOutcome, TurnPipeline};
use mnemo_storage::SqliteTranscript;

use crate::mock_backend::MockBackend;

/// Builder for creating pipeline test environments.
pub struct PipelineHarnessBuilder {
    replies: Vec<String>,
    config: PipelineConfig,
}

impl PipelineHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            config: PipelineConfig::default(),
        }
    }

    /// Queue mock backend replies.
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }

    /// Override the pipeline configuration.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the harness, creating temp databases and wiring the stack.
    pub async fn build(self) -> Result<PipelineHarness, MnemoError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| MnemoError::Storage {
            source: e.into(),
        })?;

        let transcript_path = temp_dir.path().join("transcript.db");
        let transcript = SqliteTranscript::new(StorageConfig {
            database_path: transcript_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        transcript.initialize().await?;
        let transcript = Arc::new(transcript);

        let memory_path = temp_dir.path().join("memory.db");
        let memory = SqliteVectorMemory::new(memory_path.to_string_lossy().to_string());
        memory.initialize().await?;
        let memory = Arc::new(memory);

        let backend = Arc::new(if self.replies.is_empty() {
            MockBackend::new()
        } else {
            MockBackend::with_replies(self.replies)
        });

        let registry = Arc::new(RoomRegistry::new());

        let pipeline = Arc::new(TurnPipeline::new(
            transcript.clone(),
            memory.clone(),
            backend.clone(),
            registry.clone(),
            self.config,
        ));

        Ok(PipelineHarness {
            transcript,
            memory,
            backend,
            registry,
            pipeline,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete pipeline test environment over temp storage.
pub struct PipelineHarness {
    /// SQLite transcript store (temp DB, cleaned up on drop).
    pub transcript: Arc<SqliteTranscript>,
    /// SQLite vector memory (temp DB, cleaned up on drop).
    pub memory: Arc<SqliteVectorMemory>,
    /// The mock generative backend.
    pub backend: Arc<MockBackend>,
    /// The real room registry.
    pub registry: Arc<RoomRegistry>,
    /// The pipeline under test.
    pub pipeline: Arc<TurnPipeline>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl PipelineHarness {
    /// Create a new builder.
    pub fn builder() -> PipelineHarnessBuilder {
        PipelineHarnessBuilder::new()
    }

    /// Register a connection and return the receiver observing its frames.
    pub fn connect(&self, session: &str, principal: &str) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(64);
        self.registry.register(
            SessionId(session.to_string()),
            PrincipalId(principal.to_string()),
            tx,
        );
        rx
    }

    /// Join a session to a room.
    pub fn join(&self, session: &str, chat: &str) {
        self.registry
            .join(&SessionId(session.to_string()), &ChatId(chat.to_string()));
    }

    /// Run one turn through the pipeline.
    pub async fn run_turn(
        &self,
        session: &str,
        principal: &str,
        chat: &str,
        content: &str,
    ) -> TurnOutcome {
        self.pipeline
            .run_turn(
                &SessionId(session.to_string()),
                &PrincipalId(principal.to_string()),
                InboundEvent {
                    chat: ChatId(chat.to_string()),
                    content: content.to_string(),
                },
            )
            .await
    }

    /// All transcript messages for a chat, chronological order.
    pub async fn transcript_messages(&self, chat: &str) -> Vec<Message> {
        let mut messages = self
            .transcript
            .find_recent(&ChatId(chat.to_string()), 1000)
            .await
            .expect("transcript query");
        messages.reverse();
        messages
    }

    /// All memory records for a principal, ranked against `vector`.
    pub async fn memories_for(&self, principal: &str, vector: &[f32]) -> Vec<ScoredMemory> {
        self.memory
            .query(vector, 1000, &PrincipalId(principal.to_string()))
            .await
            .expect("memory query")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_backend::DEFAULT_EMBEDDING;
    use mnemo_core::types::Role;

    #[tokio::test]
    async fn harness_builds_and_runs_a_turn() {
        let harness = PipelineHarness::builder()
            .with_replies(vec!["hi there".to_string()])
            .build()
            .await
            .unwrap();

        let mut rx = harness.connect("s1", "u1");
        harness.join("s1", "c1");

        let outcome = harness.run_turn("s1", "u1", "c1", "hello").await;
        assert_eq!(outcome, TurnOutcome::Completed);

        let frame = rx.recv().await.unwrap();
        assert!(frame.contains("hi there"));

        let messages = harness.transcript_messages("c1").await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].role, Role::Model);

        let memories = harness.memories_for("u1", &DEFAULT_EMBEDDING).await;
        assert_eq!(memories.len(), 2);
    }
}
