// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generative backend for deterministic testing.
//!
//! `MockBackend` implements `GenerativeBackend` with pre-configured
//! replies and embeddings, scripted failures, and call recording,
//! enabling fast CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mnemo_core::types::ContextTurn;
use mnemo_core::{
    AdapterType, GenerativeBackend, HealthStatus, MnemoError, PluginAdapter,
};

/// Default embedding returned when no scripted embedding is queued.
pub const DEFAULT_EMBEDDING: [f32; 3] = [1.0, 0.0, 0.0];

/// A mock generative backend with scripted replies and failures.
///
/// Replies and embeddings are popped from FIFO queues; when a queue is
/// empty a default is returned ("mock reply" / [`DEFAULT_EMBEDDING`]).
pub struct MockBackend {
    replies: Mutex<VecDeque<String>>,
    embeddings: Mutex<VecDeque<Vec<f32>>>,
    /// Fail embed calls whose 0-based index is >= this threshold.
    embed_failures_from: Mutex<Option<usize>>,
    fail_generate: AtomicBool,
    generate_delay: Mutex<Option<Duration>>,
    embed_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    last_turns: Mutex<Option<Vec<ContextTurn>>>,
}

impl MockBackend {
    /// Create a new mock backend with empty queues.
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            embeddings: Mutex::new(VecDeque::new()),
            embed_failures_from: Mutex::new(None),
            fail_generate: AtomicBool::new(false),
            generate_delay: Mutex::new(None),
            embed_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            last_turns: Mutex::new(None),
        }
    }

    /// Create a mock backend pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            ..Self::new()
        }
    }

    /// Queue a reply.
    pub async fn add_reply(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(text.into());
    }

    /// Queue an embedding.
    pub async fn add_embedding(&self, vector: Vec<f32>) {
        self.embeddings.lock().await.push_back(vector);
    }

    /// Make every generate call fail.
    pub fn set_fail_generate(&self, fail: bool) {
        self.fail_generate.store(fail, Ordering::SeqCst);
    }

    /// Make embed calls fail starting at the given 0-based call index.
    ///
    /// `fail_embed_from(0)` fails every call; `fail_embed_from(1)` lets
    /// the first call (a turn's ingest embed) succeed and fails the rest.
    pub async fn fail_embed_from(&self, index: usize) {
        *self.embed_failures_from.lock().await = Some(index);
    }

    /// Delay generate calls, simulating a slow model.
    pub async fn set_generate_delay(&self, delay: Duration) {
        *self.generate_delay.lock().await = Some(delay);
    }

    /// Number of embed calls so far.
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    /// Number of generate calls so far.
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// The turns passed to the most recent generate call.
    pub async fn last_turns(&self) -> Option<Vec<ContextTurn>> {
        self.last_turns.lock().await.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generative
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, MnemoError> {
        let index = self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(from) = *self.embed_failures_from.lock().await {
            if index >= from {
                return Err(MnemoError::Provider {
                    message: "mock embed failure".into(),
                    source: None,
                });
            }
        }
        Ok(self
            .embeddings
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| DEFAULT_EMBEDDING.to_vec()))
    }

    async fn generate(&self, turns: &[ContextTurn]) -> Result<String, MnemoError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_turns.lock().await = Some(turns.to_vec());

        let delay = *self.generate_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(MnemoError::Provider {
                message: "mock generate failure".into(),
                source: None,
            });
        }

        Ok(self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock reply".to_string()))
    }
}
