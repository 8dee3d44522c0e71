// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TranscriptStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use mnemo_config::model::StorageConfig;
use mnemo_core::types::{ChatId, Message, MessageId, PrincipalId, Role};
use mnemo_core::{
    AdapterType, HealthStatus, MnemoError, PluginAdapter, TranscriptStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed transcript store.
///
/// Wraps a [`Database`] handle and delegates query operations to the
/// typed query modules. The database is lazily opened on the first call
/// to [`SqliteTranscript::initialize`].
pub struct SqliteTranscript {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteTranscript {
    /// Create a new SqliteTranscript with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SqliteTranscript::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Opens the database at the configured path.
    pub async fn initialize(&self) -> Result<(), MnemoError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| MnemoError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "transcript store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, MnemoError> {
        self.db.get().ok_or_else(|| MnemoError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteTranscript {
    fn name(&self) -> &str {
        "sqlite-transcript"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TranscriptStore for SqliteTranscript {
    async fn create(
        &self,
        chat: &ChatId,
        principal: Option<&PrincipalId>,
        content: &str,
        role: Role,
    ) -> Result<Message, MnemoError> {
        let msg = Message {
            id: MessageId(uuid::Uuid::new_v4().to_string()),
            chat_id: chat.clone(),
            principal_id: principal.cloned(),
            role,
            content: content.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        queries::messages::insert_message(self.db()?, &msg).await?;
        debug!(
            chat = %msg.chat_id,
            role = %msg.role,
            message_id = msg.id.as_str(),
            "message appended"
        );
        Ok(msg)
    }

    async fn find_recent(
        &self,
        chat: &ChatId,
        limit: usize,
    ) -> Result<Vec<Message>, MnemoError> {
        queries::messages::recent_messages(self.db()?, chat, limit).await
    }
}
