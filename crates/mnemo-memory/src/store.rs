// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed vector memory with BLOB embedding storage.
//!
//! Implements the `VectorMemory` contract: principal-scoped top-K cosine
//! similarity over per-message embeddings. Candidate embeddings are
//! loaded per query and ranked in process; the candidate set is one
//! principal's records, not the whole index.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tokio_rusqlite::Connection;
use tracing::debug;

use mnemo_core::types::{
    ChatId, MemoryMetadata, MemoryRecord, MessageId, PrincipalId, ScoredMemory,
};
use mnemo_core::{AdapterType, HealthStatus, MnemoError, PluginAdapter, VectorMemory};

use crate::types::{blob_to_vec, cosine_similarity, vec_to_blob};

/// Memory schema, applied idempotently at open.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS memory_records (
    id TEXT PRIMARY KEY NOT NULL,
    message_id TEXT NOT NULL,
    chat_id TEXT NOT NULL,
    principal_id TEXT NOT NULL,
    text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_memory_principal ON memory_records(principal_id);
";

/// Helper to convert tokio_rusqlite errors into MnemoError::Memory.
fn memory_err(e: tokio_rusqlite::Error) -> MnemoError {
    MnemoError::Memory {
        source: Box::new(e),
    }
}

/// Persistent vector memory in SQLite.
///
/// Embeddings are stored as little-endian f32 BLOBs. The connection is
/// lazily opened on the first call to [`SqliteVectorMemory::initialize`].
pub struct SqliteVectorMemory {
    database_path: String,
    conn: OnceCell<Connection>,
}

impl SqliteVectorMemory {
    /// Create a new store for the database at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            database_path: path.into(),
            conn: OnceCell::new(),
        }
    }

    /// Opens the database and applies the schema.
    pub async fn initialize(&self) -> Result<(), MnemoError> {
        let conn = Connection::open(&self.database_path)
            .await
            .map_err(|e| MnemoError::Memory {
                source: Box::new(e),
            })?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update(None, "busy_timeout", 5000)?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(memory_err)?;
        self.conn.set(conn).map_err(|_| MnemoError::Memory {
            source: "memory store already initialized".into(),
        })?;
        debug!(path = %self.database_path, "vector memory initialized");
        Ok(())
    }

    fn conn(&self) -> Result<&Connection, MnemoError> {
        self.conn.get().ok_or_else(|| MnemoError::Memory {
            source: "memory store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteVectorMemory {
    fn name(&self) -> &str {
        "sqlite-vector-memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Memory
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        let conn = self.conn()?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch("SELECT 1;")?;
            Ok(())
        })
        .await
        .map_err(memory_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl VectorMemory for SqliteVectorMemory {
    async fn upsert(&self, record: MemoryRecord) -> Result<(), MnemoError> {
        let embedding_blob = vec_to_blob(&record.embedding);
        self.conn()?
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO memory_records
                     (id, message_id, chat_id, principal_id, text, embedding, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    rusqlite::params![
                        record.id,
                        record.message_id.0,
                        record.metadata.chat_id.0,
                        record.metadata.principal_id.0,
                        record.metadata.text,
                        embedding_blob,
                        record.created_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(memory_err)
    }

    async fn query(
        &self,
        vector: &[f32],
        limit: usize,
        principal: &PrincipalId,
    ) -> Result<Vec<ScoredMemory>, MnemoError> {
        let principal_id = principal.0.clone();
        let candidates = self
            .conn()?
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, message_id, chat_id, principal_id, text, embedding, created_at
                     FROM memory_records WHERE principal_id = ?1",
                )?;
                let rows = stmt.query_map(rusqlite::params![principal_id], |row| {
                    let blob: Vec<u8> = row.get(5)?;
                    Ok(MemoryRecord {
                        id: row.get(0)?,
                        message_id: MessageId(row.get(1)?),
                        embedding: blob_to_vec(&blob),
                        metadata: MemoryMetadata {
                            chat_id: ChatId(row.get(2)?),
                            principal_id: PrincipalId(row.get(3)?),
                            text: row.get(4)?,
                        },
                        created_at: row.get(6)?,
                    })
                })?;
                let mut records = Vec::new();
                for row in rows {
                    records.push(row?);
                }
                Ok(records)
            })
            .await
            .map_err(memory_err)?;

        let mut scored: Vec<ScoredMemory> = candidates
            .into_iter()
            .filter(|r| r.embedding.len() == vector.len())
            .map(|record| {
                let score = cosine_similarity(vector, &record.embedding);
                ScoredMemory { record, score }
            })
            .collect();

        // Stable sort: equal scores keep scan order, which downstream
        // consumers treat as the index's own tiebreak.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        Ok(scored)
    }
}
