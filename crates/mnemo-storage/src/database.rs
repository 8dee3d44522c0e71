// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and schema.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use mnemo_core::MnemoError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Transcript schema, applied idempotently at open.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY NOT NULL,
    chat_id TEXT NOT NULL,
    principal_id TEXT,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_chat_created
    ON messages(chat_id, created_at);
";

/// Convert tokio_rusqlite errors into MnemoError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> MnemoError {
    MnemoError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the transcript database.
///
/// Owns the single tokio-rusqlite connection; all queries go through
/// [`Database::connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies pragmas
    /// and the schema.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, MnemoError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| MnemoError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "busy_timeout", 5000)?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "transcript database opened");
        Ok(Self { conn })
    }

    /// Opens an in-memory database (tests only keep these alive).
    pub async fn open_in_memory() -> Result<Self, MnemoError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| MnemoError::Storage {
                source: Box::new(e),
            })?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        Ok(Self { conn })
    }

    /// Returns the underlying connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoints the WAL and closes the connection.
    pub async fn close(&self) -> Result<(), MnemoError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
