//! Embedded SQLite backend

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::db::error::Result;
use crate::db::storage::{ResolvedConnection, Storage, StorageInfo};

const LAST_UPDATED_KEY: &str = "last_updated";

/// Store backed by a local SQLite database file.
pub struct SqliteStorage {
    resolved: ResolvedConnection,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Opens (and if needed creates) the database behind a resolved
    /// connection. The URL is a filesystem path, or `:memory:` for a
    /// throwaway store.
    pub fn open(resolved: &ResolvedConnection) -> Result<Self> {
        let conn = if resolved.url == ":memory:" {
            Connection::open_in_memory()?
        } else {
            // Ensure parent directory exists
            if let Some(parent) = Path::new(&resolved.url).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            debug!("opening embedded database at {}", resolved.url);
            Connection::open(&resolved.url)?
        };

        conn.execute(
            "CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            resolved: resolved.clone(),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// The driver/url pair this store was opened with.
    pub fn resolved(&self) -> &ResolvedConnection {
        &self.resolved
    }
}

impl Storage for SqliteStorage {
    fn test_connection(&self) -> Result<StorageInfo> {
        let start = Instant::now();
        let conn = self.conn.lock().unwrap();
        let version: String = conn.query_row("SELECT sqlite_version()", [], |row| row.get(0))?;

        Ok(StorageInfo {
            engine_version: Some(format!("SQLite {}", version)),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn last_updated(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let stamp: Option<i64> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![LAST_UPDATED_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(stamp.and_then(|secs| DateTime::from_timestamp(secs, 0)))
    }

    fn mark_updated(&self) -> Result<DateTime<Utc>> {
        let now = Utc::now();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![LAST_UPDATED_KEY, now.timestamp()],
        )?;
        Ok(now)
    }
}
