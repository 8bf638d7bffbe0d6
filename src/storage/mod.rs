//! Persistence
//!
//! Everything the tool remembers between runs is a string under a fixed key.
//! [`KeyValueStore`] is the capability; [`SqliteStore`] backs it on disk and
//! `MemoryStore` backs it in tests. [`PaletteStore`] layers the owned-palette
//! bookkeeping on top with a best-effort policy: storage errors are logged
//! and swallowed, never returned.

#[cfg(test)]
pub mod memory;
pub mod palette_store;

use anyhow::Context;
use rusqlite::{Connection, params};
use std::path::PathBuf;

#[cfg(test)]
pub use memory::MemoryStore;
pub use palette_store::PaletteStore;

/// Fallible string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// SQLite-backed store. A connection is opened per operation and dropped
/// before returning.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> anyhow::Result<Connection> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        conn.execute_batch(
            r#"
CREATE TABLE IF NOT EXISTS kv (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  updated_at INTEGER NOT NULL
);
"#,
        )
        .context("init schema")?;
        Ok(conn)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT value FROM kv WHERE key=?1")
            .context("prepare kv get")?;
        let mut rows = stmt.query(params![key]).context("query kv")?;
        if let Some(row) = rows.next().context("read kv row")? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let now_unix = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        self.open()?
            .execute(
                r#"
INSERT INTO kv(key, value, updated_at)
VALUES(?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET
  value=excluded.value,
  updated_at=excluded.updated_at
"#,
                params![key, value, now_unix],
            )
            .with_context(|| format!("write kv {key}"))?;
        Ok(())
    }
}
