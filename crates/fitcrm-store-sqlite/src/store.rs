//! [`SqliteStore`] — the SQLite implementation of [`KeyValueStore`].

use std::path::Path;

use fitcrm_core::storage::KeyValueStore;
use rusqlite::{Connection, OptionalExtension as _};

use crate::{Error, Result, schema::SCHEMA};

/// A FitCRM key-value store backed by a single SQLite file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Missing parent directories are created.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
      std::fs::create_dir_all(dir)
        .map_err(|source| Error::CreateDir { path: dir.to_owned(), source })?;
    }

    let store = Self { conn: Connection::open(path)? };
    store.init_schema()?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let store = Self { conn: Connection::open_in_memory()? };
    store.init_schema()?;
    Ok(store)
  }

  fn init_schema(&self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  /// Every key currently stored, sorted.
  pub fn keys(&self) -> Result<Vec<String>> {
    let mut stmt = self.conn.prepare("SELECT key FROM items ORDER BY key")?;
    let keys = stmt
      .query_map([], |row| row.get(0))?
      .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(keys)
  }
}

// ─── KeyValueStore impl ──────────────────────────────────────────────────────

impl KeyValueStore for SqliteStore {
  type Error = Error;

  fn get_item(&self, key: &str) -> Result<Option<String>> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT value FROM items WHERE key = ?1",
          rusqlite::params![key],
          |row| row.get(0),
        )
        .optional()?,
    )
  }

  fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
    self.conn.execute(
      "INSERT INTO items (key, value) VALUES (?1, ?2)
       ON CONFLICT(key) DO UPDATE SET
         value      = excluded.value,
         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
      rusqlite::params![key, value],
    )?;
    Ok(())
  }

  fn remove_item(&mut self, key: &str) -> Result<()> {
    self
      .conn
      .execute("DELETE FROM items WHERE key = ?1", rusqlite::params![key])?;
    Ok(())
  }
}
