//! The store a session runs against: the SQLite file, or memory only.

use std::path::Path;

use fitcrm_core::storage::{KeyValueStore, MemoryStore};
use fitcrm_store_sqlite::SqliteStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
  #[error(transparent)]
  Sqlite(#[from] fitcrm_store_sqlite::Error),
}

pub enum Backend {
  Sqlite(SqliteStore),
  Memory(MemoryStore),
}

impl Backend {
  pub fn open(path: &Path) -> fitcrm_store_sqlite::Result<Self> {
    Ok(Self::Sqlite(SqliteStore::open(path)?))
  }

  pub fn ephemeral() -> Self { Self::Memory(MemoryStore::new()) }
}

impl KeyValueStore for Backend {
  type Error = BackendError;

  fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
    match self {
      Self::Sqlite(s) => Ok(s.get_item(key)?),
      Self::Memory(m) => Ok(m.get_item(key).unwrap_or_else(|never| match never {})),
    }
  }

  fn set_item(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
    match self {
      Self::Sqlite(s) => Ok(s.set_item(key, value)?),
      Self::Memory(m) => {
        m.set_item(key, value).unwrap_or_else(|never| match never {});
        Ok(())
      }
    }
  }

  fn remove_item(&mut self, key: &str) -> Result<(), BackendError> {
    match self {
      Self::Sqlite(s) => Ok(s.remove_item(key)?),
      Self::Memory(m) => {
        m.remove_item(key).unwrap_or_else(|never| match never {});
        Ok(())
      }
    }
  }
}
