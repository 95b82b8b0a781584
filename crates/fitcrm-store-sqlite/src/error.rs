//! Error type for `fitcrm-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("could not create store directory {path}: {source}")]
  CreateDir {
    path:   std::path::PathBuf,
    #[source]
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
