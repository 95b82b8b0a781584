//! Error types for `fitcrm-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown client field: {0:?}")]
  UnknownField(String),

  #[error("field {0:?} cannot be changed after creation")]
  ImmutableField(String),

  #[error("malformed assignment {0:?}, expected field=value")]
  MalformedAssignment(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
