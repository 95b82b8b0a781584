//! Error type for `fitcrm-exercises`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("exercise request failed: {0}")]
  Transport(#[source] reqwest::Error),

  #[error("API request failed: {0}")]
  Status(reqwest::StatusCode),

  #[error("could not decode exercise response: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
