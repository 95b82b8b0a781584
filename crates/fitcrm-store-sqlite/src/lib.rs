//! SQLite backend for the FitCRM key-value store.
//!
//! A single-file database standing in for browser local storage: one table of
//! string keys and string values, each write a single statement.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
