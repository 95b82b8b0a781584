//! Core types and operations for the FitCRM client record manager.
//!
//! This crate owns the record model, the persistence boundary (a
//! [`storage::KeyValueStore`] wrapped by a [`storage::StorageAdapter`]) and
//! the [`repository::ClientRepository`] that enforces identity and timestamp
//! rules. It has no HTTP or database dependencies; concrete stores and the
//! exercise API client live in their own crates.

pub mod client;
pub mod command;
pub mod error;
pub mod exercise;
pub mod format;
pub mod id;
mod lenient;
pub mod notify;
pub mod patch;
pub mod render;
pub mod repository;
pub mod search;
pub mod storage;

pub use error::{Error, Result};
