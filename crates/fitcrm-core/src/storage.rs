//! The persistence boundary.
//!
//! A [`KeyValueStore`] is a string-keyed, string-valued store in the mould of
//! browser local storage. The [`StorageAdapter`] keeps the whole client list
//! under one key as a single JSON document and absorbs every storage failure.
//! A value that is not a JSON array loads as an empty list; single records
//! that do not decode are set aside and written back as they were. Failed
//! writes are logged and reported to the user. None of this is ever returned
//! as an error.

use std::{collections::HashMap, convert::Infallible, sync::Arc};

use serde::{Deserialize as _, Serialize};
use serde_json::Value;

use crate::{
  client::Client,
  notify::{LogNotifier, NotificationKind, Notifier},
};

/// The key the client list is stored under.
pub const STORAGE_KEY: &str = "fitcrm_clients";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a local key-value store backend.
pub trait KeyValueStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The value under `key`, or `None` if nothing is stored.
  fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, replacing any previous value in one step.
  fn set_item(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;

  fn remove_item(&mut self, key: &str) -> Result<(), Self::Error>;
}

// ─── MemoryStore ─────────────────────────────────────────────────────────────

/// A store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  items: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// A store pre-seeded with one raw value.
  pub fn with_item(key: &str, value: &str) -> Self {
    let mut store = Self::new();
    store.items.insert(key.to_owned(), value.to_owned());
    store
  }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  fn get_item(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.items.get(key).cloned())
  }

  fn set_item(&mut self, key: &str, value: &str) -> Result<(), Infallible> {
    self.items.insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  fn remove_item(&mut self, key: &str) -> Result<(), Infallible> {
    self.items.remove(key);
    Ok(())
  }
}

// ─── StorageAdapter ──────────────────────────────────────────────────────────

/// What [`StorageAdapter::load`] found under the key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loaded {
  pub clients:    Vec<Client>,
  /// Entries that are not client records; saved back unchanged.
  pub unreadable: Vec<Value>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a> {
  Client(&'a Client),
  Raw(&'a Value),
}

/// Loads and saves the full client list through a [`KeyValueStore`].
pub struct StorageAdapter<S> {
  store:    S,
  key:      String,
  notifier: Arc<dyn Notifier>,
}

impl<S: KeyValueStore> StorageAdapter<S> {
  /// Wrap `store`, reporting write failures to the log only.
  pub fn new(store: S) -> Self { Self::with_notifier(store, Arc::new(LogNotifier)) }

  pub fn with_notifier(store: S, notifier: Arc<dyn Notifier>) -> Self {
    Self { store, key: STORAGE_KEY.to_owned(), notifier }
  }

  /// Use a key other than [`STORAGE_KEY`].
  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn store_mut(&mut self) -> &mut S { &mut self.store }

  pub fn notifier(&self) -> &Arc<dyn Notifier> { &self.notifier }

  /// The stored list, or an empty list if it is absent or unreadable.
  ///
  /// Only the records that decode are returned; see [`StorageAdapter::load`].
  pub fn load_all(&self) -> Vec<Client> { self.load().clients }

  /// The stored list, split into records that decode and raw entries that do
  /// not.
  ///
  /// A value that is not a JSON array at all loads as empty.
  pub fn load(&self) -> Loaded {
    let raw = match self.store.get_item(&self.key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return Loaded::default(),
      Err(e) => {
        tracing::error!(key = %self.key, error = %e, "error reading client list from storage");
        return Loaded::default();
      }
    };

    let entries: Vec<Value> = match serde_json::from_str(&raw) {
      Ok(entries) => entries,
      Err(e) => {
        tracing::warn!(key = %self.key, error = %e, "stored client list is corrupt; treating as empty");
        return Loaded::default();
      }
    };

    let mut loaded = Loaded::default();
    for entry in entries {
      match Client::deserialize(&entry) {
        Ok(client) => loaded.clients.push(client),
        Err(e) => {
          tracing::warn!(key = %self.key, error = %e, "keeping unreadable client record as stored");
          loaded.unreadable.push(entry);
        }
      }
    }
    loaded
  }

  /// Persist the full list in a single store write.
  ///
  /// Returns `false` if the list was not persisted; the failure has already
  /// been logged and shown to the user.
  pub fn save_all(&mut self, clients: &[Client]) -> bool { self.save(clients, &[]) }

  /// Persist `clients` followed by `unreadable` entries, verbatim.
  pub fn save(&mut self, clients: &[Client], unreadable: &[Value]) -> bool {
    let entries: Vec<Entry<'_>> = clients
      .iter()
      .map(Entry::Client)
      .chain(unreadable.iter().map(Entry::Raw))
      .collect();

    let raw = match serde_json::to_string(&entries) {
      Ok(raw) => raw,
      Err(e) => {
        tracing::error!(error = %e, "error serialising client list");
        self.notifier.notify("Failed to save data", NotificationKind::Error);
        return false;
      }
    };

    match self.store.set_item(&self.key, &raw) {
      Ok(()) => {
        tracing::debug!(key = %self.key, count = entries.len(), "saved client list");
        true
      }
      Err(e) => {
        tracing::error!(key = %self.key, error = %e, "error saving client list to storage");
        self.notifier.notify("Failed to save data", NotificationKind::Error);
        false
      }
    }
  }

  /// Remove the stored list entirely.
  pub fn clear(&mut self) -> bool {
    match self.store.remove_item(&self.key) {
      Ok(()) => true,
      Err(e) => {
        tracing::error!(key = %self.key, error = %e, "error clearing client list");
        self.notifier.notify("Failed to save data", NotificationKind::Error);
        false
      }
    }
  }
}
