//! [`ClientRepository`] — CRUD over the client list.
//!
//! The repository is a pure merge/persist layer. It assigns identity and
//! timestamps and keeps them immutable, but performs no validation of the
//! caller's data: email/phone format, empty names and the like are checked
//! upstream, if at all.

use serde_json::Value;

use crate::{
  client::{self, Client, NewClient},
  id::IdGenerator,
  patch::ClientPatch,
  search,
  storage::{KeyValueStore, StorageAdapter},
};

/// Owns the in-session client list and the adapter it is persisted through.
///
/// Construct once per session with [`ClientRepository::open`]; every mutation
/// is flushed immediately.
pub struct ClientRepository<S> {
  adapter:    StorageAdapter<S>,
  clients:    Vec<Client>,
  /// Stored entries that are not client records, written back untouched.
  unreadable: Vec<Value>,
  ids:        IdGenerator,
}

impl<S: KeyValueStore> ClientRepository<S> {
  /// Load the stored list and take ownership of `adapter`.
  pub fn open(adapter: StorageAdapter<S>) -> Self {
    let mut repo = Self {
      adapter,
      clients: Vec::new(),
      unreadable: Vec::new(),
      ids: IdGenerator::new(),
    };
    repo.reload();
    repo
  }

  /// Discard the in-session list and read it again from storage.
  pub fn reload(&mut self) {
    let loaded = self.adapter.load();
    self.clients = loaded.clients;
    self.unreadable = loaded.unreadable;
    for c in &self.clients {
      self.ids.observe(&c.id);
    }
    tracing::debug!(
      count = self.clients.len(),
      unreadable = self.unreadable.len(),
      "loaded clients"
    );
  }

  /// Write the in-session list back to storage.
  pub fn flush(&mut self) -> bool { self.adapter.save(&self.clients, &self.unreadable) }

  pub fn adapter(&self) -> &StorageAdapter<S> { &self.adapter }

  pub fn adapter_mut(&mut self) -> &mut StorageAdapter<S> { &mut self.adapter }

  /// All clients in insertion order.
  pub fn list(&self) -> &[Client] { &self.clients }

  pub fn len(&self) -> usize { self.clients.len() }

  pub fn is_empty(&self) -> bool { self.clients.is_empty() }

  /// Stored entries that could not be read as clients.
  pub fn unreadable(&self) -> &[Value] { &self.unreadable }

  // ── CRUD ──────────────────────────────────────────────────────────────────

  /// Append a new client built from `data` and persist the list.
  ///
  /// The record is returned even if persisting failed; in that case the
  /// failure has been reported and the in-session list is left unchanged.
  pub fn create(&mut self, data: NewClient) -> Client {
    let created_at = client::now();
    let id = self.ids.next_at(created_at);
    let new_client = data.into_client(id, created_at);

    self.clients.push(new_client.clone());
    if self.flush() {
      tracing::info!(id = %new_client.id, "created client");
    } else {
      self.clients.pop();
    }
    new_client
  }

  /// The first client with identifier `id`.
  pub fn get_by_id(&self, id: &str) -> Option<&Client> {
    self.clients.iter().find(|c| c.id == id)
  }

  /// Merge `patch` over the client with identifier `id`.
  ///
  /// Returns `false` without touching anything if no such client exists, or
  /// if the updated list could not be persisted.
  pub fn update(&mut self, id: &str, patch: ClientPatch) -> bool {
    let Some(index) = self.clients.iter().position(|c| c.id == id) else {
      tracing::error!(%id, "client not found");
      return false;
    };

    let previous = self.clients[index].clone();
    let target = &mut self.clients[index];
    patch.apply_to(target);
    target.updated_at = Some(client::now());

    if self.flush() {
      tracing::info!(%id, "updated client");
      true
    } else {
      self.clients[index] = previous;
      false
    }
  }

  /// Remove every client with identifier `id`.
  ///
  /// Returns `false` if nothing matched or the shortened list could not be
  /// persisted.
  pub fn delete(&mut self, id: &str) -> bool {
    let before = self.clients.len();
    let previous = self.clients.clone();
    self.clients.retain(|c| c.id != id);

    if self.clients.len() == before {
      tracing::error!(%id, "client not found");
      return false;
    }

    if self.flush() {
      tracing::info!(%id, "deleted client");
      true
    } else {
      self.clients = previous;
      false
    }
  }

  /// Clients whose name contains `term`, ignoring case.
  pub fn filter(&self, term: &str) -> Vec<&Client> { search::filter(&self.clients, term) }
}
