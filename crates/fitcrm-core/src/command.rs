//! User actions as data.
//!
//! A presentation layer turns its own events into [`Command`]s and hands them
//! to [`dispatch`], which runs the repository operation, asks for
//! confirmation where needed, and raises the user-facing notification through
//! the repository's notifier.

use crate::{
  client::{Client, NewClient},
  notify::{Confirm, NotificationKind, delete_prompt},
  patch::ClientPatch,
  repository::ClientRepository,
  storage::KeyValueStore,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
  Create(NewClient),
  Update { id: String, patch: ClientPatch },
  Delete { id: String },
  Search(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Created(Client),
  Updated,
  Deleted,
  /// The user declined the confirmation prompt.
  Cancelled,
  Failed,
  /// Identifiers of the matching clients, in list order.
  Matches(Vec<String>),
}

pub fn dispatch<S: KeyValueStore>(
  repo: &mut ClientRepository<S>,
  command: Command,
  confirm: &dyn Confirm,
) -> Outcome {
  let notifier = repo.adapter().notifier().clone();

  match command {
    Command::Create(data) => {
      let before = repo.len();
      let client = repo.create(data);
      if repo.len() > before {
        notifier.notify(&format!("{} has been added", client.full_name), NotificationKind::Success);
        Outcome::Created(client)
      } else {
        Outcome::Failed
      }
    }

    Command::Update { id, patch } => {
      if repo.update(&id, patch) {
        notifier.notify("Client updated", NotificationKind::Success);
        Outcome::Updated
      } else {
        notifier.notify("Failed to update client", NotificationKind::Error);
        Outcome::Failed
      }
    }

    Command::Delete { id } => {
      let name = repo
        .get_by_id(&id)
        .map(|c| c.full_name.clone())
        .unwrap_or_else(|| id.clone());

      if !confirm.confirm(&delete_prompt(&name)) {
        return Outcome::Cancelled;
      }

      if repo.delete(&id) {
        notifier.notify(&format!("{name} has been deleted"), NotificationKind::Success);
        Outcome::Deleted
      } else {
        notifier.notify("Failed to delete client", NotificationKind::Error);
        Outcome::Failed
      }
    }

    Command::Search(term) => {
      Outcome::Matches(repo.filter(&term).into_iter().map(|c| c.id.clone()).collect())
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::RefCell,
    sync::Arc,
  };

  use super::*;
  use crate::{
    notify::{AlwaysConfirm, Toasts},
    storage::{MemoryStore, StorageAdapter},
  };

  fn setup() -> (ClientRepository<MemoryStore>, Toasts) {
    let toasts = Toasts::new();
    let repo = ClientRepository::open(StorageAdapter::with_notifier(
      MemoryStore::new(),
      Arc::new(toasts.clone()),
    ));
    (repo, toasts)
  }

  fn new_client(name: &str) -> NewClient {
    NewClient { full_name: name.into(), ..Default::default() }
  }

  fn created(outcome: Outcome) -> Client {
    match outcome {
      Outcome::Created(c) => c,
      other => panic!("expected Created, got {other:?}"),
    }
  }

  #[test]
  fn create_notifies_success() {
    let (mut repo, toasts) = setup();
    let c = created(dispatch(&mut repo, Command::Create(new_client("Ann")), &AlwaysConfirm));
    assert_eq!(repo.get_by_id(&c.id), Some(&c));
    assert_eq!(toasts.current().unwrap().message, "Ann has been added");
  }

  #[test]
  fn delete_asks_with_client_name() {
    let (mut repo, toasts) = setup();
    let c = created(dispatch(&mut repo, Command::Create(new_client("Jane Doe")), &AlwaysConfirm));

    let asked = RefCell::new(String::new());
    let confirm = |msg: &str| {
      *asked.borrow_mut() = msg.to_owned();
      true
    };

    let outcome = dispatch(&mut repo, Command::Delete { id: c.id.clone() }, &confirm);
    assert_eq!(outcome, Outcome::Deleted);
    assert!(asked.borrow().starts_with("Are you sure you want to delete Jane Doe?"));
    assert_eq!(toasts.current().unwrap().message, "Jane Doe has been deleted");
    assert!(repo.is_empty());
  }

  #[test]
  fn declined_delete_keeps_client() {
    let (mut repo, _) = setup();
    let c = created(dispatch(&mut repo, Command::Create(new_client("Ann")), &AlwaysConfirm));

    let outcome = dispatch(&mut repo, Command::Delete { id: c.id.clone() }, &|_: &str| false);
    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(repo.len(), 1);
  }

  #[test]
  fn delete_missing_reports_failure() {
    let (mut repo, toasts) = setup();
    let outcome = dispatch(&mut repo, Command::Delete { id: "404".into() }, &AlwaysConfirm);
    assert_eq!(outcome, Outcome::Failed);
    let toast = toasts.current().unwrap();
    assert_eq!(toast.message, "Failed to delete client");
    assert_eq!(toast.kind, NotificationKind::Error);
  }

  #[test]
  fn update_round_trip() {
    let (mut repo, toasts) = setup();
    let c = created(dispatch(&mut repo, Command::Create(new_client("Ann")), &AlwaysConfirm));

    let patch = ClientPatch::from_assignments(["phone=555-0200"]).unwrap();
    let outcome = dispatch(&mut repo, Command::Update { id: c.id.clone(), patch }, &AlwaysConfirm);
    assert_eq!(outcome, Outcome::Updated);
    assert_eq!(repo.get_by_id(&c.id).unwrap().phone, "555-0200");
    assert_eq!(toasts.current().unwrap().message, "Client updated");

    let patch = ClientPatch::from_assignments(["phone=1"]).unwrap();
    let outcome = dispatch(&mut repo, Command::Update { id: "nope".into(), patch }, &AlwaysConfirm);
    assert_eq!(outcome, Outcome::Failed);
  }

  #[test]
  fn search_returns_ids_in_order() {
    let (mut repo, _) = setup();
    let a = created(dispatch(&mut repo, Command::Create(new_client("Jane Doe")), &AlwaysConfirm));
    created(dispatch(&mut repo, Command::Create(new_client("Bob")), &AlwaysConfirm));
    let c = created(dispatch(&mut repo, Command::Create(new_client("Mary Jane")), &AlwaysConfirm));

    let outcome = dispatch(&mut repo, Command::Search("jane".into()), &AlwaysConfirm);
    assert_eq!(outcome, Outcome::Matches(vec![a.id, c.id]));
  }
}
