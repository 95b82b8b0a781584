//! Transient user feedback: toast notifications and yes/no confirmation.
//!
//! The core raises notifications from its failure paths; presentation layers
//! decide how to show them.

use std::{
  sync::{Arc, Mutex, PoisonError},
  time::{Duration, Instant},
};

use strum::{AsRefStr, Display};

/// How long a toast stays visible.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

// ─── Notifications ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
  Success,
  Error,
  Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub message:   String,
  pub kind:      NotificationKind,
  pub raised_at: Instant,
}

impl Notification {
  pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
    Self { message: message.into(), kind, raised_at: Instant::now() }
  }

  pub fn is_expired_at(&self, now: Instant) -> bool {
    now.saturating_duration_since(self.raised_at) >= TOAST_LIFETIME
  }
}

/// Receives user-facing notifications.
pub trait Notifier: Send + Sync {
  fn notify(&self, message: &str, kind: NotificationKind);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
  fn notify(&self, message: &str, kind: NotificationKind) {
    (**self).notify(message, kind)
  }
}

/// Forwards notifications to the log. Used where there is no screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  fn notify(&self, message: &str, kind: NotificationKind) {
    match kind {
      NotificationKind::Error => tracing::error!(target: "fitcrm::notify", "{message}"),
      NotificationKind::Success | NotificationKind::Info => {
        tracing::info!(target: "fitcrm::notify", kind = kind.as_ref(), "{message}")
      }
    }
  }
}

/// A single toast slot. Raising a notification replaces whatever is showing.
///
/// Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
  slot: Arc<Mutex<Option<Notification>>>,
}

impl Toasts {
  pub fn new() -> Self { Self::default() }

  /// The toast to show at `now`, if one is still live.
  pub fn current_at(&self, now: Instant) -> Option<Notification> {
    let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.as_ref().is_some_and(|n| n.is_expired_at(now)) {
      *slot = None;
    }
    slot.clone()
  }

  pub fn current(&self) -> Option<Notification> { self.current_at(Instant::now()) }

  pub fn dismiss(&self) {
    *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
  }
}

impl Notifier for Toasts {
  fn notify(&self, message: &str, kind: NotificationKind) {
    tracing::debug!(kind = kind.as_ref(), "{message}");
    *self.slot.lock().unwrap_or_else(PoisonError::into_inner) =
      Some(Notification::new(message, kind));
  }
}

// ─── Confirmation ────────────────────────────────────────────────────────────

/// A blocking yes/no prompt.
pub trait Confirm {
  fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
  F: Fn(&str) -> bool,
{
  fn confirm(&self, message: &str) -> bool { self(message) }
}

/// Answers yes without asking, for `--yes` style invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
  fn confirm(&self, _message: &str) -> bool { true }
}

/// The question asked before deleting a client.
pub fn delete_prompt(name: &str) -> String {
  format!("Are you sure you want to delete {name}?\n\nThis action cannot be undone.")
}
