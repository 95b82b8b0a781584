//! Client identifier generation.
//!
//! Identifiers are the decimal Unix time in milliseconds at creation. Within
//! a session the sequence is strictly increasing, so two creates inside the
//! same millisecond still get distinct identifiers.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
  last: i64,
}

impl IdGenerator {
  pub fn new() -> Self { Self::default() }

  /// Never issue an identifier at or below any numeric id already in use.
  pub fn observe(&mut self, id: &str) {
    if let Ok(n) = id.parse::<i64>() {
      self.last = self.last.max(n);
    }
  }

  /// The next identifier for a record created at `now`.
  pub fn next_at(&mut self, now: DateTime<Utc>) -> String {
    let candidate = now.timestamp_millis();
    self.last = if candidate > self.last { candidate } else { self.last + 1 };
    self.last.to_string()
  }
}
