//! Database schema, applied idempotently on open.

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS items (
  key        TEXT PRIMARY KEY NOT NULL,
  value      TEXT NOT NULL,
  updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";
