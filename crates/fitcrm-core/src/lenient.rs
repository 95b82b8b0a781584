//! Tolerant field decoders for data this crate did not write itself.
//!
//! Stored lists may come from older sessions and exercise data from a remote
//! API; a `null` or a number where a string is expected should not make the
//! whole document unreadable.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::client::FitnessGoal;

/// A string field that also accepts `null` (as empty) and numbers or
/// booleans (as their JSON text).
pub(crate) fn string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
  match Value::deserialize(de)? {
    Value::Null => Ok(String::new()),
    Value::String(s) => Ok(s),
    Value::Number(n) => Ok(n.to_string()),
    Value::Bool(b) => Ok(b.to_string()),
    other => Err(D::Error::custom(format!("expected a string, found {other}"))),
  }
}

pub(crate) fn goal<'de, D: Deserializer<'de>>(de: D) -> Result<FitnessGoal, D::Error> {
  string(de).map(FitnessGoal::from)
}

/// An array field where `null` means empty.
pub(crate) fn list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Value>, D::Error> {
  Ok(Option::<Vec<Value>>::deserialize(de)?.unwrap_or_default())
}

/// Optional timestamps written as `2024-01-01T00:00:00.000Z`.
///
/// Reads any RFC 3339 string or a Unix time in milliseconds; `null` is
/// absent.
pub(crate) mod timestamp {
  use chrono::{DateTime, TimeZone as _, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
  use serde_json::Value;

  pub(crate) const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

  pub(crate) fn serialize<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    ser: S,
  ) -> Result<S::Ok, S::Error> {
    match value {
      Some(t) => ser.serialize_str(&t.format(FORMAT).to_string()),
      None => ser.serialize_none(),
    }
  }

  pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
    de: D,
  ) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Value::deserialize(de)? {
      Value::Null => Ok(None),
      Value::String(s) => DateTime::parse_from_rfc3339(&s)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| D::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
      Value::Number(n) => n
        .as_i64()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp {n}"))),
      other => Err(D::Error::custom(format!("expected a timestamp, found {other}"))),
    }
  }
}
