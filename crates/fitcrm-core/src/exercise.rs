//! Exercise suggestions as returned by the remote exercise API.
//!
//! Suggestions are display-only; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::{format::strip_html, lenient};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:          Option<u64>,
  #[serde(default, deserialize_with = "lenient::string")]
  pub name:        String,
  /// HTML fragment; never display it without sanitising. `null` reads as
  /// empty.
  #[serde(default, deserialize_with = "lenient::string")]
  pub description: String,
}

impl Exercise {
  /// The description reduced to plain text, or `None` if nothing remains.
  pub fn plain_description(&self) -> Option<String> {
    let text = strip_html(&self.description);
    (!text.is_empty()).then_some(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_description_strips_markup() {
    let ex = Exercise {
      description: "<p>Keep your <em>back</em> straight.</p>".into(),
      ..Default::default()
    };
    assert_eq!(ex.plain_description().as_deref(), Some("Keep your back straight."));
  }

  #[test]
  fn blank_description_is_none() {
    let ex = Exercise { description: "<p> </p>".into(), ..Default::default() };
    assert!(ex.plain_description().is_none());
  }

  #[test]
  fn decodes_api_shape_with_extra_fields() {
    let ex: Exercise = serde_json::from_str(
      r#"{"id": 345, "uuid": "c788d643", "name": "Squat", "description": "<p>Go low</p>", "category": 9}"#,
    )
    .unwrap();
    assert_eq!(ex.id, Some(345));
    assert_eq!(ex.name, "Squat");
  }

  #[test]
  fn null_fields_read_as_empty() {
    let ex: Exercise =
      serde_json::from_str(r#"{"id": 1, "name": "Squat", "description": null}"#).unwrap();
    assert_eq!(ex.name, "Squat");
    assert!(ex.plain_description().is_none());

    let ex: Exercise = serde_json::from_str(r#"{"id": null, "name": null}"#).unwrap();
    assert_eq!(ex, Exercise::default());
  }
}
