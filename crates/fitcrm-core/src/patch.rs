//! Typed partial updates.
//!
//! A [`ClientPatch`] names only the fields a caller may change. Identity
//! fields (`id`, `createdAt`) and bookkeeping fields are not representable.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{
  Error, Result,
  client::{Client, FitnessGoal},
};

// ─── Field set ───────────────────────────────────────────────────────────────

/// The enumerated set of mutable client fields.
///
/// Parses from the stored camelCase key or its snake_case spelling.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString,
)]
pub enum ClientField {
  #[strum(to_string = "fullName", serialize = "full_name", serialize = "name")]
  FullName,
  #[strum(to_string = "email")]
  Email,
  #[strum(to_string = "phone")]
  Phone,
  #[strum(to_string = "fitnessGoal", serialize = "fitness_goal", serialize = "goal")]
  FitnessGoal,
  #[strum(to_string = "startDate", serialize = "start_date")]
  StartDate,
}

/// Keys that exist on a record but are owned by the repository.
const IMMUTABLE_KEYS: &[&str] = &[
  "id",
  "createdAt",
  "created_at",
  "updatedAt",
  "updated_at",
  "trainingHistory",
  "training_history",
];

impl ClientField {
  /// Parse a field name supplied at a boundary (CLI flag, form key).
  pub fn parse(name: &str) -> Result<Self> {
    let name = name.trim();
    if IMMUTABLE_KEYS.contains(&name) {
      return Err(Error::ImmutableField(name.to_owned()));
    }
    Self::from_str(name).map_err(|_| Error::UnknownField(name.to_owned()))
  }
}

// ─── ClientPatch ─────────────────────────────────────────────────────────────

/// Fields to overwrite on an existing client; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub full_name:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fitness_goal: Option<FitnessGoal>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_date:   Option<String>,
}

impl ClientPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Set a single field by its enumerated name.
  pub fn set(&mut self, field: ClientField, value: impl Into<String>) -> &mut Self {
    let value = value.into();
    match field {
      ClientField::FullName => self.full_name = Some(value),
      ClientField::Email => self.email = Some(value),
      ClientField::Phone => self.phone = Some(value),
      ClientField::FitnessGoal => self.fitness_goal = Some(FitnessGoal::from(value)),
      ClientField::StartDate => self.start_date = Some(value),
    }
    self
  }

  /// Build a patch from `field=value` assignments, rejecting any field
  /// outside [`ClientField`].
  pub fn from_assignments<I, A>(assignments: I) -> Result<Self>
  where
    I: IntoIterator<Item = A>,
    A: AsRef<str>,
  {
    let mut patch = Self::default();
    for assignment in assignments {
      let assignment = assignment.as_ref();
      let (name, value) = assignment
        .split_once('=')
        .ok_or_else(|| Error::MalformedAssignment(assignment.to_owned()))?;
      patch.set(ClientField::parse(name)?, value);
    }
    Ok(patch)
  }

  /// Overwrite the provided fields on `client`. Identity and timestamps are
  /// left to the caller.
  pub(crate) fn apply_to(self, client: &mut Client) {
    if let Some(v) = self.full_name {
      client.full_name = v;
    }
    if let Some(v) = self.email {
      client.email = v;
    }
    if let Some(v) = self.phone {
      client.phone = v;
    }
    if let Some(v) = self.fitness_goal {
      client.fitness_goal = v;
    }
    if let Some(v) = self.start_date {
      client.start_date = v;
    }
  }
}
