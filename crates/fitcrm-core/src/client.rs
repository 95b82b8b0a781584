//! Client records — the single entity kept by the store.
//!
//! The persisted shape uses camelCase keys so that lists written by earlier
//! browser sessions load unchanged. Keys this crate does not know about are
//! carried through in [`Client::extra`] so a load/save round-trip never drops
//! data.

use std::fmt;

use chrono::{DateTime, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

// ─── Fitness goal ────────────────────────────────────────────────────────────

/// The training goal a client signed up for.
///
/// Stored as a kebab-case token. Tokens outside the known set are kept as
/// [`FitnessGoal::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FitnessGoal {
  WeightLoss,
  MuscleGain,
  GeneralFitness,
  Endurance,
  Flexibility,
  Rehabilitation,
  Other(String),
}

impl FitnessGoal {
  /// Every goal offered by the intake form, in form order.
  pub const KNOWN: [FitnessGoal; 6] = [
    Self::WeightLoss,
    Self::MuscleGain,
    Self::GeneralFitness,
    Self::Endurance,
    Self::Flexibility,
    Self::Rehabilitation,
  ];

  /// The token written to storage.
  pub fn token(&self) -> &str {
    match self {
      Self::WeightLoss => "weight-loss",
      Self::MuscleGain => "muscle-gain",
      Self::GeneralFitness => "general-fitness",
      Self::Endurance => "endurance",
      Self::Flexibility => "flexibility",
      Self::Rehabilitation => "rehabilitation",
      Self::Other(token) => token,
    }
  }

  /// Human-readable label; unknown tokens are shown verbatim.
  pub fn label(&self) -> &str {
    match self {
      Self::WeightLoss => "Weight Loss",
      Self::MuscleGain => "Muscle Gain",
      Self::GeneralFitness => "General Fitness",
      Self::Endurance => "Endurance Training",
      Self::Flexibility => "Flexibility",
      Self::Rehabilitation => "Rehabilitation",
      Self::Other(token) => token,
    }
  }
}

impl Default for FitnessGoal {
  fn default() -> Self { Self::Other(String::new()) }
}

impl From<&str> for FitnessGoal {
  fn from(token: &str) -> Self {
    match token {
      "weight-loss" => Self::WeightLoss,
      "muscle-gain" => Self::MuscleGain,
      "general-fitness" => Self::GeneralFitness,
      "endurance" => Self::Endurance,
      "flexibility" => Self::Flexibility,
      "rehabilitation" => Self::Rehabilitation,
      other => Self::Other(other.to_owned()),
    }
  }
}

impl From<String> for FitnessGoal {
  fn from(token: String) -> Self { Self::from(token.as_str()) }
}

impl From<FitnessGoal> for String {
  fn from(goal: FitnessGoal) -> Self {
    match goal {
      FitnessGoal::Other(token) => token,
      known => known.token().to_owned(),
    }
  }
}

impl fmt::Display for FitnessGoal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.token())
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// A persisted client record.
///
/// `id` and `created_at` are assigned by
/// [`ClientRepository::create`](crate::repository::ClientRepository::create)
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
  #[serde(default, deserialize_with = "lenient::string")]
  pub id:               String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub full_name:        String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub email:            String,
  #[serde(default, deserialize_with = "lenient::string")]
  pub phone:            String,
  #[serde(default, deserialize_with = "lenient::goal")]
  pub fitness_goal:     FitnessGoal,
  /// Free-form start date as entered, normally `YYYY-MM-DD`.
  #[serde(default, deserialize_with = "lenient::string")]
  pub start_date:       String,
  /// Always set on records created here; older stored records may lack it.
  #[serde(default, with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
  pub created_at:       Option<DateTime<Utc>>,
  #[serde(default, with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
  pub updated_at:       Option<DateTime<Utc>>,
  /// Always empty at creation; entries are opaque to this crate.
  #[serde(default, deserialize_with = "lenient::list")]
  pub training_history: Vec<Value>,
  /// Stored keys not modelled above.
  #[serde(flatten)]
  pub extra:            Map<String, Value>,
}

// ─── NewClient ───────────────────────────────────────────────────────────────

/// Caller-supplied fields for
/// [`ClientRepository::create`](crate::repository::ClientRepository::create).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
  pub full_name:    String,
  pub email:        String,
  pub phone:        String,
  pub fitness_goal: FitnessGoal,
  pub start_date:   String,
}

impl NewClient {
  /// Build the full record. Identity fields come from the repository.
  pub(crate) fn into_client(self, id: String, created_at: DateTime<Utc>) -> Client {
    Client {
      id,
      full_name: self.full_name,
      email: self.email,
      phone: self.phone,
      fitness_goal: self.fitness_goal,
      start_date: self.start_date,
      created_at: Some(created_at),
      updated_at: None,
      training_history: Vec::new(),
      extra: Map::new(),
    }
  }
}

/// Current time at the millisecond precision stored timestamps carry.
pub(crate) fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }
