//! Runtime configuration.
//!
//! Layered lowest to highest: built-in defaults, the optional TOML file,
//! `FITCRM_*` environment variables, then command-line flags (applied by the
//! caller).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use fitcrm_exercises::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_LIMIT, ExerciseConfig};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite file holding the client list. `~` is expanded.
  pub store_path:           PathBuf,
  pub exercise_api_base:    String,
  pub exercise_language:    u32,
  pub exercise_limit:       u32,
  /// No timeout when unset.
  pub request_timeout_secs: Option<u64>,
  /// Where the terminal UI writes its log; defaults to beside the store.
  pub log_file:             Option<PathBuf>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:           PathBuf::from("~/.fitcrm/fitcrm.db"),
      exercise_api_base:    DEFAULT_BASE_URL.to_owned(),
      exercise_language:    DEFAULT_LANGUAGE,
      exercise_limit:       DEFAULT_LIMIT,
      request_timeout_secs: None,
      log_file:             None,
    }
  }
}

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FITCRM").try_parsing(true))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    settings.log_file = settings.log_file.as_deref().map(expand_tilde);
    Ok(settings)
  }

  pub fn exercise_config(&self) -> ExerciseConfig {
    ExerciseConfig {
      base_url: self.exercise_api_base.clone(),
      language: self.exercise_language,
      timeout:  self.request_timeout_secs.map(Duration::from_secs),
    }
  }

  /// The TUI log file: configured, or `fitcrm.log` next to the store.
  pub fn log_path(&self) -> PathBuf {
    self
      .log_file
      .clone()
      .unwrap_or_else(|| self.store_path.with_file_name("fitcrm.log"))
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  fn temp_config(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
      "fitcrm-settings-{}-{name}.toml",
      std::process::id()
    ));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
  }

  #[test]
  fn missing_file_gives_defaults() {
    let path = std::env::temp_dir().join("fitcrm-settings-does-not-exist.toml");
    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.exercise_api_base, "https://wger.de/api/v2");
    assert_eq!(settings.exercise_language, 2);
    assert_eq!(settings.exercise_limit, 5);
    assert!(settings.request_timeout_secs.is_none());
  }

  #[test]
  fn file_values_override_defaults() {
    let path = temp_config(
      "override",
      "store_path = \"/tmp/fitcrm-test/clients.db\"\nexercise_limit = 8\nrequest_timeout_secs = 10\n",
    );
    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("/tmp/fitcrm-test/clients.db"));
    assert_eq!(settings.exercise_limit, 8);
    assert_eq!(settings.exercise_api_base, "https://wger.de/api/v2");
    assert_eq!(
      settings.exercise_config().timeout,
      Some(Duration::from_secs(10))
    );
    assert_eq!(settings.log_path(), PathBuf::from("/tmp/fitcrm-test/fitcrm.log"));
    let _ = std::fs::remove_file(path);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/data/fitcrm.db")),
      PathBuf::from(home).join("data/fitcrm.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs/x.db")), PathBuf::from("/abs/x.db"));
  }
}
