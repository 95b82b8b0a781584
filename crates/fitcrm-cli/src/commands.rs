//! Non-interactive subcommands.
//!
//! Each command runs one repository or API operation and returns the text to
//! print; `main` owns stdout.

use std::io::{self, BufRead as _, Write as _};

use anyhow::{Context as _, anyhow, bail};
use fitcrm_core::{
  client::{Client, NewClient},
  command::{Command, Outcome, dispatch},
  exercise::Exercise,
  format::{format_date, format_goal},
  notify::{AlwaysConfirm, Confirm},
  patch::ClientPatch,
  render,
  repository::ClientRepository,
  storage::KeyValueStore,
};
use fitcrm_exercises::ExerciseClient;

// ─── Clients ──────────────────────────────────────────────────────────────────

pub fn list<S: KeyValueStore>(
  repo: &ClientRepository<S>,
  search: Option<&str>,
  html: bool,
) -> String {
  let clients = repo.filter(search.unwrap_or_default());
  if html {
    render::client_table_html(&clients)
  } else {
    client_table_text(&clients)
  }
}

pub fn show<S: KeyValueStore>(
  repo: &ClientRepository<S>,
  id: &str,
  json: bool,
) -> anyhow::Result<String> {
  let client = repo
    .get_by_id(id)
    .ok_or_else(|| anyhow!("client not found: {id}"))?;
  if json {
    serde_json::to_string_pretty(client).context("serialising client")
  } else {
    Ok(client_detail_text(client))
  }
}

pub fn add<S: KeyValueStore>(
  repo: &mut ClientRepository<S>,
  data: NewClient,
) -> anyhow::Result<String> {
  match dispatch(repo, Command::Create(data), &AlwaysConfirm) {
    Outcome::Created(client) => Ok(format!("{}\n", client.id)),
    _ => bail!("failed to save client"),
  }
}

pub fn edit<S: KeyValueStore>(
  repo: &mut ClientRepository<S>,
  id: &str,
  assignments: &[String],
) -> anyhow::Result<String> {
  let patch = ClientPatch::from_assignments(assignments)?;
  if patch.is_empty() {
    bail!("nothing to change; pass at least one --set field=value");
  }
  match dispatch(repo, Command::Update { id: id.to_owned(), patch }, &AlwaysConfirm) {
    Outcome::Updated => show(repo, id, false),
    _ => bail!("failed to update client {id}"),
  }
}

pub fn delete<S: KeyValueStore>(
  repo: &mut ClientRepository<S>,
  id: &str,
  confirm: &dyn Confirm,
) -> anyhow::Result<String> {
  match dispatch(repo, Command::Delete { id: id.to_owned() }, confirm) {
    Outcome::Deleted => Ok(String::new()),
    Outcome::Cancelled => Ok("Cancelled.\n".to_owned()),
    _ => bail!("failed to delete client {id}"),
  }
}

/// Remove every stored client.
pub fn reset<S: KeyValueStore>(repo: &mut ClientRepository<S>) -> anyhow::Result<String> {
  let count = repo.len();
  if !repo.adapter_mut().clear() {
    bail!("failed to clear the client list");
  }
  repo.reload();
  Ok(format!("Removed {count} client(s).\n"))
}

// ─── Exercises ────────────────────────────────────────────────────────────────

pub async fn exercises(client: &ExerciseClient, limit: u32, html: bool) -> anyhow::Result<String> {
  let exercises = client
    .fetch_exercises(limit)
    .await
    .context("Failed to load exercises. Please check your connection and try again.")?;
  Ok(if html {
    render::exercise_cards_html(&exercises)
  } else {
    exercise_list_text(&exercises)
  })
}

// ─── Plain-text rendering ─────────────────────────────────────────────────────

const HEADERS: [&str; 6] = ["ID", "Name", "Email", "Phone", "Fitness Goal", "Start Date"];

fn row_cells(client: &Client) -> [String; 6] {
  [
    client.id.clone(),
    client.full_name.clone(),
    client.email.clone(),
    client.phone.clone(),
    format_goal(&client.fitness_goal).to_owned(),
    client.start_date.clone(),
  ]
}

/// A column-aligned table, or a hint when there is nothing to show.
pub fn client_table_text(clients: &[&Client]) -> String {
  if clients.is_empty() {
    return "No clients found. Add your first client with `fitcrm add`.\n".to_owned();
  }

  let rows: Vec<[String; 6]> = clients.iter().map(|c| row_cells(c)).collect();
  let mut widths = HEADERS.map(|h| h.chars().count());
  for row in &rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  let header = HEADERS.map(str::to_owned);
  for row in std::iter::once(&header).chain(&rows) {
    let line: Vec<String> = row
      .iter()
      .zip(widths)
      .map(|(cell, w)| format!("{cell:<w$}"))
      .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
  }
  out
}

pub fn client_detail_text(client: &Client) -> String {
  let mut out = format!(
    "{}\n  ID:           {}\n  Email:        {}\n  Phone:        {}\n  Fitness goal: {}\n  \
     Start date:   {}\n",
    client.full_name,
    client.id,
    client.email,
    client.phone,
    format_goal(&client.fitness_goal),
    format_date(&client.start_date),
  );
  if let Some(created) = client.created_at {
    out.push_str(&format!("  Member since: {}\n", format_date(&created.to_rfc3339())));
  }
  if let Some(updated) = client.updated_at {
    out.push_str(&format!("  Last updated: {}\n", format_date(&updated.to_rfc3339())));
  }
  out
}

pub fn exercise_list_text(exercises: &[Exercise]) -> String {
  if exercises.is_empty() {
    return "No exercises available at this time.\n".to_owned();
  }
  let mut out = String::new();
  for (i, ex) in exercises.iter().enumerate() {
    out.push_str(&format!("{}. {}\n", i + 1, ex.name));
    let description = ex
      .plain_description()
      .unwrap_or_else(|| "No description available".to_owned());
    out.push_str(&format!("   {description}\n"));
  }
  out
}

// ─── Confirmation on stdin ────────────────────────────────────────────────────

/// Asks on stderr and reads the answer from stdin. Anything but `y`/`yes`
/// declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
  fn confirm(&self, message: &str) -> bool {
    let mut stderr = io::stderr();
    let _ = write!(stderr, "{message} [y/N] ");
    let _ = stderr.flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
      return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
  }
}
