//! HTML renderers for the client table and exercise cards.
//!
//! Every piece of record or API text passes through [`escape_html`] before it
//! reaches markup, attributes included. Actions are exposed as `data-action`
//! attributes for the host page to bind; no inline script is emitted.

use crate::{
  client::Client,
  exercise::Exercise,
  format::{escape_html, format_goal},
};

const COLUMNS: [&str; 6] = ["Name", "Email", "Phone", "Fitness Goal", "Start Date", "Actions"];

/// Table body rows for `clients`, or the empty-state row.
pub fn client_rows_html(clients: &[&Client]) -> String {
  if clients.is_empty() {
    return format!(
      "<tr>\n  <td colspan=\"{}\" class=\"empty-state\">No clients found. <a \
       href=\"add-client.html\">Add your first client</a></td>\n</tr>\n",
      COLUMNS.len()
    );
  }

  let mut html = String::new();
  for client in clients {
    html.push_str(&client_row_html(client));
  }
  html
}

fn client_row_html(client: &Client) -> String {
  let id = escape_html(&client.id);
  let name = escape_html(&client.full_name);
  format!(
    "<tr class=\"client-row\" data-client-id=\"{id}\">\n  <td \
     data-label=\"Name\">{name}</td>\n  <td data-label=\"Email\">{email}</td>\n  <td \
     data-label=\"Phone\">{phone}</td>\n  <td data-label=\"Fitness Goal\">{goal}</td>\n  <td \
     data-label=\"Start Date\">{start}</td>\n  <td data-label=\"Actions\">\n    <button \
     class=\"btn-action btn-edit\" data-action=\"edit\" \
     data-client-id=\"{id}\">Edit</button>\n    <button class=\"btn-action btn-delete\" \
     data-action=\"delete\" data-client-id=\"{id}\" \
     data-client-name=\"{name}\">Delete</button>\n  </td>\n</tr>\n",
    email = escape_html(&client.email),
    phone = escape_html(&client.phone),
    goal = escape_html(format_goal(&client.fitness_goal)),
    start = escape_html(&client.start_date),
  )
}

/// A complete client table, header included.
pub fn client_table_html(clients: &[&Client]) -> String {
  let header: String = COLUMNS.iter().map(|c| format!("<th>{c}</th>")).collect();
  format!(
    "<table class=\"client-table\">\n<thead><tr>{header}</tr></thead>\n<tbody \
     id=\"clientTableBody\">\n{}</tbody>\n</table>\n",
    client_rows_html(clients)
  )
}

/// Numbered exercise cards, or the empty-state paragraph.
pub fn exercise_cards_html(exercises: &[Exercise]) -> String {
  if exercises.is_empty() {
    return "<p class=\"no-data\">No exercises available at this time.</p>\n".to_owned();
  }

  let mut html = String::new();
  for (index, exercise) in exercises.iter().enumerate() {
    let description = exercise
      .plain_description()
      .map(|d| escape_html(&d))
      .unwrap_or_else(|| "No description available".to_owned());
    html.push_str(&format!(
      "<div class=\"exercise-card\">\n  <div class=\"exercise-number\">{}</div>\n  \
       <h4>{}</h4>\n  <p class=\"exercise-description\">{description}</p>\n</div>\n",
      index + 1,
      escape_html(&exercise.name),
    ));
  }
  html
}

pub fn loading_html() -> &'static str {
  "<div class=\"loading-spinner\">\n  <div class=\"spinner\"></div>\n  <p>Loading \
   exercises...</p>\n</div>\n"
}

pub fn error_state_html(message: &str) -> String {
  format!(
    "<div class=\"error-state\">\n  <p class=\"error-message\">{}</p>\n  <button class=\"btn \
     btn-secondary\" data-action=\"retry\">Try Again</button>\n</div>\n",
    escape_html(message)
  )
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::client::{FitnessGoal, NewClient};

  fn client(name: &str) -> Client {
    NewClient {
      full_name:    name.into(),
      email:        "x@y.z".into(),
      phone:        "555".into(),
      fitness_goal: FitnessGoal::MuscleGain,
      start_date:   "2024-01-01".into(),
    }
    .into_client("42".into(), Utc::now())
  }

  #[test]
  fn empty_table_has_placeholder_row() {
    let html = client_rows_html(&[]);
    assert!(html.contains("No clients found."));
    assert!(html.contains("colspan=\"6\""));
  }

  #[test]
  fn rows_show_formatted_goal() {
    let c = client("Jane Doe");
    let html = client_rows_html(&[&c]);
    assert!(html.contains("<td data-label=\"Name\">Jane Doe</td>"));
    assert!(html.contains("<td data-label=\"Fitness Goal\">Muscle Gain</td>"));
    assert!(html.contains("data-client-id=\"42\""));
  }

  #[test]
  fn record_text_is_escaped_everywhere() {
    let c = client("<script>alert(1)</script>\" onclick=\"x");
    let html = client_rows_html(&[&c]);
    assert!(!html.contains("<script>"));
    assert!(!html.contains("\" onclick=\"x"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("data-client-name=\"&lt;script&gt;alert(1)&lt;/script&gt;&quot;"));
  }

  #[test]
  fn table_wraps_rows() {
    let c = client("Ann");
    let html = client_table_html(&[&c]);
    assert!(html.starts_with("<table"));
    assert!(html.contains("<th>Fitness Goal</th>"));
    assert!(html.contains("Ann"));
  }

  #[test]
  fn exercise_cards_are_numbered_and_sanitised() {
    let exercises = vec![
      Exercise { id: Some(1), name: "Squat".into(), description: "<p>Go <b>low</b></p>".into() },
      Exercise { id: Some(2), name: "<i>Plank</i>".into(), description: String::new() },
    ];
    let html = exercise_cards_html(&exercises);
    assert!(html.contains("<div class=\"exercise-number\">1</div>"));
    assert!(html.contains("<div class=\"exercise-number\">2</div>"));
    assert!(html.contains("<p class=\"exercise-description\">Go low</p>"));
    assert!(html.contains("<h4>&lt;i&gt;Plank&lt;/i&gt;</h4>"));
    assert!(html.contains("No description available"));
  }

  #[test]
  fn decoded_entities_are_re_escaped() {
    let exercises = vec![Exercise {
      description: "&lt;script&gt;".into(),
      ..Default::default()
    }];
    let html = exercise_cards_html(&exercises);
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
  }

  #[test]
  fn no_exercises_placeholder() {
    assert!(exercise_cards_html(&[]).contains("No exercises available at this time."));
  }

  #[test]
  fn error_state_escapes_message() {
    assert!(error_state_html("<b>down</b>").contains("&lt;b&gt;down&lt;/b&gt;"));
  }
}
