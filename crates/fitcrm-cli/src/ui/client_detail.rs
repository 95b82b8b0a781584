//! Client detail pane — right panel, with exercise suggestions.

use fitcrm_core::format::{format_date, format_goal};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Suggestions};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(client) = app.selected_client() else {
    draw_empty(f, area);
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", client.full_name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = vec![
    field("email", client.email.clone()),
    field("phone", client.phone.clone()),
    field("goal", format_goal(&client.fitness_goal).to_owned()),
    field("started", format_date(&client.start_date)),
  ];
  if let Some(created) = client.created_at {
    lines.push(field("member since", format_date(&created.to_rfc3339())));
  }
  if let Some(updated) = client.updated_at {
    lines.push(field("updated", format_date(&updated.to_rfc3339())));
  }
  lines.push(field("sessions", client.training_history.len().to_string()));

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    "Suggested exercises",
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
  )));
  lines.extend(suggestion_lines(&app.suggestions));

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_empty(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new("Select a client and press Enter.")
      .style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}

// ─── Formatting helpers ───────────────────────────────────────────────────────

fn field(label: &'static str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<14}"),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

fn suggestion_lines(suggestions: &Suggestions) -> Vec<Line<'static>> {
  let dim = Style::default().fg(Color::DarkGray);
  match suggestions {
    Suggestions::Idle => vec![Line::from(Span::styled("Press x to load suggestions.", dim))],
    Suggestions::Loading => vec![Line::from(Span::styled("Loading exercises...", dim))],
    Suggestions::Failed(message) => vec![
      Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
      Line::from(Span::styled("Press x to try again.", dim)),
    ],
    Suggestions::Loaded(exercises) if exercises.is_empty() => {
      vec![Line::from(Span::styled("No exercises available at this time.", dim))]
    }
    Suggestions::Loaded(exercises) => exercises
      .iter()
      .enumerate()
      .flat_map(|(i, ex)| {
        let description = ex
          .plain_description()
          .unwrap_or_else(|| "No description available".to_owned());
        [
          Line::from(vec![
            Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::Yellow)),
            Span::styled(ex.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
          ]),
          Line::from(Span::styled(format!("    {description}"), dim)),
        ]
      })
      .collect(),
  }
}
