//! Client table — left panel.

use fitcrm_core::format::format_goal;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::app::App;

/// Render the client table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_clients();
  let total = app.repo.len();

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Clients ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Clients ({}) ", total)
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar on the last line of the pane while a search is set.
  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if filtered.is_empty() {
    let hint = if total == 0 {
      "No clients found. Add your first client with `fitcrm add`."
    } else {
      "No clients match your search."
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let header = Row::new(["Name", "Email", "Phone", "Fitness Goal", "Start Date"])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

  let rows: Vec<Row> = filtered
    .iter()
    .map(|c| {
      Row::new(vec![
        Cell::from(c.full_name.clone()),
        Cell::from(c.email.clone()),
        Cell::from(c.phone.clone()),
        Cell::from(format_goal(&c.fitness_goal).to_owned()),
        Cell::from(c.start_date.clone()),
      ])
    })
    .collect();

  let widths = [
    Constraint::Percentage(24),
    Constraint::Percentage(28),
    Constraint::Percentage(16),
    Constraint::Percentage(18),
    Constraint::Percentage(14),
  ];

  let mut state = TableState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    Table::new(rows, widths).header(header).row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
