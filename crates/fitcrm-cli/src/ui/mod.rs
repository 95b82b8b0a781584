//! TUI rendering — orchestrates all panes.

pub mod client_detail;
pub mod client_list;

use chrono::Local;
use fitcrm_core::notify::NotificationKind;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, PendingDelete, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  if let Some(pending) = &app.pending_delete {
    draw_confirm(f, area, pending);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " FitCRM  [/] search  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
    .split(area);

  client_list::draw(f, cols[0], app);
  client_detail::draw(f, cols[1], app);
}

// ─── Confirm dialog ───────────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, pending: &PendingDelete) {
  let popup = centered(area, 50, 8);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(" Confirm ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let mut lines: Vec<Line> = pending.prompt.lines().map(|l| Line::from(l.to_owned())).collect();
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    "[y] delete   [n] cancel",
    Style::default().add_modifier(Modifier::BOLD),
  )));

  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
    popup,
  );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  cell
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.screen {
    _ if app.pending_delete.is_some() => ("CONFIRM", "y delete  n cancel"),
    Screen::ClientList if app.filter_active => {
      ("SEARCH", "Type to filter  Esc cancel  Enter select")
    }
    Screen::ClientList => (
      "NORMAL",
      "↑↓/jk navigate  / search  Enter detail  d delete  r reload  q quit",
    ),
    Screen::ClientDetail => (
      "DETAIL",
      "Esc back  [ prev  ] next  x exercises  d delete  q quit",
    ),
  };

  let (status, status_style) = match app.toast() {
    Some(toast) => {
      let color = match toast.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
        NotificationKind::Info => Color::Cyan,
      };
      (toast.message, Style::default().fg(color).add_modifier(Modifier::BOLD))
    }
    None => (hints.to_string(), Style::default().fg(Color::DarkGray)),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let status_span = Span::styled(format!("  {status}"), status_style);

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, status_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
