//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fitcrm_core::{
  client::Client,
  command::{Command, Outcome, dispatch},
  exercise::Exercise,
  notify::{Notification, Toasts, delete_prompt},
  repository::ClientRepository,
};
use fitcrm_exercises::ExerciseClient;
use tokio::sync::mpsc;

use crate::backend::Backend;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the client table.
  ClientList,
  /// Focus on the client detail pane.
  ClientDetail,
}

/// A delete awaiting the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
  pub id:     String,
  pub prompt: String,
}

/// Progress of the exercise suggestions shown in the detail pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Suggestions {
  #[default]
  Idle,
  Loading,
  Loaded(Vec<Exercise>),
  Failed(String),
}

type FetchResult = Result<Vec<Exercise>, String>;

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  pub repo: ClientRepository<Backend>,

  /// Current search string (only edited when `filter_active`).
  pub filter: String,

  /// Whether the user is typing into the search box.
  pub filter_active: bool,

  /// Cursor position within the *filtered* client list.
  pub list_cursor: usize,

  /// Identifier of the client shown in the detail pane.
  pub selected_id: Option<String>,

  /// Open confirmation dialog, if any.
  pub pending_delete: Option<PendingDelete>,

  pub suggestions: Suggestions,

  /// Shared toast slot; also the repository's notifier.
  pub toasts: Toasts,

  exercises:      Option<Arc<ExerciseClient>>,
  exercise_limit: u32,
  results_tx:     mpsc::UnboundedSender<FetchResult>,
  results_rx:     mpsc::UnboundedReceiver<FetchResult>,
}

impl App {
  /// `toasts` must be the notifier the repository's adapter was built with.
  pub fn new(
    repo: ClientRepository<Backend>,
    toasts: Toasts,
    exercises: Option<ExerciseClient>,
    exercise_limit: u32,
  ) -> Self {
    let (results_tx, results_rx) = mpsc::unbounded_channel();
    Self {
      screen: Screen::ClientList,
      repo,
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      selected_id: None,
      pending_delete: None,
      suggestions: Suggestions::Idle,
      toasts,
      exercises: exercises.map(Arc::new),
      exercise_limit,
      results_tx,
      results_rx,
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Clients matching the current search, in stored order.
  pub fn filtered_clients(&self) -> Vec<&Client> { self.repo.filter(&self.filter) }

  /// The client under the list cursor in the filtered view, if any.
  pub fn cursor_client(&self) -> Option<&Client> {
    self.filtered_clients().get(self.list_cursor).copied()
  }

  pub fn selected_client(&self) -> Option<&Client> {
    self.selected_id.as_deref().and_then(|id| self.repo.get_by_id(id))
  }

  pub fn toast(&self) -> Option<Notification> { self.toasts.current() }

  fn clamp_cursor(&mut self) {
    let len = self.filtered_clients().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  // ── Exercise suggestions ──────────────────────────────────────────────────

  /// Start a background fetch unless one is already running.
  pub fn request_suggestions(&mut self) {
    let Some(client) = self.exercises.clone() else {
      self.suggestions = Suggestions::Failed("Exercise suggestions are disabled.".into());
      return;
    };
    if self.suggestions == Suggestions::Loading {
      return;
    }

    self.suggestions = Suggestions::Loading;
    let tx = self.results_tx.clone();
    let limit = self.exercise_limit;
    tokio::spawn(async move {
      let result = client.fetch_exercises(limit).await.map_err(|e| e.to_string());
      let _ = tx.send(result);
    });
  }

  /// Apply any finished fetches. Called once per frame.
  pub fn poll_suggestions(&mut self) {
    while let Ok(result) = self.results_rx.try_recv() {
      self.receive_suggestions(result);
    }
  }

  fn receive_suggestions(&mut self, result: FetchResult) {
    self.suggestions = match result {
      Ok(exercises) => Suggestions::Loaded(exercises),
      Err(e) => {
        tracing::warn!(error = %e, "exercise suggestions unavailable");
        Suggestions::Failed(
          "Failed to load exercises. Please check your connection and try again.".into(),
        )
      }
    };
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    // A confirmation dialog captures every key.
    if self.pending_delete.is_some() {
      self.handle_dialog_key(key);
      return true;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return true;
    }

    match self.screen {
      Screen::ClientList => self.handle_list_key(key),
      Screen::ClientDetail => self.handle_detail_key(key),
    }
  }

  fn handle_dialog_key(&mut self, key: KeyEvent) {
    let answer = match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => true,
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
      _ => return,
    };
    let Some(pending) = self.pending_delete.take() else { return };

    let outcome = dispatch(&mut self.repo, Command::Delete { id: pending.id.clone() }, &|_: &str| {
      answer
    });
    if outcome == Outcome::Deleted {
      if self.selected_id.as_deref() == Some(pending.id.as_str()) {
        self.close_detail();
      }
      self.clamp_cursor();
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        // Open the detail straight away when exactly one client matches.
        let only = match self.filtered_clients().as_slice() {
          [one] => Some(one.id.clone()),
          _ => None,
        };
        if let Some(id) = only {
          self.open_detail(id);
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_clients().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_client().map(|c| c.id.clone()) {
          self.open_detail(id);
        }
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      KeyCode::Char('d') | KeyCode::Delete => {
        if let Some(id) = self.cursor_client().map(|c| c.id.clone()) {
          self.ask_delete(id);
        }
      }

      // Pick up writes made by another process.
      KeyCode::Char('r') => {
        self.repo.reload();
        self.clamp_cursor();
      }

      _ => {}
    }
    true
  }

  fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => self.close_detail(),

      KeyCode::Char('x') => self.request_suggestions(),

      KeyCode::Char('d') | KeyCode::Delete => {
        if let Some(id) = self.selected_id.clone() {
          self.ask_delete(id);
        }
      }

      // Step through the list without leaving the detail pane.
      KeyCode::Char(']') | KeyCode::PageDown => {
        let len = self.filtered_clients().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
          if let Some(id) = self.cursor_client().map(|c| c.id.clone()) {
            self.open_detail(id);
          }
        }
      }
      KeyCode::Char('[') | KeyCode::PageUp => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
          if let Some(id) = self.cursor_client().map(|c| c.id.clone()) {
            self.open_detail(id);
          }
        }
      }

      _ => {}
    }
    true
  }

  fn ask_delete(&mut self, id: String) {
    let name = self
      .repo
      .get_by_id(&id)
      .map(|c| c.full_name.clone())
      .unwrap_or_else(|| id.clone());
    self.pending_delete = Some(PendingDelete { prompt: delete_prompt(&name), id });
  }

  /// Transition to `ClientDetail` for `id`, fetching suggestions on first open.
  fn open_detail(&mut self, id: String) {
    self.selected_id = Some(id);
    self.screen = Screen::ClientDetail;
    if self.suggestions == Suggestions::Idle && self.exercises.is_some() {
      self.request_suggestions();
    }
  }

  fn close_detail(&mut self) {
    self.screen = Screen::ClientList;
    self.selected_id = None;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use crossterm::event::KeyEventKind;
  use fitcrm_core::{
    client::NewClient,
    notify::NotificationKind,
    storage::StorageAdapter,
  };

  use super::*;

  fn app(names: &[&str]) -> App {
    let toasts = Toasts::new();
    let mut repo = ClientRepository::open(StorageAdapter::with_notifier(
      Backend::ephemeral(),
      Arc::new(toasts.clone()),
    ));
    for name in names {
      repo.create(NewClient { full_name: (*name).into(), ..Default::default() });
    }
    App::new(repo, toasts, None, 5)
  }

  fn press(app: &mut App, code: KeyCode) -> bool {
    app.handle_key(KeyEvent {
      code,
      modifiers: KeyModifiers::NONE,
      kind: KeyEventKind::Press,
      state: crossterm::event::KeyEventState::NONE,
    })
  }

  fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
      press(app, KeyCode::Char(c));
    }
  }

  fn visible(app: &App) -> Vec<String> {
    app.filtered_clients().iter().map(|c| c.full_name.clone()).collect()
  }

  #[test]
  fn search_filters_live() {
    let mut a = app(&["Jane Doe", "John Smith", "Mary Jane"]);
    press(&mut a, KeyCode::Char('/'));
    type_str(&mut a, "JANE");
    assert_eq!(visible(&a), ["Jane Doe", "Mary Jane"]);

    press(&mut a, KeyCode::Backspace);
    press(&mut a, KeyCode::Backspace);
    press(&mut a, KeyCode::Backspace);
    press(&mut a, KeyCode::Backspace);
    assert_eq!(visible(&a).len(), 3);

    press(&mut a, KeyCode::Esc);
    assert!(!a.filter_active);
    assert!(a.filter.is_empty());
  }

  #[test]
  fn enter_on_single_match_opens_detail() {
    let mut a = app(&["Jane Doe", "John Smith"]);
    press(&mut a, KeyCode::Char('/'));
    type_str(&mut a, "smith");
    press(&mut a, KeyCode::Enter);
    assert_eq!(a.screen, Screen::ClientDetail);
    assert_eq!(a.selected_client().unwrap().full_name, "John Smith");
  }

  #[test]
  fn navigation_stays_in_bounds() {
    let mut a = app(&["A", "B"]);
    press(&mut a, KeyCode::Up);
    assert_eq!(a.list_cursor, 0);
    press(&mut a, KeyCode::Down);
    press(&mut a, KeyCode::Down);
    assert_eq!(a.list_cursor, 1);
    assert_eq!(a.cursor_client().unwrap().full_name, "B");
  }

  #[test]
  fn delete_requires_confirmation() {
    let mut a = app(&["Jane Doe", "Bob"]);
    press(&mut a, KeyCode::Char('d'));
    let pending = a.pending_delete.clone().unwrap();
    assert!(pending.prompt.contains("Jane Doe"));

    // Unrelated keys are swallowed by the dialog.
    press(&mut a, KeyCode::Char('q'));
    assert!(a.pending_delete.is_some());

    press(&mut a, KeyCode::Char('n'));
    assert!(a.pending_delete.is_none());
    assert_eq!(a.repo.len(), 2);

    press(&mut a, KeyCode::Char('d'));
    press(&mut a, KeyCode::Char('y'));
    assert_eq!(visible(&a), ["Bob"]);
    let toast = a.toast().unwrap();
    assert_eq!(toast.message, "Jane Doe has been deleted");
    assert_eq!(toast.kind, NotificationKind::Success);
  }

  #[test]
  fn deleting_last_row_moves_cursor_up() {
    let mut a = app(&["A", "B"]);
    press(&mut a, KeyCode::Down);
    press(&mut a, KeyCode::Char('d'));
    press(&mut a, KeyCode::Char('y'));
    assert_eq!(a.list_cursor, 0);
    assert_eq!(a.cursor_client().unwrap().full_name, "A");
  }

  #[test]
  fn deleting_from_detail_returns_to_list() {
    let mut a = app(&["A"]);
    press(&mut a, KeyCode::Enter);
    assert_eq!(a.screen, Screen::ClientDetail);
    press(&mut a, KeyCode::Char('d'));
    press(&mut a, KeyCode::Char('y'));
    assert_eq!(a.screen, Screen::ClientList);
    assert!(a.selected_id.is_none());
    assert!(a.repo.is_empty());
  }

  #[test]
  fn suggestions_without_client_report_disabled() {
    let mut a = app(&["A"]);
    press(&mut a, KeyCode::Enter);
    assert_eq!(a.suggestions, Suggestions::Idle);
    press(&mut a, KeyCode::Char('x'));
    assert!(matches!(a.suggestions, Suggestions::Failed(_)));
  }

  #[test]
  fn fetch_results_update_suggestions() {
    let mut a = app(&[]);
    a.results_tx
      .send(Ok(vec![Exercise { name: "Squat".into(), ..Default::default() }]))
      .unwrap();
    a.poll_suggestions();
    assert!(matches!(&a.suggestions, Suggestions::Loaded(ex) if ex[0].name == "Squat"));

    a.results_tx.send(Err("timeout".into())).unwrap();
    a.poll_suggestions();
    assert!(matches!(a.suggestions, Suggestions::Failed(_)));
  }

  #[test]
  fn q_quits_and_ctrl_c_quits_from_search() {
    let mut a = app(&[]);
    press(&mut a, KeyCode::Char('/'));
    assert!(press(&mut a, KeyCode::Char('q')), "q is text while searching");
    assert!(!a.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));

    let mut b = app(&[]);
    assert!(!press(&mut b, KeyCode::Char('q')));
  }
}
