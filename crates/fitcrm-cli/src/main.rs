//! `fitcrm` — client records for personal trainers.
//!
//! # Usage
//!
//! ```text
//! fitcrm                                  # terminal UI
//! fitcrm add --name "Jane Doe" --email jane@x.com --phone 555-0100 \
//!            --goal weight-loss --start-date 2024-01-01
//! fitcrm list --search jane
//! fitcrm edit 1704067200000 --set phone=555-0200
//! fitcrm delete 1704067200000
//! fitcrm exercises --limit 5
//! ```

mod app;
mod backend;
mod commands;
mod settings;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::PathBuf,
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use backend::Backend;
use clap::{Args as ClapArgs, Parser, Subcommand};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fitcrm_core::{
  client::{FitnessGoal, NewClient},
  notify::{AlwaysConfirm, LogNotifier, Notifier, Toasts},
  repository::ClientRepository,
  storage::StorageAdapter,
};
use fitcrm_exercises::ExerciseClient;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fitcrm", version, about = "Client records for personal trainers")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "fitcrm.toml")]
  config: PathBuf,

  /// SQLite file holding the client list (overrides the config file).
  #[arg(long, env = "FITCRM_STORE", value_name = "FILE")]
  store: Option<PathBuf>,

  /// Keep clients in memory only; nothing is written to disk.
  #[arg(long)]
  ephemeral: bool,

  #[command(subcommand)]
  command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
  /// Open the terminal UI (the default).
  Tui,
  /// List clients.
  List {
    /// Only clients whose name contains this text (case-insensitive).
    #[arg(short, long)]
    search: Option<String>,
    /// Print an HTML table instead of plain text.
    #[arg(long)]
    html: bool,
  },
  /// Show one client.
  Show {
    id: String,
    #[arg(long)]
    json: bool,
  },
  /// Add a client and print its id.
  Add(AddArgs),
  /// Change fields of a client.
  Edit {
    id: String,
    /// `field=value`; fields: fullName, email, phone, fitnessGoal, startDate.
    #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
    set: Vec<String>,
  },
  /// Delete a client.
  Delete {
    id: String,
    /// Do not ask for confirmation.
    #[arg(short, long)]
    yes: bool,
  },
  /// Fetch exercise suggestions.
  Exercises {
    /// How many to fetch (default from config).
    #[arg(short, long)]
    limit: Option<u32>,
    #[arg(long)]
    html: bool,
  },
  /// Remove every stored client.
  Reset {
    /// Required; there is no undo.
    #[arg(long, required = true)]
    yes: bool,
  },
}

#[derive(ClapArgs, Debug)]
struct AddArgs {
  #[arg(long)]
  name: String,
  #[arg(long, default_value = "")]
  email: String,
  #[arg(long, default_value = "")]
  phone: String,
  /// weight-loss, muscle-gain, general-fitness, endurance, flexibility or
  /// rehabilitation.
  #[arg(long, default_value = "general-fitness")]
  goal: String,
  /// Defaults to today.
  #[arg(long)]
  start_date: Option<String>,
}

impl From<AddArgs> for NewClient {
  fn from(args: AddArgs) -> Self {
    NewClient {
      full_name:    args.name,
      email:        args.email,
      phone:        args.phone,
      fitness_goal: FitnessGoal::from(args.goal),
      start_date:   args
        .start_date
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(store) = &cli.store {
    settings.store_path = settings::expand_tilde(store);
  }

  let command = cli.command.unwrap_or(Cmd::Tui);
  let tui = matches!(command, Cmd::Tui);
  init_tracing(&settings, tui)?;

  // The TUI shows notifications as toasts; elsewhere they go to the log.
  let toasts = Toasts::new();
  let notifier: Arc<dyn Notifier> =
    if tui { Arc::new(toasts.clone()) } else { Arc::new(LogNotifier) };

  let backend = if cli.ephemeral {
    Backend::ephemeral()
  } else {
    Backend::open(&settings.store_path)
      .with_context(|| format!("failed to open store at {:?}", settings.store_path))?
  };
  let mut repo = ClientRepository::open(StorageAdapter::with_notifier(backend, notifier));

  let output = match command {
    Cmd::Tui => return run_tui(repo, toasts, &settings).await,
    Cmd::List { search, html } => commands::list(&repo, search.as_deref(), html),
    Cmd::Show { id, json } => commands::show(&repo, &id, json)?,
    Cmd::Add(args) => commands::add(&mut repo, args.into())?,
    Cmd::Edit { id, set } => commands::edit(&mut repo, &id, &set)?,
    Cmd::Delete { id, yes } => {
      if yes {
        commands::delete(&mut repo, &id, &AlwaysConfirm)?
      } else {
        commands::delete(&mut repo, &id, &commands::StdinConfirm)?
      }
    }
    Cmd::Exercises { limit, html } => {
      let client = ExerciseClient::new(settings.exercise_config())?;
      commands::exercises(&client, limit.unwrap_or(settings.exercise_limit), html).await?
    }
    Cmd::Reset { .. } => commands::reset(&mut repo)?,
  };

  print!("{output}");
  Ok(())
}

/// Log to stderr, or to a file while the TUI owns the terminal.
fn init_tracing(settings: &Settings, tui: bool) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  if tui {
    let path = settings.log_path();
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&path)
      .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(io::stderr)
      .init();
  }
  Ok(())
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

async fn run_tui(
  repo: ClientRepository<Backend>,
  toasts: Toasts,
  settings: &Settings,
) -> Result<()> {
  let exercises = match ExerciseClient::new(settings.exercise_config()) {
    Ok(client) => Some(client),
    Err(e) => {
      tracing::warn!(error = %e, "exercise suggestions disabled");
      None
    }
  };
  let mut app = App::new(repo, toasts, exercises, settings.exercise_limit);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.poll_suggestions();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key)
    {
      break;
    }
  }

  Ok(())
}
