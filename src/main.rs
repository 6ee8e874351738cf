mod alerts;
mod clock;
mod config;
mod controller;
mod error;
mod history;
mod preset;
mod presenter;
mod session;
mod store;
mod tui;
mod ui;

use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{fs, io, process::ExitCode, sync::Mutex};
use tracing_subscriber::EnvFilter;

use clock::PhaseClock;
use config::{get_path, load_json, save_json, Config};
use controller::{load_ledger, Ledger, SessionController};
use error::{AppError, StoreError};
use history::{check_key, HistoryAdapter};
use preset::{CLASSIC_LABEL, EXTENDED_LABEL, PRESET_LABELS};
use session::SessionState;
use store::{FileStore, KvStore, RemoteStore};
use tui::{Term, TerminalPresenter};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone)]
#[command(author, version, about = "🍅 cli-pomodoro - A Pomodoro timer that remembers your work")]
struct Args {
    /// Task to work on (skips the prompt)
    #[arg(short, long)]
    task: Option<String>,
    /// Work/break period (skips the prompt)
    #[arg(short, long, value_enum)]
    preset: Option<PresetArg>,
    /// Whose history to load and update
    #[arg(short, long)]
    user: Option<String>,
    /// Base URL of a remote history database
    #[arg(long)]
    store_url: Option<String>,
    /// Run the timer without loading or saving history
    #[arg(long)]
    no_history: bool,
    /// Start anyway when history cannot be loaded
    #[arg(long)]
    offline_ok: bool,
    #[arg(long)]
    no_sound: bool,
    #[arg(long)]
    no_notify: bool,
    /// Print the user's task totals and exit
    #[arg(long, conflicts_with = "no_history")]
    history: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    /// 25-minute work, 5-minute break
    Classic,
    /// 50-minute work, 10-minute break
    Extended,
}

impl PresetArg {
    fn label(self) -> &'static str {
        match self {
            Self::Classic => CLASSIC_LABEL,
            Self::Extended => EXTENDED_LABEL,
        }
    }
}

// ============================================================================
// Startup
// ============================================================================

fn init_logging() {
    let path = get_path("cli-pomodoro.log");
    let file = match fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("warning: could not open log file {}: {}; logging disabled", path.display(), e);
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn default_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "guest".into())
}

fn open_history(config: &Config) -> Result<HistoryAdapter, StoreError> {
    let store: Box<dyn KvStore> = match &config.store_url {
        Some(url) => {
            tracing::info!(url = %url, "using remote history store");
            Box::new(RemoteStore::new(url, config.store_timeout()))
        }
        None => {
            let path = get_path("history.json");
            tracing::info!(path = %path.display(), "using local history file");
            Box::new(FileStore::open(&path)?)
        }
    };
    Ok(HistoryAdapter::new(store))
}

/// Loads the user's history and shows it. `None` means the run goes unsaved.
fn open_ledger(
    terminal: &mut Term,
    config: &Config,
    username: &str,
    task: &str,
) -> Result<Option<Ledger>, AppError> {
    let Some((ledger, totals)) = load_ledger(open_history(config), username, task, config.tolerate_offline)? else {
        return Ok(None);
    };

    if !totals.is_empty() {
        tui::show_history(terminal, username, &totals)?;
    }
    Ok(Some(ledger))
}

fn print_history(args: &Args, config: &Config) -> Result<(), AppError> {
    let username = args
        .user
        .clone()
        .or_else(|| config.username.clone())
        .unwrap_or_else(default_username);
    check_key(username.trim())?;
    let totals = open_history(config)?.load(username.trim())?;

    if totals.is_empty() {
        println!("No history for {} yet.", username.trim());
        return Ok(());
    }

    println!("History for {}", username.trim());
    for (task, minutes) in &totals {
        println!("  {:<24}{}", task, ui::format_minutes(*minutes));
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = get_path("config.json");
    let mut config = load_json::<Config>(&config_path);
    if !config_path.exists() {
        let _ = save_json(&config_path, &config);
    }
    init_logging();

    // CLI overrides
    if let Some(u) = &args.store_url { config.store_url = Some(u.clone()); }
    if args.offline_ok { config.tolerate_offline = true; }
    if args.no_sound { config.sound_enabled = false; }
    if args.no_notify { config.notifications_enabled = false; }

    let res = if args.history {
        print_history(&args, &config)
    } else {
        run_interactive(&args, &config)
    };

    match res {
        Ok(()) | Err(AppError::Interrupted) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(args: &Args, config: &Config) -> Result<(), AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run(&mut terminal, args, config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(AppError::Interrupted) = &res {
        tracing::info!("interrupted, exiting");
    }
    res
}

fn run(terminal: &mut Term, args: &Args, config: &Config) -> Result<(), AppError> {
    tui::show_welcome(terminal, config.sound_enabled, config.notifications_enabled)?;

    let username = if args.no_history {
        None
    } else {
        let name = match args.user.clone().or_else(|| config.username.clone()) {
            Some(name) => name,
            None => tui::ask_text(terminal, "Who is working today?", &default_username())?,
        };
        Some(name.trim().to_string())
    };

    let task = match &args.task {
        Some(task) => task.clone(),
        None => tui::ask_text(terminal, "What are you working on today?", &config.default_task)?,
    };
    let label = match args.preset {
        Some(p) => p.label(),
        None => PRESET_LABELS[tui::ask_choice(terminal, "Choose your Pomodoro period:", &PRESET_LABELS)?],
    };
    let preset = preset::resolve(label)?;
    let state = SessionState::new(&task, preset);

    let ledger = match &username {
        Some(user) => open_ledger(terminal, config, user, &state.task)?,
        None => None,
    };
    let mut steps = vec![
        format!(
            "A {} session is created for you at {}!",
            preset.label,
            chrono::Local::now().format("%I:%M %p")
        ),
        "Session started!".to_string(),
    ];
    if username.is_some() && ledger.is_none() {
        steps.insert(1, "History is unavailable, this run will not be saved.".to_string());
    }
    tui::show_startup(terminal, &steps, config.sound_enabled)?;

    tracing::info!(
        task = %state.task,
        preset = preset.label,
        user = username.as_deref().unwrap_or("-"),
        "session started"
    );

    let mut controller = SessionController::new(state, PhaseClock::new(config.tick()), ledger)
        .with_timing(config.settle(), config.retry_backoff());
    let cadence = controller.cadence();
    let mut presenter = TerminalPresenter::new(terminal, config.sound_enabled, config.notifications_enabled);

    loop {
        controller.tick(&mut presenter)?;
        tui::wait_or_interrupt(cadence)?;
    }
}
