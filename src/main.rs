pub mod app_dirs;
pub mod config;
pub mod history;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod stopwatch;
pub mod ui;
pub mod util;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    history::{FileHistoryStore, SessionHistory},
    runtime::{AppEvent, Cadence, CrosstermEventSource, EventSource, Runner},
    stats::WeekStart,
    stopwatch::Stopwatch,
    ui::ui,
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

/// minimal stopwatch tui with lap times and session history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal stopwatch TUI with lap times, a persisted session history, and rolling daily/weekly/monthly statistics."
)]
pub struct Cli {
    /// number of sessions shown in the history view
    #[clap(short = 'n', long)]
    history_limit: Option<usize>,

    /// first day of the "this week" statistics window
    #[clap(short = 'w', long, value_enum)]
    week_start: Option<CliWeekStart>,

    /// alternate session history file
    #[clap(long)]
    data_file: Option<PathBuf>,

    /// write the session history as CSV to the given path and exit
    #[clap(long)]
    export_csv: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum CliWeekStart {
    Sunday,
    Monday,
}

impl CliWeekStart {
    fn as_week_start(&self) -> WeekStart {
        match self {
            CliWeekStart::Sunday => WeekStart::Sunday,
            CliWeekStart::Monday => WeekStart::Monday,
        }
    }
}

impl Cli {
    fn history_store(&self) -> FileHistoryStore {
        match &self.data_file {
            Some(path) => FileHistoryStore::with_path(path),
            None => FileHistoryStore::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Laps,
    Stats,
    History,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Laps => Tab::Stats,
            Tab::Stats => Tab::History,
            Tab::History => Tab::Laps,
        }
    }
}

pub struct App {
    pub stopwatch: Stopwatch,
    pub history: SessionHistory,
    pub tab: Tab,
    pub confirm_clear: bool,
    /// Transient line for recoverable failures (e.g. a failed save)
    pub status: Option<String>,
    pub history_limit: usize,
    pub week_start: WeekStart,
}

impl App {
    pub fn new(history: SessionHistory, history_limit: usize, week_start: WeekStart) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            history,
            tab: Tab::Laps,
            confirm_clear: false,
            status: None,
            history_limit,
            week_start,
        }
    }

    /// Stop the current run and persist it. A failed write keeps the
    /// session in memory and surfaces on the status line.
    pub fn stop_and_save(&mut self) {
        if let Some(session) = self.stopwatch.stop() {
            if let Err(e) = self.history.append(session) {
                self.status = Some(format!("session kept in memory, save failed: {e}"));
            }
        }
    }

    pub fn clear_history(&mut self) {
        if let Err(e) = self.history.clear() {
            self.status = Some(format!("history cleared in memory, save failed: {e}"));
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Headless export path; no terminal required.
    if let Some(path) = &cli.export_csv {
        let history = SessionHistory::load(Box::new(cli.history_store()));
        history.export_csv(path)?;
        println!("exported {} sessions to {}", history.len(), path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config: Config = FileConfigStore::new().load();
    let history_limit = cli.history_limit.unwrap_or(config.history_limit);
    let week_start = cli
        .week_start
        .map(|w| w.as_week_start())
        .unwrap_or_else(|| WeekStart::from_name(&config.week_start));

    let history = SessionHistory::load(Box::new(cli.history_store()));
    let mut app = App::new(history, history_limit, week_start);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), Cadence::default());
    let result = run_app(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Persist the effective settings so CLI overrides become the new
    // defaults on the next launch.
    if let Err(e) = FileConfigStore::new().save(&Config::from_settings(week_start, history_limit)) {
        eprintln!("could not persist settings: {e}");
    }

    result
}

fn run_app<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step(app.stopwatch.is_running()) {
            AppEvent::Tick => {
                // A tick after pause/stop is a no-op inside the engine,
                // so nothing stale can advance the clock.
                if app.stopwatch.is_running() {
                    app.stopwatch.on_tick();
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }

                app.status = None;

                if app.confirm_clear {
                    if key.code == KeyCode::Char('y') {
                        app.clear_history();
                    }
                    app.confirm_clear = false;
                    terminal.draw(|f| ui(app, f))?;
                    continue;
                }

                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char(' ') => app.stopwatch.toggle(),
                    KeyCode::Char('s') => app.stop_and_save(),
                    KeyCode::Char('l') => app.stopwatch.record_lap(),
                    KeyCode::Char('r') => {
                        if app.stopwatch.can_reset() {
                            app.stopwatch.reset();
                        }
                    }
                    KeyCode::Char('c') => {
                        if !app.history.is_empty() {
                            app.confirm_clear = true;
                        }
                    }
                    KeyCode::Tab => app.tab = app.tab.next(),
                    _ => {}
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}
