mod app;
mod config;
mod game;
mod theme;
mod trivia;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::{App, Popup};
use config::AppConfig;
use trivia::{JServiceClient, TriviaSource};

#[derive(Parser, Debug)]
#[command(name = "trivia-board")]
#[command(version)]
#[command(about = "A Jeopardy-style trivia board for the terminal")]
struct Args {
    /// Base URL of a jService-compatible API
    #[arg(long)]
    api_url: Option<String>,

    /// Number of categories to list before drawing six
    #[arg(long)]
    pool_size: Option<usize>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Seed for category and clue selection (reproducible boards)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fetch one board and print it as JSON instead of starting the TUI
    #[arg(short, long)]
    dump: bool,

    /// Write logs to this file [default: trivia-board.log in the user state dir]
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("trivia-board"));
    init_logging(log_target(args.log_file.clone(), args.dump, default_dir))?;

    // Config file first, CLI flags win
    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if let Some(pool_size) = args.pool_size {
        config.candidate_pool_size = pool_size;
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }

    let client = JServiceClient::new(
        config.api_base_url.clone(),
        config.candidate_pool_size,
        config.request_timeout(),
    )?;
    tracing::info!(api = %client.base_url(), pool = config.candidate_pool_size, "Using trivia API");

    if args.dump {
        return dump_board(&client, args.seed).await;
    }

    ui::init_theme(theme::Theme::from_overrides(&config.theme));

    // Run TUI
    run_tui(client, args.seed).await
}

/// Where log output goes
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    File(PathBuf),
    Stderr,
    Discard,
}

/// The TUI owns the terminal, so it only gets stderr logging in `--dump` mode.
fn log_target(log_file: Option<PathBuf>, dump: bool, default_dir: Option<PathBuf>) -> LogTarget {
    match (log_file, dump, default_dir) {
        (Some(path), _, _) => LogTarget::File(path),
        (None, true, _) => LogTarget::Stderr,
        (None, false, Some(dir)) => LogTarget::File(dir.join("trivia-board.log")),
        (None, false, None) => LogTarget::Discard,
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn init_logging(target: LogTarget) -> Result<()> {
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

    match target {
        LogTarget::File(path) => {
            let file = open_log_file(&path)
                .with_context(|| format!("Could not open log file {}", path.display()))?;
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .init();
        }
        LogTarget::Stderr => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
        LogTarget::Discard => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(io::sink))
                .init();
        }
    }
    Ok(())
}

async fn dump_board<S: TriviaSource>(source: &S, seed: Option<u64>) -> Result<()> {
    let mut rng = game::sampler::rng_from_seed(seed);
    let board = trivia::load_board(source, &mut rng).await?;
    println!("{}", serde_json::to_string_pretty(&board)?);
    Ok(())
}

async fn run_tui<S: TriviaSource + 'static>(source: S, seed: Option<u64>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Idle -> Loading
    let mut app = App::new(source, seed);
    app.restart();

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<S: TriviaSource + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => {
                        if let Err(e) = app.handle_key(key) {
                            app.set_status(format!("Error: {}", e));
                        }
                    }
                },
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    if let Err(e) = app.handle_mouse(mouse, area) {
                        app.set_status(format!("Error: {}", e));
                    }
                }
                _ => {}
            }
        }

        // Pick up finished board loads
        app.tick();
    }
}
