use std::io;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use launchpad_service::BlockingHttpService;
use launchpad_tui::app::App;
use launchpad_tui::config::TuiConfig;
use ratatui::prelude::*;

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// How often to check on a detail fetch while one is in flight.
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let config = TuiConfig::parse();
    init_logging(&config);

    let service = BlockingHttpService::new(&config.api_base_url)
        .context("failed to start the HTTP client")?;
    tracing::info!(api = %config.api_base_url, signed_in = config.token().is_some(), "launchpad starting");

    let result = run_tui(service, config.token());
    if let Err(ref e) = result {
        tracing::error!(error = ?e, "application error");
    }
    tracing::info!("launchpad exited");
    result
}

/// Log to a file; the terminal belongs to the UI. Without a writable file
/// there is no logging at all.
fn init_logging(config: &TuiConfig) {
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("launchpad: cannot open {}: {e}", config.log_file.display());
            return;
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(non_blocking)
        .init();
    let _ = LOG_GUARD.set(guard);
}

fn run_tui(service: BlockingHttpService, token: Option<String>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, service, token);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: BlockingHttpService,
    token: Option<String>,
) -> Result<()> {
    let mut app = App::new(service, token);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        // Use poll with timeout while details load, blocking read otherwise
        if app.needs_polling() && !event::poll(LOAD_POLL_INTERVAL)? {
            app.poll_load();
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if quits(&app, key) {
                    break;
                }
                app.handle_key(key);
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
        app.poll_load();
    }

    Ok(())
}

fn quits(app: &App, key: KeyEvent) -> bool {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    // q quits unless a panel is open
    key.code == KeyCode::Char('q') && !app.is_input_mode()
}
