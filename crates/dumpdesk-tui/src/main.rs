//! dumpdesk - terminal admin console for the dumpster rental marketplace.
//!
//! This application provides a keyboard-driven interface for the marketplace
//! administrators: sign in, then browse and manage admins, customers, drivers
//! and products.

mod app;
mod form;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dumpdesk_core::config::APP_NAME;

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

#[derive(Parser, Debug)]
#[command(name = "dumpdesk", version, about = "Admin console for the dumpster marketplace")]
struct Cli {
    #[arg(long, help = "Keep the session in memory; nothing is saved to disk")]
    ephemeral: bool,
}

fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME).join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize the tracing subscriber for logging.
///
/// The terminal belongs to the UI, so logs go to a daily file. Use the
/// RUST_LOG env var to control the level (e.g. RUST_LOG=dumpdesk_core=debug).
fn init_tracing() -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(APP_NAME)
        .filename_suffix("log")
        .build(log_dir())
        .context("Failed to open log file")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = match init_tracing() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            None
        }
    };
    info!(ephemeral = cli.ephemeral, "dumpdesk starting");

    // Create app before touching the terminal so config errors print cleanly
    let mut app = App::new(cli.ephemeral)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // First frame shows the loading splash, then the stored session is checked
    terminal.draw(|f| render(f, &app))?;
    app.restore_session();

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

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("dumpdesk shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Check for session changes and completed background tasks
        app.check_background_tasks();

        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_ephemeral_flag() {
        let cli = Cli::try_parse_from(["dumpdesk"]).expect("no args");
        assert!(!cli.ephemeral);

        let cli = Cli::try_parse_from(["dumpdesk", "--ephemeral"]).expect("flag");
        assert!(cli.ephemeral);

        assert!(Cli::try_parse_from(["dumpdesk", "--bogus"]).is_err());
    }
}
