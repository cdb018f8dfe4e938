//! Taskboard terminal client.
//!
//! Launches the TUI against a Taskboard API server. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! # Against a local server on the default port
//! cargo run --bin taskboard
//!
//! # Against another server
//! cargo run --bin taskboard -- --api-url http://tasks.example.com:8080
//!
//! # Or via environment variable
//! TASKBOARD_API_URL=http://127.0.0.1:3001 cargo run --bin taskboard
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::app::App;
use taskboard::config::{CliArgs, ClientConfig};
use taskboard::net::{self, NetCommand, NetEvent};
use taskboard::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api_url = %config.api_url, "taskboard starting");

    let (cmd_tx, evt_rx) = match net::spawn_net(config.to_net_config()) {
        Ok(channels) => channels,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config, &cmd_tx, evt_rx);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let _ = cmd_tx.try_send(NetCommand::Shutdown);
    tracing::info!("taskboard exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
    cmd_tx: &mpsc::Sender<NetCommand>,
    mut evt_rx: mpsc::Receiver<NetEvent>,
) -> io::Result<()> {
    let mut app = App::new().with_notification_ttl(config.notification_ttl);
    let initial = app.start();
    send_command(&mut app, cmd_tx, initial);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending NetEvents (non-blocking).
        while let Ok(event) = evt_rx.try_recv() {
            if let Some(follow_up) = app.apply_event(event) {
                send_command(&mut app, cmd_tx, follow_up);
            }
        }

        // Step 3: Expire toasts.
        app.tick();

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(cmd) = app.handle_key_event(key)
        {
            send_command(&mut app, cmd_tx, cmd);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Hand a command to the network task, reporting a dead or full channel
/// as a failed request.
fn send_command(app: &mut App, tx: &mpsc::Sender<NetCommand>, cmd: NetCommand) {
    let Some(action) = cmd.action() else {
        let _ = tx.try_send(cmd);
        return;
    };
    let reason = match tx.try_send(cmd) {
        Ok(()) => return,
        Err(mpsc::error::TrySendError::Full(_)) => "network busy",
        Err(mpsc::error::TrySendError::Closed(_)) => "network task stopped",
    };
    tracing::error!(action = action.describe(), reason, "could not dispatch request");
    app.apply_event(NetEvent::OperationFailed {
        action,
        message: reason.to_string(),
    });
}
