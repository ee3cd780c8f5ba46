//! Goroda - play the city chain game against the bot in a terminal
//!
//! Name a city on the last letter of the previous one. Don't stall.

mod app;
mod tui;

use app::AppCoordinator;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use goroda::game::CityCatalog;
use goroda::{Engine, EngineConfig, PlayerId, TimeoutSupervisor};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::Tui;

/// Player name used when `$USER` is unset
const DEFAULT_PLAYER: &str = "Игрок";

fn main() -> io::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    let config = EngineConfig::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    init_logging(&config.log_file)?;

    let catalog = CityCatalog::load_or_builtin(&config.cities_file);
    info!(cities = catalog.len(), "catalog ready");
    let engine = Arc::new(Engine::new(config, catalog));

    let (notify_tx, notify_rx) = mpsc::channel();
    let mut supervisor = TimeoutSupervisor::spawn(Arc::clone(&engine), notify_tx);

    let player = std::env::var("USER")
        .map(PlayerId::from)
        .unwrap_or_else(|_| PlayerId::from(DEFAULT_PLAYER));
    let mut app = AppCoordinator::new(engine, player, notify_rx);

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        app.poll_notifications();
        terminal.draw(|frame| tui::render(frame, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => app.quit(),
                        KeyCode::Enter => app.on_enter(),
                        KeyCode::Backspace => app.on_backspace(),
                        KeyCode::Up => app.on_up(),
                        KeyCode::Down => app.on_down(),
                        KeyCode::Char(c) if !c.is_control() => app.on_char(c),
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    terminal.exit()?;
    supervisor.stop();
    info!("bye");
    Ok(())
}

/// Send logs to a file so they don't tear the terminal UI.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
