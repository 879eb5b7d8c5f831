//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::{AccountState, TradingMode};
use crate::mode::{ModeOutcome, RequestId, Resolution, ToggleRequest};

use super::app::{App, ConnectionStatus};

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),

    /// Account snapshot from the push channel.
    AccountUpdate(AccountState),

    /// First connection attempt started.
    Connecting,
    /// Push channel connected.
    Connected,
    /// Push channel lost or unreachable.
    Disconnected,
    /// Push channel reconnecting after a backoff.
    Reconnecting,
    /// Subscriber torn down; the snapshot is no longer live.
    FeedClosed,

    /// The backend answered (or failed to answer) a mode change.
    ModeResolved { id: RequestId, outcome: ModeOutcome },
}

/// Actions that require external handling (network or disk).
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Send this mode change to the backend.
    RequestModeChange(ToggleRequest),
    /// The backend confirmed this mode; remember it for the next start.
    ModeConfirmed(TradingMode),
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::AccountUpdate(state) => {
            app.apply_snapshot(state);
            None
        }
        Message::Connecting => {
            app.connection_status = ConnectionStatus::Connecting;
            None
        }
        Message::Connected => {
            app.connection_status = ConnectionStatus::Connected;
            None
        }
        Message::Disconnected => {
            app.connection_status = ConnectionStatus::Disconnected;
            None
        }
        Message::Reconnecting => {
            app.connection_status = ConnectionStatus::Reconnecting;
            None
        }
        Message::FeedClosed => {
            app.connection_status = ConnectionStatus::Disconnected;
            app.discard_snapshot();
            None
        }
        Message::ModeResolved { id, outcome } => {
            let resolution = app.mode.resolve(id, outcome)?;
            let notice = resolution.notice();
            match resolution {
                Resolution::Confirmed(mode) => {
                    app.show_info(notice);
                    Some(Action::ModeConfirmed(mode))
                }
                Resolution::RolledBack { .. } => {
                    app.show_error(notice);
                    None
                }
            }
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.clear_stale_notice();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('t') | KeyCode::Enter => toggle_mode(app),
        _ => None,
    }
}

/// Starts an optimistic mode switch, or explains why it cannot.
fn toggle_mode(app: &mut App) -> Option<Action> {
    match app.mode.toggle() {
        Ok(request) => Some(Action::RequestModeChange(request)),
        Err(rejected) => {
            debug!("{rejected}");
            app.show_error(format!("Please wait: {rejected}"));
            None
        }
    }
}
