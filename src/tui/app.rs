//! Application state for the TUI.
//!
//! [`App`] is the single store both asynchronous sources write into. It is
//! only mutated by [`update`](super::event::update) on the main loop, so
//! snapshots and mode resolutions are applied strictly in arrival order.

use std::time::{Duration, Instant};

use crate::models::{AccountState, TradingMode};
use crate::mode::ModeController;

/// How long a notice stays on screen.
const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Central application state container.
pub struct App {
    // -- Account State --
    /// Latest decoded snapshot; `None` until the first one arrives and
    /// again after the feed is torn down.
    pub account: Option<AccountState>,
    /// Number of snapshots applied since startup.
    pub snapshots_received: u64,
    /// When the current snapshot arrived.
    pub last_update: Option<Instant>,

    // -- Mode State --
    /// Optimistic and confirmed trading mode.
    pub mode: ModeController,

    // -- Connection State --
    /// Push-channel status.
    pub connection_status: ConnectionStatus,

    // -- UI State --
    /// One-shot message for the operator (clears after a timeout).
    pub notice: Option<Notice>,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates an App whose confirmed trading mode is `initial_mode`.
    pub fn new(initial_mode: TradingMode) -> Self {
        Self {
            account: None,
            snapshots_received: 0,
            last_update: None,
            mode: ModeController::new(initial_mode),
            connection_status: ConnectionStatus::Disconnected,
            notice: None,
            should_quit: false,
        }
    }

    /// Replaces the account snapshot wholesale.
    pub fn apply_snapshot(&mut self, state: AccountState) {
        self.account = Some(state);
        self.snapshots_received += 1;
        self.last_update = Some(Instant::now());
    }

    /// Forgets the snapshot (feed torn down).
    pub fn discard_snapshot(&mut self) {
        self.account = None;
        self.last_update = None;
    }

    /// How long ago the current snapshot arrived.
    pub fn snapshot_age(&self) -> Option<Duration> {
        self.last_update.map(|at| at.elapsed())
    }

    /// Caption for the mode toggle control, based on the optimistic mode.
    pub fn toggle_label(&self) -> &'static str {
        self.mode.displayed().switch_label()
    }

    /// Sets an informational notice.
    pub fn show_info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::new(NoticeKind::Info, message));
    }

    /// Sets an error notice.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::new(NoticeKind::Error, message));
    }

    /// Clears notices older than the display timeout.
    pub fn clear_stale_notice(&mut self) {
        if let Some(ref notice) = self.notice
            && notice.timestamp.elapsed() > NOTICE_TTL
        {
            self.notice = None;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(TradingMode::default())
    }
}

/// Push-channel connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionStatus {
    /// Returns a display string for the status.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Offline",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Online",
            ConnectionStatus::Reconnecting => "Reconnecting...",
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Operator-facing message with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// When the notice was shown.
    pub timestamp: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AccountState {
        serde_json::from_str(r#"{"balance": 10, "trades": []}"#).unwrap()
    }

    #[test]
    fn snapshot_age_tracks_latest_snapshot() {
        let mut app = App::default();
        assert!(app.snapshot_age().is_none());

        app.apply_snapshot(snapshot());
        let age = app.snapshot_age().expect("age after snapshot");
        assert!(age < Duration::from_secs(1));
        assert_eq!(app.snapshots_received, 1);

        app.discard_snapshot();
        assert!(app.snapshot_age().is_none());
        assert!(app.account.is_none());
    }
}
