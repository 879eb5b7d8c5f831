//! Terminal User Interface for the trading monitor.
//!
//! Provides a Ratatui-based TUI showing the live account snapshot and the
//! paper/live trading switch.

pub mod app;
pub mod components;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message, update};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
