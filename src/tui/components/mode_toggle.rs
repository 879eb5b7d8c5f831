//! The paper/live switch control.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::App;

/// Renders the toggle button. The caption follows the optimistic mode.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let border_color = if app.mode.is_pending() {
        Color::Yellow
    } else {
        Color::Cyan
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let button = Paragraph::new(format!("[ {} ]", app.toggle_label()))
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(block);

    frame.render_widget(button, area);
}
