//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use super::app::App;
use super::components::{account_panel, mode_toggle, status_bar};

const TITLE: &str = "Tradewatch - AI Trading Dashboard";

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Status bar
            Constraint::Length(3), // Mode toggle
            Constraint::Min(5),    // Account
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    let title = Paragraph::new(Line::from(TITLE)).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, main_layout[0]);

    status_bar::render(frame, main_layout[1], app);
    mode_toggle::render(frame, main_layout[2], app);
    account_panel::render(frame, main_layout[3], app);

    let help = Paragraph::new(Line::from(" t/Enter: switch mode   q: quit "))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, main_layout[4]);
}
