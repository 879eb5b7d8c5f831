//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::models::TradingMode;
use crate::tui::app::{App, ConnectionStatus, NoticeKind};

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let status_color = match app.connection_status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting => Color::Yellow,
        ConnectionStatus::Disconnected => Color::Red,
    };

    // Mode badge: red background when real money is at stake
    let mode = app.mode.displayed();
    let badge_style = match mode {
        TradingMode::Live => Style::default().fg(Color::White).bg(Color::Red),
        TradingMode::Paper => Style::default().fg(Color::Black).bg(Color::Yellow),
    };
    let pending_span = if app.mode.is_pending() {
        Span::styled(" pending ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };

    let age_span = match app.snapshot_age() {
        Some(age) => Span::styled(
            format!(" updated {}s ago ", age.as_secs()),
            Style::default().fg(Color::Gray),
        ),
        None => Span::styled(" no data ", Style::default().fg(Color::Gray)),
    };

    let notice_span = if let Some(ref notice) = app.notice {
        let color = match notice.kind {
            NoticeKind::Info => Color::Green,
            NoticeKind::Error => Color::Red,
        };
        Span::styled(format!(" {} ", notice.message), Style::default().fg(color))
    } else {
        Span::raw("")
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label().to_uppercase()),
            badge_style,
        ),
        pending_span,
        Span::raw("│"),
        Span::styled(
            format!(" {} ", app.connection_status.label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        age_span,
        Span::raw("│"),
        notice_span,
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
