//! Balance, positions and trade history.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::models::{AccountState, TradeAction};
use crate::tui::app::App;

const LOADING: &str = "Loading account info...";

/// Renders the account panel, or a loading line until a snapshot exists.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Account ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(account) = app.account.as_ref() else {
        frame.render_widget(
            Paragraph::new(LOADING).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Balance
            Constraint::Length(position_rows(account)),
            Constraint::Length(1), // Trade history heading
            Constraint::Min(1),    // Trade list
        ])
        .split(inner);

    let balance = Line::from(vec![
        Span::raw("Account Balance: "),
        Span::styled(
            account.balance_display(),
            Style::default().fg(Color::White),
        ),
    ]);
    frame.render_widget(Paragraph::new(balance), layout[0]);

    if !account.positions.is_empty() {
        let positions: Vec<Span> = account
            .positions
            .iter()
            .map(|(symbol, qty)| Span::raw(format!("{symbol}: {qty}  ")))
            .collect();
        let mut line = vec![Span::raw("Open Positions: ")];
        line.extend(positions);
        frame.render_widget(Paragraph::new(Line::from(line)), layout[1]);
    }

    frame.render_widget(Paragraph::new("Trade History:"), layout[2]);

    let items: Vec<ListItem> = account
        .trades
        .iter()
        .map(|trade| {
            let color = match trade.action {
                TradeAction::Buy => Color::Green,
                TradeAction::Sell => Color::Red,
            };
            ListItem::new(trade.display_line()).style(Style::default().fg(color))
        })
        .collect();
    frame.render_widget(List::new(items), layout[3]);
}

fn position_rows(account: &AccountState) -> u16 {
    if account.positions.is_empty() { 0 } else { 1 }
}
