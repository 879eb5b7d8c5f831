//! Account snapshot models.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Complete account state pushed by the backend.
///
/// Every snapshot replaces the previous one wholesale; nothing is merged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountState {
    /// Cash balance in account currency.
    pub balance: Decimal,
    /// Executed trades, oldest first.
    pub trades: Vec<Trade>,
    /// Open positions by symbol. Older backends omit this field.
    #[serde(default)]
    pub positions: BTreeMap<String, Decimal>,
}

impl AccountState {
    /// Formats the balance the way the dashboard shows it, e.g. `$1042.50`.
    ///
    /// Halves round away from zero, so `1042.565` shows as `$1042.57`.
    pub fn balance_display(&self) -> String {
        let rounded = self
            .balance
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("${rounded:.2}")
    }

    /// Returns the trade history as display lines, oldest first.
    pub fn trade_lines(&self) -> Vec<String> {
        self.trades.iter().map(Trade::display_line).collect()
    }
}

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Trade {
    pub date: TradeDate,
    pub action: TradeAction,
    pub price: Decimal,
}

impl Trade {
    /// Formats the trade as `date: ACTION at $price`.
    pub fn display_line(&self) -> String {
        format!("{}: {} at ${}", self.date, self.action, self.price)
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    #[serde(alias = "BUY")]
    Buy,
    #[serde(alias = "SELL")]
    Sell,
}

impl TradeAction {
    /// Returns the upper-cased display form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a trade happened, as the backend reported it.
///
/// The backend sends either a preformatted string or a numeric timestamp,
/// integer or fractional; both are shown unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TradeDate {
    Text(String),
    Timestamp(serde_json::Number),
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDate::Text(text) => f.write_str(text),
            TradeDate::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}
