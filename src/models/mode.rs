//! Trading mode and the mode-change endpoint bodies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TradewatchError;

/// Whether the backend executes against the paper broker or the real one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Paper,
    Live,
}

impl TradingMode {
    pub fn is_live(self) -> bool {
        self == TradingMode::Live
    }

    /// Returns the opposite mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            TradingMode::Paper => TradingMode::Live,
            TradingMode::Live => TradingMode::Paper,
        }
    }

    /// Returns the display name, `"Paper"` or `"Live"`.
    pub fn label(self) -> &'static str {
        match self {
            TradingMode::Paper => "Paper",
            TradingMode::Live => "Live",
        }
    }

    /// Returns the toggle control caption for a client currently in this mode.
    pub fn switch_label(self) -> &'static str {
        match self {
            TradingMode::Paper => "Switch to Live Trading",
            TradingMode::Live => "Switch to Paper Trading",
        }
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TradingMode {
    type Err = TradewatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paper" => Ok(TradingMode::Paper),
            "live" => Ok(TradingMode::Live),
            other => Err(TradewatchError::Config(format!(
                "unknown trading mode {other:?} (expected \"paper\" or \"live\")"
            ))),
        }
    }
}

/// Body of a `POST /update-config` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeChangeRequest {
    pub use_live_trading: bool,
}

impl ModeChangeRequest {
    pub fn new(mode: TradingMode) -> Self {
        Self {
            use_live_trading: mode.is_live(),
        }
    }
}

/// Optional response body of `POST /update-config`.
///
/// Only the status decides success; these fields only enrich logs and the
/// failure notice. Other fields the backend adds are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeChangeResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ModeChangeResponse {
    /// Returns the most specific human-readable text in the body, if any.
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}
