//! Optimistic toggle state machine.
//!
//! `Idle → Pending(requested) → Confirmed(requested) | RolledBack(previous) → Idle`
//!
//! The controller keeps two copies of the mode: the last one the backend
//! confirmed, and the one currently displayed. They only differ while a
//! request is pending.

use std::fmt;

use tracing::{debug, info, warn};

use crate::models::TradingMode;

/// Notice shown when the backend refuses or never answers.
pub const FAILURE_NOTICE: &str = "Failed to update trading mode.";

/// Identifies one toggle request so late responses can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mode change the caller must send to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRequest {
    pub id: RequestId,
    pub requested: TradingMode,
}

/// What the backend said about a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeOutcome {
    Accepted,
    Failed(String),
}

/// Why [`ModeController::toggle`] refused to start a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ToggleRejected {
    #[error("a switch to {requested} trading is already in flight")]
    InFlight { requested: TradingMode },
}

/// Where the controller is in the toggle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePhase {
    Idle,
    Pending {
        id: RequestId,
        requested: TradingMode,
        previous: TradingMode,
    },
}

/// Terminal state of one toggle cycle. The controller is `Idle` again by the
/// time the caller sees this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Confirmed(TradingMode),
    RolledBack {
        restored: TradingMode,
        reason: String,
    },
}

impl Resolution {
    /// User-facing one-shot notice for this resolution.
    pub fn notice(&self) -> String {
        match self {
            Resolution::Confirmed(mode) => format!("Trading mode updated to: {mode}"),
            Resolution::RolledBack { .. } => FAILURE_NOTICE.to_string(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Resolution::Confirmed(_))
    }
}

/// Owns the local copy of the trading mode.
#[derive(Debug)]
pub struct ModeController {
    confirmed: TradingMode,
    phase: TogglePhase,
    next_id: u64,
}

impl ModeController {
    /// Creates an idle controller whose confirmed mode is `initial`.
    #[must_use]
    pub fn new(initial: TradingMode) -> Self {
        Self {
            confirmed: initial,
            phase: TogglePhase::Idle,
            next_id: 1,
        }
    }

    /// Last mode the backend accepted (or the startup value).
    pub fn confirmed(&self) -> TradingMode {
        self.confirmed
    }

    /// Mode to show the operator right now.
    pub fn displayed(&self) -> TradingMode {
        match self.phase {
            TogglePhase::Idle => self.confirmed,
            TogglePhase::Pending { requested, .. } => requested,
        }
    }

    pub fn phase(&self) -> TogglePhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, TogglePhase::Pending { .. })
    }

    /// Flips the displayed mode and returns the request to send.
    ///
    /// # Errors
    ///
    /// Returns [`ToggleRejected::InFlight`] if a request is already pending;
    /// the displayed mode is left untouched.
    pub fn toggle(&mut self) -> Result<ToggleRequest, ToggleRejected> {
        if let TogglePhase::Pending { requested, .. } = self.phase {
            debug!(%requested, "Toggle rejected, request in flight");
            return Err(ToggleRejected::InFlight { requested });
        }

        let previous = self.confirmed;
        let requested = previous.toggled();
        let id = RequestId(self.next_id);
        self.next_id += 1;

        self.phase = TogglePhase::Pending {
            id,
            requested,
            previous,
        };
        info!(%id, from = %previous, to = %requested, "Requesting trading mode change");

        Ok(ToggleRequest { id, requested })
    }

    /// Applies the backend's answer for request `id`.
    ///
    /// Returns `None` if `id` is not the pending request (stale or
    /// cancelled); state is not touched in that case.
    pub fn resolve(&mut self, id: RequestId, outcome: ModeOutcome) -> Option<Resolution> {
        let TogglePhase::Pending {
            id: active,
            requested,
            previous,
        } = self.phase
        else {
            debug!(%id, "Ignoring response, no request pending");
            return None;
        };
        if active != id {
            debug!(%id, %active, "Ignoring stale response");
            return None;
        }

        self.phase = TogglePhase::Idle;
        let resolution = match outcome {
            ModeOutcome::Accepted => {
                self.confirmed = requested;
                info!(%id, mode = %requested, "Trading mode confirmed");
                Resolution::Confirmed(requested)
            }
            ModeOutcome::Failed(reason) => {
                self.confirmed = previous;
                warn!(%id, restored = %previous, %reason, "Trading mode change failed, rolled back");
                Resolution::RolledBack {
                    restored: previous,
                    reason,
                }
            }
        };
        Some(resolution)
    }

    /// Abandons the pending request, restoring the confirmed mode.
    ///
    /// Any response that arrives for it afterwards is stale. Returns the id
    /// that was abandoned, if any.
    pub fn cancel(&mut self) -> Option<RequestId> {
        match self.phase {
            TogglePhase::Idle => None,
            TogglePhase::Pending { id, previous, .. } => {
                self.phase = TogglePhase::Idle;
                self.confirmed = previous;
                info!(%id, "Pending mode change abandoned");
                Some(id)
            }
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(TradingMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_is_optimistic() {
        let mut controller = ModeController::new(TradingMode::Paper);
        let request = controller.toggle().unwrap();

        assert_eq!(request.requested, TradingMode::Live);
        assert_eq!(controller.displayed(), TradingMode::Live);
        assert_eq!(controller.confirmed(), TradingMode::Paper);
        assert!(controller.is_pending());
    }

    #[test]
    fn success_confirms_requested_mode() {
        let mut controller = ModeController::new(TradingMode::Paper);
        let request = controller.toggle().unwrap();

        let resolution = controller.resolve(request.id, ModeOutcome::Accepted).unwrap();

        assert_eq!(resolution, Resolution::Confirmed(TradingMode::Live));
        assert_eq!(resolution.notice(), "Trading mode updated to: Live");
        assert_eq!(controller.displayed(), TradingMode::Live);
        assert_eq!(controller.confirmed(), TradingMode::Live);
        assert_eq!(controller.phase(), TogglePhase::Idle);
    }

    #[test]
    fn failure_rolls_back() {
        let mut controller = ModeController::new(TradingMode::Paper);
        let request = controller.toggle().unwrap();

        let resolution = controller
            .resolve(request.id, ModeOutcome::Failed("status 500".into()))
            .unwrap();

        assert!(!resolution.is_confirmed());
        assert_eq!(resolution.notice(), FAILURE_NOTICE);
        assert_eq!(controller.displayed(), TradingMode::Paper);
        assert_eq!(controller.confirmed(), TradingMode::Paper);
        assert_eq!(controller.displayed().switch_label(), "Switch to Live Trading");
    }

    #[test]
    fn second_toggle_rejected_while_pending() {
        let mut controller = ModeController::new(TradingMode::Paper);
        let first = controller.toggle().unwrap();

        let err = controller.toggle().unwrap_err();
        assert_eq!(
            err,
            ToggleRejected::InFlight {
                requested: TradingMode::Live
            }
        );
        assert_eq!(controller.displayed(), TradingMode::Live);

        controller.resolve(first.id, ModeOutcome::Accepted);
        let second = controller.toggle().unwrap();
        assert_eq!(second.requested, TradingMode::Paper);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut controller = ModeController::new(TradingMode::Paper);
        let first = controller.toggle().unwrap();
        controller.resolve(first.id, ModeOutcome::Failed("timeout".into()));
        let second = controller.toggle().unwrap();

        // A late answer to the first request must not touch the second.
        assert!(controller.resolve(first.id, ModeOutcome::Accepted).is_none());
        assert!(controller.is_pending());
        assert_eq!(controller.displayed(), second.requested);
    }

    #[test]
    fn response_after_cancel_is_ignored() {
        let mut controller = ModeController::new(TradingMode::Live);
        let request = controller.toggle().unwrap();

        assert_eq!(controller.cancel(), Some(request.id));
        assert_eq!(controller.displayed(), TradingMode::Live);
        assert!(controller.resolve(request.id, ModeOutcome::Accepted).is_none());
        assert_eq!(controller.confirmed(), TradingMode::Live);
        assert_eq!(controller.cancel(), None);
    }

    #[test]
    fn displayed_matches_confirmed_after_every_resolution() {
        let outcomes = [
            ModeOutcome::Accepted,
            ModeOutcome::Failed("a".into()),
            ModeOutcome::Accepted,
            ModeOutcome::Accepted,
            ModeOutcome::Failed("b".into()),
        ];
        let mut controller = ModeController::default();
        for outcome in outcomes {
            let request = controller.toggle().unwrap();
            controller.resolve(request.id, outcome);
            assert_eq!(controller.displayed(), controller.confirmed());
        }
        assert_eq!(controller.confirmed(), TradingMode::Paper.toggled().toggled().toggled());
    }
}
