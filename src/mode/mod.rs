//! Mode Controller: switching the backend between paper and live trading.
//!
//! - [`controller`] - The optimistic toggle state machine
//! - [`endpoint`] - The HTTP call that asks the backend to switch
//!
//! [`spawn_mode_change`] glues the two together: it sends a
//! [`ToggleRequest`] with a bounded wait and posts the outcome back to the
//! store, which feeds it to [`ModeController::resolve`].

pub mod controller;
pub mod endpoint;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::TradewatchError;
use crate::tui::Message;

pub use controller::{
    FAILURE_NOTICE, ModeController, ModeOutcome, RequestId, Resolution, TogglePhase,
    ToggleRejected, ToggleRequest,
};
pub use endpoint::{HttpModeEndpoint, ModeEndpoint, UPDATE_CONFIG_PATH};

/// Sends `request` and waits at most `timeout` for the backend.
///
/// Errors and timeouts both come back as [`ModeOutcome::Failed`]; this never
/// leaves the caller waiting indefinitely.
pub async fn request_mode_change<E: ModeEndpoint>(
    endpoint: &E,
    request: ToggleRequest,
    timeout: Duration,
) -> ModeOutcome {
    match tokio::time::timeout(timeout, endpoint.set_mode(request.requested)).await {
        Ok(Ok(())) => ModeOutcome::Accepted,
        Ok(Err(e)) => {
            warn!(id = %request.id, "Mode change request failed: {e}");
            ModeOutcome::Failed(e.to_string())
        }
        Err(_) => {
            let e = TradewatchError::Timeout(timeout);
            warn!(id = %request.id, "Mode change request failed: {e}");
            ModeOutcome::Failed(e.to_string())
        }
    }
}

/// Runs [`request_mode_change`] on a task and posts
/// [`Message::ModeResolved`] to the store when it finishes.
pub fn spawn_mode_change<E: ModeEndpoint>(
    endpoint: Arc<E>,
    request: ToggleRequest,
    timeout: Duration,
    tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = request_mode_change(endpoint.as_ref(), request, timeout).await;
        // The store may already be gone during shutdown.
        let _ = tx.send(Message::ModeResolved {
            id: request.id,
            outcome,
        });
    })
}
