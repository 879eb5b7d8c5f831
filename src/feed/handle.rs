//! Scoped ownership of a running subscriber.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Owns the subscriber task and the push channel it holds.
///
/// The channel is released exactly once: either by [`disconnect`](Self::disconnect)
/// or, if the handle is dropped first, by the task reacting to the dropped
/// shutdown signal.
pub struct FeedHandle {
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl FeedHandle {
    pub(super) fn new(shutdown: watch::Sender<bool>, task: JoinHandle<()>) -> Self {
        Self {
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Returns `true` until [`disconnect`](Self::disconnect) has been called.
    pub fn is_active(&self) -> bool {
        self.shutdown.is_some()
    }

    /// Closes the push channel and waits for the subscriber to stop.
    ///
    /// Idempotent: later calls return immediately.
    pub async fn disconnect(&mut self) {
        let Some(shutdown) = self.shutdown.take() else {
            return;
        };
        let _ = shutdown.send(true);

        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!("Feed task ended abnormally: {e}");
        }
        info!("Feed disconnected");
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        // The task observes the signal (or the dropped sender) and closes
        // the socket on its own; the join handle is detached.
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
    }
}
