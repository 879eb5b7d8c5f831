//! Push-channel connection lifecycle.
//!
//! [`FeedManager`] connects, decodes every inbound frame, forwards account
//! snapshots to the store in arrival order, and reconnects with exponential
//! backoff when the channel drops.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};
use tungstenite::Message as WsMessage;

use super::{WsReader, WsWriter, connect};
use crate::config::FeedConfig;
use crate::models::{FeedEvent, decode_feed_message};
use crate::tui::Message;

/// Why the reader loop exited.
#[derive(Debug, PartialEq, Eq)]
enum DisconnectReason {
    /// The connection was lost, errored, or closed by the server.
    ConnectionError,
    /// Teardown was requested or the store went away.
    Shutdown,
}

/// Owns the push channel for its whole lifetime, across reconnects.
pub struct FeedManager {
    url: String,
    tls_config: Option<Arc<rustls::ClientConfig>>,
    policy: FeedConfig,
    tx: mpsc::UnboundedSender<Message>,
    shutdown: watch::Receiver<bool>,
}

impl FeedManager {
    /// Creates a new feed manager.
    #[must_use]
    pub fn new(
        url: String,
        tls_config: Option<Arc<rustls::ClientConfig>>,
        policy: FeedConfig,
        tx: mpsc::UnboundedSender<Message>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            url,
            tls_config,
            policy,
            tx,
            shutdown,
        }
    }

    /// Runs until teardown, or until the first disconnect when reconnection
    /// is disabled.
    pub async fn run(mut self) {
        let mut backoff = self.policy.reconnect_initial;
        let mut first_attempt = true;

        loop {
            let status = if first_attempt {
                Message::Connecting
            } else {
                Message::Reconnecting
            };
            first_attempt = false;
            if self.tx.send(status).is_err() {
                return;
            }

            info!(url = %self.url, "Connecting to push channel");
            let connected = tokio::select! {
                result = connect(&self.url, self.tls_config.clone()) => result,
                () = wait_for_shutdown(&mut self.shutdown) => {
                    self.finish();
                    return;
                }
            };

            let (write, mut read) = match connected {
                Ok(pair) => pair,
                Err(e) => {
                    error!("Connection failed: {e}");
                    let _ = self.tx.send(Message::Disconnected);
                    if !self.back_off(&mut backoff).await {
                        return;
                    }
                    continue;
                }
            };

            let _ = self.tx.send(Message::Connected);
            info!("Push channel connected");
            backoff = self.policy.reconnect_initial;

            let reason = self.read_loop(&mut read).await;
            match reason {
                DisconnectReason::Shutdown => {
                    close_socket(write).await;
                    self.finish();
                    return;
                }
                DisconnectReason::ConnectionError => {
                    drop(write);
                    let _ = self.tx.send(Message::Disconnected);
                    if !self.back_off(&mut backoff).await {
                        return;
                    }
                }
            }
        }
    }

    /// Sleeps for the current backoff and doubles it up to the ceiling.
    ///
    /// Returns `false` if the manager should stop instead of retrying.
    async fn back_off(&mut self, backoff: &mut Duration) -> bool {
        if !self.policy.reconnect {
            info!("Reconnection disabled, push channel stays down");
            return false;
        }

        info!(backoff_ms = backoff.as_millis() as u64, "Backing off before retry");
        tokio::select! {
            () = tokio::time::sleep(*backoff) => {}
            () = wait_for_shutdown(&mut self.shutdown) => {
                self.finish();
                return false;
            }
        }
        *backoff = next_backoff(*backoff, self.policy.reconnect_max);
        true
    }

    /// Reads frames until disconnection or shutdown.
    async fn read_loop(&mut self, read: &mut WsReader) -> DisconnectReason {
        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            if !dispatch(&self.tx, text.as_str()) {
                                return DisconnectReason::Shutdown;
                            }
                        }
                        Some(Ok(WsMessage::Close(frame))) => {
                            info!(?frame, "Server closed push channel");
                            return DisconnectReason::ConnectionError;
                        }
                        Some(Ok(_)) => {} // Binary/Ping/Pong frames
                        Some(Err(e)) => {
                            warn!("WebSocket error: {e}");
                            return DisconnectReason::ConnectionError;
                        }
                        None => {
                            warn!("WebSocket stream ended");
                            return DisconnectReason::ConnectionError;
                        }
                    }
                }

                () = wait_for_shutdown(&mut self.shutdown) => {
                    return DisconnectReason::Shutdown;
                }
            }
        }
    }

    /// Tells the store the subscriber is gone so it discards its snapshot.
    fn finish(&self) {
        let _ = self.tx.send(Message::FeedClosed);
        info!("Push channel subscriber stopped");
    }
}

/// Decodes one text frame and forwards it to the store.
///
/// Returns `false` if the store's receiver is gone.
fn dispatch(tx: &mpsc::UnboundedSender<Message>, text: &str) -> bool {
    match decode_feed_message(text) {
        FeedEvent::Update(state) => {
            debug!(
                balance = %state.balance,
                trades = state.trades.len(),
                "Account snapshot received"
            );
            tx.send(Message::AccountUpdate(state)).is_ok()
        }
        FeedEvent::Ignored(tpe) => {
            debug!(tpe, "Ignoring push message");
            true
        }
        FeedEvent::Malformed(reason) => {
            warn!(%reason, "Dropping malformed push message");
            true
        }
    }
}

/// Sends the close frame. Consumes the writer so it cannot run twice.
async fn close_socket(mut write: WsWriter) {
    match write.close().await {
        Ok(()) => info!("Push channel closed"),
        Err(e) => debug!("Close handshake failed: {e}"),
    }
}

/// Resolves once teardown is requested or the handle is dropped.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

fn next_backoff(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}
