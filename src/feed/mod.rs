//! Live State Subscriber: the backend's push channel.
//!
//! This module is organized by concern:
//! - [`connection`] - Reader loop, decode/dispatch and reconnection backoff
//! - [`handle`] - Scoped ownership of the running subscriber
//!
//! The subscriber never returns connection errors to its caller. Failures
//! show up as [`Message::Disconnected`](crate::tui::Message::Disconnected)
//! in the store while the manager retries in the background.

mod connection;
mod handle;

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config,
};
use tracing::info;
use tungstenite::Message as WsMessage;

use crate::Result;
use crate::config::FeedConfig;
use crate::tui::Message;

pub use connection::FeedManager;
pub use handle::FeedHandle;

/// Write half of a push-channel connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;

/// Read half of a push-channel connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// When `tls_config` is set, `wss://` URLs are verified against it instead
/// of the default web PKI roots.
///
/// # Errors
///
/// Returns a [`TradewatchError`](crate::TradewatchError) if the connection
/// or TLS handshake fails.
pub async fn connect(
    url: &str,
    tls_config: Option<Arc<rustls::ClientConfig>>,
) -> Result<(WsWriter, WsReader)> {
    let connector = tls_config.map(Connector::Rustls);
    let (ws_stream, _) = connect_async_tls_with_config(url, None, false, connector).await?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}

/// Starts the subscriber on a background task.
///
/// Snapshots and connection-state changes are posted to `tx` in arrival
/// order. The returned handle owns the channel; see [`FeedHandle::disconnect`].
pub fn spawn_feed(
    url: String,
    tls_config: Option<Arc<rustls::ClientConfig>>,
    policy: FeedConfig,
    tx: mpsc::UnboundedSender<Message>,
) -> FeedHandle {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let manager = FeedManager::new(url, tls_config, policy, tx, shutdown_rx);
    let task = tokio::spawn(manager.run());
    FeedHandle::new(shutdown_tx, task)
}
