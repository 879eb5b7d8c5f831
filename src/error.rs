//! Crate-level error types.
//!
//! [`TradewatchError`] unifies every error source (configuration, WebSocket,
//! HTTP, JSON) behind a single enum so callers can match on the variant they
//! care about while still using the `?` operator for easy propagation.
//!
//! None of these escalate past the event loop: the feed turns them into a
//! connection state and the mode controller turns them into a rollback.

use std::time::Duration;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TradewatchError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum TradewatchError {
    /// An environment variable or state file held an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// An HTTP request to the backend failed before a status was received.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(String),

    /// The pinned CA certificate could not be loaded.
    #[error("tls error: {0}")]
    Tls(String),

    /// The backend did not answer within the configured bound.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-success status.
    #[error("backend rejected request ({status}): {reason}")]
    Rejected { status: u16, reason: String },
}
