//! Push-channel envelope decoding.
//!
//! Every frame is a JSON object with a `type` field. Only `"update"` carries
//! an account snapshot in `data`; other types are reserved for future message
//! kinds and are skipped.

use serde::Deserialize;

use super::account::AccountState;

/// Envelope type carrying an [`AccountState`] snapshot.
pub const UPDATE_TYPE: &str = "update";

/// Result of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// A complete account snapshot.
    Update(AccountState),
    /// A well-formed envelope of a type this client does not handle.
    Ignored(String),
    /// The frame could not be decoded; the reason is for logging only.
    Malformed(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    tpe: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Decodes a text frame from the push channel.
///
/// Never fails: anything that is not a usable envelope comes back as
/// [`FeedEvent::Malformed`].
pub fn decode_feed_message(text: &str) -> FeedEvent {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => return FeedEvent::Malformed(format!("invalid envelope: {e}")),
    };

    if envelope.tpe != UPDATE_TYPE {
        return FeedEvent::Ignored(envelope.tpe);
    }

    let Some(data) = envelope.data else {
        return FeedEvent::Malformed("update without data".to_string());
    };

    match serde_json::from_value::<AccountState>(data) {
        Ok(state) => FeedEvent::Update(state),
        Err(e) => FeedEvent::Malformed(format!("invalid account state: {e}")),
    }
}
