//! Shared models for the backend's push channel and control endpoint.
//!
//! Contains the account snapshot types, the trading mode, the push-channel
//! envelope decoder, and the mode-change request/response bodies.

pub mod account;
pub mod envelope;
pub mod mode;

pub use account::{AccountState, Trade, TradeAction, TradeDate};
pub use envelope::{FeedEvent, UPDATE_TYPE, decode_feed_message};
pub use mode::{ModeChangeRequest, ModeChangeResponse, TradingMode};
