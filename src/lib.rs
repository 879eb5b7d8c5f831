//! Live monitor and trading-mode switch for an automated trading backend.
//!
//! Subscribes to the backend's push channel for account snapshots and lets
//! an operator flip the backend between paper and live trading, with an
//! optimistic local update that is rolled back if the backend refuses.

pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod mode;
pub mod models;
pub mod persist;
pub mod tls;
pub mod tui;

pub use error::{Result, TradewatchError};
