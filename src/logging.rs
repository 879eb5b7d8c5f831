//! Tracing setup.
//!
//! The dashboard owns the terminal, so log output goes to a file. The
//! filter comes from `RUST_LOG` and defaults to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::{Result, TradewatchError};

/// Installs the global subscriber, appending to `path`.
///
/// # Errors
///
/// Returns [`TradewatchError::Io`] if the file cannot be opened or a global
/// subscriber is already installed.
pub fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TradewatchError::Io(format!("failed to open {}: {e}", path.display())))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| TradewatchError::Io(format!("failed to install logger: {e}")))
}
