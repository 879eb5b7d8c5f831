//! Remembers the last trading mode the backend confirmed.
//!
//! The backend owns the authoritative flag; this file only seeds the
//! client's optimistic mode on the next start.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Result;
use crate::models::TradingMode;

#[derive(Debug, Serialize, Deserialize)]
struct ModeState {
    mode: TradingMode,
}

/// Reads the remembered mode, or `None` if the file is absent or unreadable.
///
/// A corrupt file is logged and treated as absent so startup never fails on it.
pub fn load_mode(path: &Path) -> Option<TradingMode> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), "Failed to read mode state: {e}");
            return None;
        }
    };

    match serde_json::from_str::<ModeState>(&contents) {
        Ok(state) => {
            debug!(path = %path.display(), mode = %state.mode, "Loaded mode state");
            Some(state.mode)
        }
        Err(e) => {
            warn!(path = %path.display(), "Ignoring corrupt mode state: {e}");
            None
        }
    }
}

/// Writes the mode, replacing the file atomically.
///
/// # Errors
///
/// Returns [`TradewatchError::Io`](crate::TradewatchError::Io) if the
/// temporary file cannot be written or renamed into place.
pub fn save_mode(path: &Path, mode: TradingMode) -> Result<()> {
    let json = serde_json::to_string(&ModeState { mode })?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json).map_err(|e| {
        crate::TradewatchError::Io(format!("failed to write {}: {e}", tmp.display()))
    })?;
    std::fs::rename(&tmp, path).map_err(|e| {
        crate::TradewatchError::Io(format!("failed to replace {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), %mode, "Saved mode state");
    Ok(())
}

/// Picks the starting mode: remembered value first, then the configured default.
pub fn initial_mode(state_file: Option<&Path>, fallback: TradingMode) -> TradingMode {
    state_file.and_then(load_mode).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mode.json");

        save_mode(&path, TradingMode::Live).unwrap();
        assert_eq!(load_mode(&path), Some(TradingMode::Live));

        save_mode(&path, TradingMode::Paper).unwrap();
        assert_eq!(load_mode(&path), Some(TradingMode::Paper));
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(load_mode(&path), None);
        assert_eq!(initial_mode(Some(&path), TradingMode::Live), TradingMode::Live);
        assert_eq!(initial_mode(None, TradingMode::Paper), TradingMode::Paper);
    }

    #[test]
    fn corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mode.json");
        std::fs::write(&path, "{\"mode\": \"sideways\"}").unwrap();
        assert_eq!(initial_mode(Some(&path), TradingMode::Paper), TradingMode::Paper);
    }
}
