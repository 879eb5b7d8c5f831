//! Application configuration loaded from environment variables.
//!
//! Every value has a default that matches a backend running on the local
//! machine:
//! - `TRADEWATCH_WEBSOCKET_URL`: push channel (default `ws://localhost:6789`)
//! - `TRADEWATCH_API_URL`: control endpoint base (default `http://localhost:5000`)
//! - `TRADEWATCH_TOGGLE_TIMEOUT_MS`: bound on a mode-change request (default 10000)
//! - `TRADEWATCH_RECONNECT`: reconnect after the push channel drops (default `true`)
//! - `TRADEWATCH_RECONNECT_INITIAL_MS` / `TRADEWATCH_RECONNECT_MAX_MS`: backoff bounds
//! - `TRADEWATCH_INITIAL_MODE`: `paper` or `live` when no state file exists
//! - `TRADEWATCH_STATE_FILE`: where the last confirmed mode is remembered
//! - `TRADEWATCH_CA_CERT`: PEM file pinning the backend's CA for `wss`/`https`
//! - `TRADEWATCH_LOG_FILE`: tracing output (default `tradewatch.log`)

use std::path::PathBuf;
use std::time::Duration;

use crate::TradewatchError;
use crate::models::TradingMode;

const DEFAULT_WEBSOCKET_URL: &str = "ws://localhost:6789";
const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TOGGLE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RECONNECT_INITIAL: Duration = Duration::from_secs(1);
const DEFAULT_RECONNECT_MAX: Duration = Duration::from_secs(60);
const DEFAULT_LOG_FILE: &str = "tradewatch.log";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub feed: FeedConfig,
    pub mode: ModeConfig,
    pub log_file: PathBuf,
}

/// Where the backend lives.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub websocket_url: String,
    pub api_url: String,
    pub ca_cert: Option<PathBuf>,
}

/// Push-channel reconnection policy.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub reconnect: bool,
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            reconnect: true,
            reconnect_initial: DEFAULT_RECONNECT_INITIAL,
            reconnect_max: DEFAULT_RECONNECT_MAX,
        }
    }
}

/// Mode controller settings.
#[derive(Debug, Clone)]
pub struct ModeConfig {
    pub toggle_timeout: Duration,
    pub initial_mode: TradingMode,
    pub state_file: Option<PathBuf>,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            toggle_timeout: DEFAULT_TOGGLE_TIMEOUT,
            initial_mode: TradingMode::Paper,
            state_file: None,
        }
    }
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`TradewatchError::Config`] if a URL has the wrong scheme, a
/// number or flag does not parse, a duration is zero, or the backoff floor
/// exceeds its ceiling.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let websocket_url = non_empty_var("TRADEWATCH_WEBSOCKET_URL")
        .unwrap_or_else(|| DEFAULT_WEBSOCKET_URL.to_string());
    require_scheme("TRADEWATCH_WEBSOCKET_URL", &websocket_url, &["ws://", "wss://"])?;

    let api_url = non_empty_var("TRADEWATCH_API_URL")
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string();
    require_scheme("TRADEWATCH_API_URL", &api_url, &["http://", "https://"])?;

    let toggle_timeout = duration_var("TRADEWATCH_TOGGLE_TIMEOUT_MS", DEFAULT_TOGGLE_TIMEOUT)?;
    let reconnect = bool_var("TRADEWATCH_RECONNECT", true)?;
    let reconnect_initial =
        duration_var("TRADEWATCH_RECONNECT_INITIAL_MS", DEFAULT_RECONNECT_INITIAL)?;
    let reconnect_max = duration_var("TRADEWATCH_RECONNECT_MAX_MS", DEFAULT_RECONNECT_MAX)?;
    if reconnect_initial > reconnect_max {
        return Err(TradewatchError::Config(
            "TRADEWATCH_RECONNECT_INITIAL_MS exceeds TRADEWATCH_RECONNECT_MAX_MS".to_string(),
        ));
    }

    let initial_mode = match non_empty_var("TRADEWATCH_INITIAL_MODE") {
        Some(value) => value.parse()?,
        None => TradingMode::Paper,
    };

    Ok(AppConfig {
        backend: BackendConfig {
            websocket_url,
            api_url,
            ca_cert: non_empty_var("TRADEWATCH_CA_CERT").map(PathBuf::from),
        },
        feed: FeedConfig {
            reconnect,
            reconnect_initial,
            reconnect_max,
        },
        mode: ModeConfig {
            toggle_timeout,
            initial_mode,
            state_file: non_empty_var("TRADEWATCH_STATE_FILE").map(PathBuf::from),
        },
        log_file: non_empty_var("TRADEWATCH_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn require_scheme(name: &str, url: &str, schemes: &[&str]) -> crate::Result<()> {
    if schemes.iter().any(|scheme| url.starts_with(scheme)) {
        Ok(())
    } else {
        Err(TradewatchError::Config(format!(
            "{name} must start with one of {schemes:?}, got {url:?}"
        )))
    }
}

/// Reads a positive millisecond count.
fn duration_var(name: &str, default: Duration) -> crate::Result<Duration> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(default);
    };
    let millis: u64 = raw
        .trim()
        .parse()
        .map_err(|e| TradewatchError::Config(format!("{name} is not a number: {e}")))?;
    if millis == 0 {
        return Err(TradewatchError::Config(format!("{name} must be positive")));
    }
    Ok(Duration::from_millis(millis))
}

fn bool_var(name: &str, default: bool) -> crate::Result<bool> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(TradewatchError::Config(format!(
            "{name} must be a boolean, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const ALL_VARS: [&str; 10] = [
        "TRADEWATCH_WEBSOCKET_URL",
        "TRADEWATCH_API_URL",
        "TRADEWATCH_TOGGLE_TIMEOUT_MS",
        "TRADEWATCH_RECONNECT",
        "TRADEWATCH_RECONNECT_INITIAL_MS",
        "TRADEWATCH_RECONNECT_MAX_MS",
        "TRADEWATCH_INITIAL_MODE",
        "TRADEWATCH_STATE_FILE",
        "TRADEWATCH_CA_CERT",
        "TRADEWATCH_LOG_FILE",
    ];

    /// Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Clears every config var, applies `vars`, runs `f`, then restores originals.
    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let originals: Vec<(&str, Option<String>)> = ALL_VARS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: every env mutation in this module happens under ENV_LOCK.
        unsafe {
            for k in ALL_VARS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values, still under ENV_LOCK.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(&[], || {
            let config = fetch_config().unwrap();
            assert_eq!(config.backend.websocket_url, DEFAULT_WEBSOCKET_URL);
            assert_eq!(config.backend.api_url, DEFAULT_API_URL);
            assert!(config.backend.ca_cert.is_none());
            assert!(config.feed.reconnect);
            assert_eq!(config.feed.reconnect_initial, DEFAULT_RECONNECT_INITIAL);
            assert_eq!(config.feed.reconnect_max, DEFAULT_RECONNECT_MAX);
            assert_eq!(config.mode.toggle_timeout, DEFAULT_TOGGLE_TIMEOUT);
            assert_eq!(config.mode.initial_mode, TradingMode::Paper);
            assert!(config.mode.state_file.is_none());
            assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        });
    }

    #[test]
    fn overrides_from_env() {
        with_env(
            &[
                ("TRADEWATCH_WEBSOCKET_URL", "wss://bot.example.com/feed"),
                ("TRADEWATCH_API_URL", "https://bot.example.com/"),
                ("TRADEWATCH_TOGGLE_TIMEOUT_MS", "2500"),
                ("TRADEWATCH_RECONNECT", "off"),
                ("TRADEWATCH_INITIAL_MODE", "live"),
                ("TRADEWATCH_STATE_FILE", "/tmp/tradewatch-mode.json"),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.backend.websocket_url, "wss://bot.example.com/feed");
                assert_eq!(config.backend.api_url, "https://bot.example.com");
                assert_eq!(config.mode.toggle_timeout, Duration::from_millis(2500));
                assert!(!config.feed.reconnect);
                assert_eq!(config.mode.initial_mode, TradingMode::Live);
                assert_eq!(
                    config.mode.state_file,
                    Some(PathBuf::from("/tmp/tradewatch-mode.json"))
                );
            },
        );
    }

    #[test]
    fn rejects_http_websocket_url() {
        with_env(
            &[("TRADEWATCH_WEBSOCKET_URL", "http://localhost:6789")],
            || {
                let err = fetch_config().unwrap_err();
                assert!(err.to_string().contains("TRADEWATCH_WEBSOCKET_URL"));
            },
        );
    }

    #[test]
    fn rejects_zero_timeout() {
        with_env(&[("TRADEWATCH_TOGGLE_TIMEOUT_MS", "0")], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("must be positive"));
        });
    }

    #[test]
    fn rejects_inverted_backoff_bounds() {
        with_env(
            &[
                ("TRADEWATCH_RECONNECT_INITIAL_MS", "5000"),
                ("TRADEWATCH_RECONNECT_MAX_MS", "1000"),
            ],
            || {
                assert!(fetch_config().is_err());
            },
        );
    }

    #[test]
    fn rejects_unknown_mode_and_flag() {
        with_env(&[("TRADEWATCH_INITIAL_MODE", "demo")], || {
            assert!(fetch_config().is_err());
        });
        with_env(&[("TRADEWATCH_RECONNECT", "maybe")], || {
            assert!(fetch_config().is_err());
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[
                ("TRADEWATCH_WEBSOCKET_URL", ""),
                ("TRADEWATCH_API_URL", ""),
                ("TRADEWATCH_STATE_FILE", ""),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.backend.websocket_url, DEFAULT_WEBSOCKET_URL);
                assert_eq!(config.backend.api_url, DEFAULT_API_URL);
                assert!(config.mode.state_file.is_none());
            },
        );
    }
}
