use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use tradewatch::config::{AppConfig, fetch_config};
use tradewatch::feed::spawn_feed;
use tradewatch::logging::init_logging;
use tradewatch::mode::{HttpModeEndpoint, spawn_mode_change};
use tradewatch::tls::optional_tls_config;
use tradewatch::tui::event::{spawn_event_reader, spawn_tick_timer};
use tradewatch::tui::{Action, App, Message, Tui, render, restore_terminal, setup_terminal, update};
use tradewatch::{TradewatchError, persist};

/// Tick interval for notice expiry and redraws.
const TICK_INTERVAL_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<(), TradewatchError> {
    let config = fetch_config()?;
    init_logging(&config.log_file)?;

    let tls_config = optional_tls_config(config.backend.ca_cert.as_deref())?;
    let endpoint = Arc::new(HttpModeEndpoint::new(
        &config.backend.api_url,
        tls_config.clone(),
    )?);

    let initial_mode =
        persist::initial_mode(config.mode.state_file.as_deref(), config.mode.initial_mode);
    info!(mode = %initial_mode, api = endpoint.url(), "Starting dashboard");
    let mut app = App::new(initial_mode);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut terminal = setup_terminal()?;

    let mut feed = spawn_feed(
        config.backend.websocket_url.clone(),
        tls_config,
        config.feed.clone(),
        tx.clone(),
    );
    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), TICK_INTERVAL_MS);

    let result = run(&mut terminal, &mut app, &mut rx, &tx, &endpoint, &config).await;

    // Responses still in flight must not land on a torn-down store.
    app.mode.cancel();
    feed.disconnect().await;
    restore_terminal(&mut terminal)?;
    info!("Dashboard stopped");

    result
}

/// Drives the store: render, wait for a message, apply it and everything
/// queued behind it in order, then handle the resulting actions.
async fn run(
    terminal: &mut Tui,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<Message>,
    tx: &mpsc::UnboundedSender<Message>,
    endpoint: &Arc<HttpModeEndpoint>,
    config: &AppConfig,
) -> Result<(), TradewatchError> {
    loop {
        terminal
            .draw(|frame| render(frame, app))
            .map_err(|e| TradewatchError::Io(format!("failed to draw: {e}")))?;

        let Some(message) = rx.recv().await else {
            return Ok(());
        };

        let mut next = Some(message);
        while let Some(message) = next {
            if let Some(action) = update(app, message) {
                handle_action(action, tx, endpoint, config);
            }
            next = rx.try_recv().ok();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_action(
    action: Action,
    tx: &mpsc::UnboundedSender<Message>,
    endpoint: &Arc<HttpModeEndpoint>,
    config: &AppConfig,
) {
    match action {
        Action::RequestModeChange(request) => {
            spawn_mode_change(
                Arc::clone(endpoint),
                request,
                config.mode.toggle_timeout,
                tx.clone(),
            );
        }
        Action::ModeConfirmed(mode) => {
            if let Some(path) = config.mode.state_file.as_deref()
                && let Err(e) = persist::save_mode(path, mode)
            {
                warn!("Failed to remember trading mode: {e}");
            }
        }
    }
}
