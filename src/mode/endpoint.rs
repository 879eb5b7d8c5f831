//! The backend's mode-change endpoint.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info};

use crate::Result;
use crate::models::{ModeChangeRequest, ModeChangeResponse, TradingMode};

/// Path of the mode-change endpoint below the API base URL.
pub const UPDATE_CONFIG_PATH: &str = "/update-config";

/// Something that can ask the backend to switch trading mode.
///
/// `Ok(())` means the backend accepted the change.
pub trait ModeEndpoint: Send + Sync + 'static {
    fn set_mode(&self, mode: TradingMode) -> impl Future<Output = Result<()>> + Send;
}

/// [`ModeEndpoint`] that POSTs `{"use_live_trading": bool}` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpModeEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpModeEndpoint {
    /// Builds an endpoint for the API rooted at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TradewatchError::Tls`](crate::TradewatchError::Tls) if the
    /// HTTP client cannot be built.
    pub fn new(api_url: &str, tls_config: Option<Arc<rustls::ClientConfig>>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(tls) = tls_config {
            builder = builder.use_preconfigured_tls((*tls).clone());
        }
        let client = builder
            .build()
            .map_err(|e| crate::TradewatchError::Tls(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}{UPDATE_CONFIG_PATH}", api_url.trim_end_matches('/')),
        })
    }

    /// Full URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ModeEndpoint for HttpModeEndpoint {
    async fn set_mode(&self, mode: TradingMode) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&ModeChangeRequest::new(mode))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: ModeChangeResponse = serde_json::from_str(&body).unwrap_or_default();

        if status.is_success() {
            info!(%mode, status = status.as_u16(), message = ?parsed.message, "Backend accepted mode change");
            return Ok(());
        }

        debug!(status = status.as_u16(), body, "Backend refused mode change");
        Err(crate::TradewatchError::Rejected {
            status: status.as_u16(),
            reason: parsed
                .reason()
                .map(String::from)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string()),
        })
    }
}
