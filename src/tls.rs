//! TLS configuration with an operator-pinned CA root certificate.
//!
//! Backends reached over `wss://` or `https://` are usually fronted by a
//! private CA. When `TRADEWATCH_CA_CERT` points at a PEM bundle, both the
//! push channel and the control endpoint trust only those roots; otherwise
//! the default web PKI roots apply.

use std::path::Path;
use std::sync::Arc;

use rustls::ClientConfig;

use crate::Result;

/// Builds a [`ClientConfig`] whose root store contains only the
/// certificates in the PEM file at `path`.
///
/// # Errors
///
/// Returns [`TradewatchError::Tls`](crate::TradewatchError::Tls) if the file
/// cannot be read, holds no parsable certificate, or is not valid PEM.
pub fn build_tls_config(path: &Path) -> Result<ClientConfig> {
    let pem = std::fs::read(path).map_err(|e| {
        crate::TradewatchError::Tls(format!("failed to read {}: {e}", path.display()))
    })?;

    let certs: Vec<_> = rustls_pemfile::certs(&mut &pem[..])
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| crate::TradewatchError::Tls(format!("failed to parse CA PEM: {e}")))?;

    let mut root_store = rustls::RootCertStore::empty();
    let (added, _ignored) = root_store.add_parsable_certificates(certs);
    if added == 0 {
        return Err(crate::TradewatchError::Tls(format!(
            "no usable certificate in {}",
            path.display()
        )));
    }

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(config)
}

/// Loads the pinned CA if one is configured.
///
/// # Errors
///
/// Propagates [`build_tls_config`] failures.
pub fn optional_tls_config(path: Option<&Path>) -> Result<Option<Arc<ClientConfig>>> {
    path.map(|p| build_tls_config(p).map(Arc::new)).transpose()
}
