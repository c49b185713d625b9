use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr};
use tokio::task::JoinHandle;

use crate::{
    api::{self, SharedRedirect},
    warning,
};

pub fn router(state: SharedRedirect) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .route("/fragment", post(api::fragment))
        .layer(Extension(state))
}

/// Binds the callback server on `addr` and serves it on a background task.
///
/// Binding happens before returning so a taken port is reported right away
/// instead of surfacing as a redirect timeout. Returns the bound address,
/// which differs from `addr` when port 0 was requested.
pub async fn start_api_server(
    addr: &str,
    state: SharedRedirect,
) -> Result<(SocketAddr, JoinHandle<()>), String> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| format!("Failed to parse server address '{}': {}", addr, e))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Cannot bind callback server to {}: {}", addr, e))?;
    let bound = listener
        .local_addr()
        .map_err(|e| format!("Cannot read callback server address: {}", e))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(state)).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    Ok((bound, handle))
}
