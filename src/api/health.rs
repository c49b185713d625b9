use axum::{Extension, response::Json};
use serde_json::{Value, json};

use super::SharedRedirect;

/// Liveness probe for the callback server. `redirect_pending` is true while a
/// captured redirect waits for the auth command to pick it up.
pub async fn health(Extension(shared_state): Extension<SharedRedirect>) -> Json<Value> {
    let redirect_pending = shared_state.lock().await.is_some();

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "redirect_pending": redirect_pending
    }))
}
