use std::{collections::HashMap, sync::Arc};

use axum::{Extension, Json, extract::Query, http::StatusCode, response::Html};
use tokio::sync::Mutex;

use crate::types::{FragmentPayload, Redirect};

/// Served at the redirect URI. Browsers never send the fragment to a server,
/// so this page reads it, removes it from the address bar, and posts it back.
const RELAY_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>vibecli</title></head>
<body>
<h2 id="status">Finishing sign-in…</h2>
<script>
  const fragment = window.location.hash.substring(1);
  history.replaceState(null, "", window.location.pathname + window.location.search);
  const status = document.getElementById("status");
  if (!fragment) {
    status.textContent = "Authentication received. You can close this window.";
  } else {
    fetch("/fragment", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ fragment })
    })
      .then(r => {
        status.textContent = r.ok
          ? "Authentication successful. You can close this window."
          : "Login failed.";
      })
      .catch(() => { status.textContent = "Login failed."; });
  }
</script>
</body>
</html>"#;

pub type SharedRedirect = Arc<Mutex<Option<Redirect>>>;

/// Records code-flow redirects (`?code=` / `?error=`) and serves the relay
/// page for fragment-based ones.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<SharedRedirect>,
) -> Html<&'static str> {
    if params.contains_key("code") || params.contains_key("error") {
        let mut state = shared_state.lock().await;
        *state = Some(Redirect {
            query: params,
            fragment: None,
        });
    }

    Html(RELAY_PAGE)
}

/// Receives the fragment posted by the relay page.
pub async fn fragment(
    Extension(shared_state): Extension<SharedRedirect>,
    Json(payload): Json<FragmentPayload>,
) -> StatusCode {
    let fragment = payload.fragment.trim_start_matches('#').trim();
    if fragment.is_empty() {
        return StatusCode::BAD_REQUEST;
    }

    let mut state = shared_state.lock().await;
    *state = Some(Redirect {
        query: HashMap::new(),
        fragment: Some(fragment.to_string()),
    });
    StatusCode::NO_CONTENT
}
