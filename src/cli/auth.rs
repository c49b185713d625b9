use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    api::SharedRedirect,
    config, error, info,
    management::{FileStore, NoRedirect, SessionManager},
    server::start_api_server,
    spotify::auth::{REDIRECT_TIMEOUT, provider_from_env, wait_for_redirect},
    success,
    types::Redirect,
    utils, warning,
};

use super::format_expiry;

/// Signs in to Spotify.
///
/// With `redirect_url` the token is taken from the pasted URL's fragment,
/// replacing any stored one, and no browser or server is involved. Otherwise
/// a still-valid stored token is reused, and only if there is none the
/// configured flow runs through the browser and the local callback server.
pub async fn auth(redirect_url: Option<String>) {
    let mut session = SessionManager::new(FileStore::default());

    if let Some(url) = redirect_url {
        let mut redirect = match Redirect::from_url(&url) {
            Ok(redirect) => redirect,
            Err(e) => error!("Cannot read redirect URL: {}", e),
        };

        let carries_token = redirect
            .fragment
            .as_deref()
            .and_then(utils::access_token_from_fragment)
            .is_some();

        match session.capture_or_restore(&mut redirect, Utc::now()).await {
            Some(token) if carries_token => success!(
                "Authentication successful! Token valid until {}",
                format_expiry(&token)
            ),
            Some(token) => warning!(
                "The URL carries no access_token. Already signed in, token valid until {}",
                format_expiry(&token)
            ),
            None => error!("The URL carries no access_token. Copy the full address after signing in."),
        }
        return;
    }

    if let Some(token) = session.restore_or_capture(&mut NoRedirect, Utc::now()).await {
        success!("Already signed in. Token valid until {}", format_expiry(&token));
        return;
    }

    let provider = match provider_from_env() {
        Ok(provider) => provider,
        Err(e) => error!("Cannot start authentication: {}", e),
    };
    let auth_url = match provider.authorize_url() {
        Ok(url) => url,
        Err(e) => error!("Cannot build authorization URL: {}", e),
    };

    let shared_state: SharedRedirect = Arc::new(Mutex::new(None));
    let server = match start_api_server(&config::server_addr(), Arc::clone(&shared_state)).await {
        Ok((_, handle)) => handle,
        Err(e) => error!("{}", e),
    };

    info!("Signing in with {}...", provider.name());
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let redirect = wait_for_redirect(shared_state, REDIRECT_TIMEOUT).await;
    server.abort();

    let mut redirect = match redirect {
        Ok(redirect) => redirect,
        Err(e) => error!("Authentication failed: {}", e),
    };

    match provider.complete(&mut redirect, Utc::now()).await {
        Ok(token) => {
            session.adopt(token.clone()).await;
            success!(
                "Authentication successful! Token valid until {}",
                format_expiry(&token)
            );
        }
        Err(e) => error!("Authentication failed: {}", e),
    }
}
