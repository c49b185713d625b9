use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, StatusCode, Url};
use tokio::sync::Mutex;

use crate::{
    config,
    management::session::capture_from_fragment,
    spotify::catalog::http_client,
    types::{Redirect, SessionToken, TOKEN_VALIDITY_SECS, TokenResponse},
    utils,
};

/// How long the auth command waits for the browser to come back.
pub const REDIRECT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub enum AuthError {
    Config(String),
    InvalidUrl(String),
    Denied(String),
    MissingToken,
    MissingCode,
    Exchange(reqwest::Error),
    ExchangeStatus(StatusCode),
    Timeout,
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Exchange(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Config(msg) => write!(f, "auth configuration: {}", msg),
            AuthError::InvalidUrl(msg) => write!(f, "invalid url: {}", msg),
            AuthError::Denied(reason) => write!(f, "authorization denied: {}", reason),
            AuthError::MissingToken => write!(f, "redirect carried no access_token"),
            AuthError::MissingCode => write!(f, "redirect carried no authorization code"),
            AuthError::Exchange(e) => write!(f, "token exchange failed: {}", e),
            AuthError::ExchangeStatus(status) => {
                write!(f, "token endpoint answered {}", status)
            }
            AuthError::Timeout => write!(f, "timed out waiting for the browser redirect"),
        }
    }
}

impl std::error::Error for AuthError {}

impl Redirect {
    /// Splits a full redirect URL, as pasted from the browser's address bar.
    pub fn from_url(url: &str) -> Result<Self, AuthError> {
        let parsed = Url::parse(url.trim()).map_err(|e| AuthError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            query: parsed.query_pairs().into_owned().collect(),
            fragment: parsed
                .fragment()
                .filter(|f| !f.is_empty())
                .map(str::to_string),
        })
    }

    fn error(&self) -> Option<String> {
        if let Some(error) = self.query.get("error") {
            return Some(error.clone());
        }

        self.fragment.as_deref().and_then(|fragment| {
            fragment
                .trim_start_matches('#')
                .split('&')
                .filter_map(|entry| entry.split_once('='))
                .find(|(key, _)| *key == "error")
                .map(|(_, value)| value.to_string())
        })
    }
}

/// Client registration shared by every flow.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub client_id: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: String,
}

impl AuthSettings {
    pub fn from_env() -> Result<Self, AuthError> {
        Ok(Self {
            client_id: config::spotify_client_id().map_err(AuthError::Config)?,
            redirect_uri: config::spotify_redirect_uri(),
            auth_url: config::spotify_apiauth_url(),
            token_url: config::spotify_apitoken_url(),
            scope: config::spotify_scope(),
        })
    }

    fn authorize_url(&self, extra: &[(&str, &str)]) -> Result<Url, AuthError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        if !self.scope.trim().is_empty() {
            params.push(("scope", self.scope.trim()));
        }
        params.extend_from_slice(extra);

        Url::parse_with_params(&self.auth_url, &params)
            .map_err(|e| AuthError::InvalidUrl(e.to_string()))
    }
}

/// A way of obtaining a bearer token through a browser redirect.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn authorize_url(&self) -> Result<Url, AuthError>;

    /// Turns the captured redirect into a token. Consumes the fragment when
    /// the token travelled in it.
    async fn complete(
        &self,
        redirect: &mut Redirect,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AuthError>;
}

/// Token returned directly in the redirect fragment; no secret exchange.
pub struct ImplicitGrant {
    settings: AuthSettings,
}

impl ImplicitGrant {
    pub fn new(settings: AuthSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl AuthProvider for ImplicitGrant {
    fn name(&self) -> &'static str {
        "implicit grant"
    }

    fn authorize_url(&self) -> Result<Url, AuthError> {
        self.settings.authorize_url(&[("response_type", "token")])
    }

    async fn complete(
        &self,
        redirect: &mut Redirect,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AuthError> {
        if let Some(error) = redirect.error() {
            return Err(AuthError::Denied(error));
        }

        capture_from_fragment(redirect, now).ok_or(AuthError::MissingToken)
    }
}

/// Authorization code flow with a proof key instead of a client secret.
pub struct PkceGrant {
    settings: AuthSettings,
    code_verifier: String,
    client: Client,
}

impl PkceGrant {
    pub fn new(settings: AuthSettings) -> Self {
        Self::with_verifier(settings, utils::generate_code_verifier())
    }

    pub fn with_verifier(settings: AuthSettings, code_verifier: String) -> Self {
        Self {
            settings,
            code_verifier,
            client: http_client(),
        }
    }

    pub fn code_verifier(&self) -> &str {
        &self.code_verifier
    }
}

#[async_trait]
impl AuthProvider for PkceGrant {
    fn name(&self) -> &'static str {
        "authorization code with PKCE"
    }

    fn authorize_url(&self) -> Result<Url, AuthError> {
        let challenge = utils::generate_code_challenge(&self.code_verifier);
        self.settings.authorize_url(&[
            ("response_type", "code"),
            ("code_challenge_method", "S256"),
            ("code_challenge", challenge.as_str()),
        ])
    }

    async fn complete(
        &self,
        redirect: &mut Redirect,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, AuthError> {
        if let Some(error) = redirect.error() {
            return Err(AuthError::Denied(error));
        }
        let code = redirect.query.get("code").ok_or(AuthError::MissingCode)?;

        let response = self
            .client
            .post(&self.settings.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.settings.client_id.as_str()),
                ("code", code.as_str()),
                ("code_verifier", self.code_verifier.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::ExchangeStatus(status));
        }

        let token = response.json::<TokenResponse>().await?;
        Ok(SessionToken::new(
            token.access_token,
            expiry_after(now, token.expires_in),
        ))
    }
}

/// `now + expires_in`. A missing value, or one that does not fit a
/// `DateTime`, falls back to the implicit-grant window.
fn expiry_after(now: DateTime<Utc>, expires_in: Option<i64>) -> DateTime<Utc> {
    let fallback = now + TimeDelta::seconds(TOKEN_VALIDITY_SECS);

    expires_in
        .and_then(TimeDelta::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(fallback)
}

/// Picks the provider named by `SPOTIFY_AUTH_FLOW`.
pub fn provider_from_env() -> Result<Box<dyn AuthProvider>, AuthError> {
    let settings = AuthSettings::from_env()?;
    match config::spotify_auth_flow().as_str() {
        "implicit" | "token" => Ok(Box::new(ImplicitGrant::new(settings))),
        "pkce" | "code" => Ok(Box::new(PkceGrant::new(settings))),
        other => Err(AuthError::Config(format!(
            "unknown SPOTIFY_AUTH_FLOW '{}', expected implicit or pkce",
            other
        ))),
    }
}

/// Polls the callback server's shared slot until a redirect lands.
pub async fn wait_for_redirect(
    shared_state: Arc<Mutex<Option<Redirect>>>,
    max_wait: Duration,
) -> Result<Redirect, AuthError> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        if let Some(redirect) = shared_state.lock().await.take() {
            return Ok(redirect);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(AuthError::Timeout)
}
