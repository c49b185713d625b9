use chrono::{DateTime, Utc};

use crate::{
    management::storage::KeyValueStore,
    types::{Redirect, SessionToken},
    utils, warning,
};

pub const TOKEN_KEY: &str = "spotify_token";
pub const TOKEN_EXPIRY_KEY: &str = "spotify_token_expiry";

/// The location the user landed on, as far as token capture is concerned.
pub trait RedirectLocation {
    fn fragment(&self) -> Option<&str>;
    fn clear_fragment(&mut self);
}

impl RedirectLocation for Redirect {
    fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    fn clear_fragment(&mut self) {
        self.fragment = None;
    }
}

/// A start-up with no redirect to inspect.
pub struct NoRedirect;

impl RedirectLocation for NoRedirect {
    fn fragment(&self) -> Option<&str> {
        None
    }

    fn clear_fragment(&mut self) {}
}

/// Parses an implicit-grant token out of `location`, clearing the fragment
/// when one is found so it cannot be parsed twice.
pub fn capture_from_fragment<L>(location: &mut L, now: DateTime<Utc>) -> Option<SessionToken>
where
    L: RedirectLocation + ?Sized,
{
    let access_token = location.fragment().and_then(utils::access_token_from_fragment)?;
    location.clear_fragment();
    Some(SessionToken::issued_at(access_token, now))
}

/// Owns the token lifecycle: restore from storage, capture from a redirect,
/// persist, and drop anything expired.
pub struct SessionManager<S: KeyValueStore> {
    store: S,
    active: Option<SessionToken>,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&SessionToken> {
        self.active.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs once at start-up.
    ///
    /// A persisted token that is still valid wins and the location is not
    /// inspected. Otherwise persisted values are cleared and the location's
    /// fragment is checked for a fresh `access_token`. Never fails: storage
    /// problems degrade to "not authenticated".
    pub async fn restore_or_capture<L>(
        &mut self,
        location: &mut L,
        now: DateTime<Utc>,
    ) -> Option<SessionToken>
    where
        L: RedirectLocation + ?Sized,
    {
        if let Some(token) = self.restore(now).await {
            self.active = Some(token.clone());
            return Some(token);
        }

        self.forget().await;

        match capture_from_fragment(location, now) {
            Some(token) => {
                self.adopt(token.clone()).await;
                Some(token)
            }
            None => None,
        }
    }

    /// Prefers a token carried by `location` over anything persisted.
    ///
    /// Used when the user explicitly hands over a redirect: a fresh token
    /// replaces the stored one even if that one is still valid. Without a
    /// token in the fragment this behaves like [`Self::restore_or_capture`].
    pub async fn capture_or_restore<L>(
        &mut self,
        location: &mut L,
        now: DateTime<Utc>,
    ) -> Option<SessionToken>
    where
        L: RedirectLocation + ?Sized,
    {
        match capture_from_fragment(location, now) {
            Some(token) => {
                self.adopt(token.clone()).await;
                Some(token)
            }
            None => self.restore_or_capture(location, now).await,
        }
    }

    /// Persists `token` and makes it the active one.
    ///
    /// A failed write is logged; the token stays active for this process.
    pub async fn adopt(&mut self, token: SessionToken) {
        if let Err(e) = self.store.set(TOKEN_KEY, &token.access_token).await {
            warning!("Failed to persist session token: {}", e);
        } else if let Err(e) = self
            .store
            .set(TOKEN_EXPIRY_KEY, &token.expires_at_millis().to_string())
            .await
        {
            warning!("Failed to persist session token expiry: {}", e);
        }

        self.active = Some(token);
    }

    async fn restore(&self, now: DateTime<Utc>) -> Option<SessionToken> {
        let access_token = self.read(TOKEN_KEY).await?;
        let expiry = self.read(TOKEN_EXPIRY_KEY).await?;

        let expires_at = expiry
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)?;

        let token = SessionToken::new(access_token, expires_at);
        token.is_usable(now).then_some(token)
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warning!("Cannot read {} from session storage: {}", key, e);
                None
            }
        }
    }

    async fn forget(&mut self) {
        self.active = None;
        for key in [TOKEN_KEY, TOKEN_EXPIRY_KEY] {
            if let Err(e) = self.store.remove(key).await {
                warning!("Cannot clear {} from session storage: {}", key, e);
            }
        }
    }
}
