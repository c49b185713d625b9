//! Configuration management for vibecli.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the platform data directory. Every setting except the Spotify
//! client ID has a default, so a bare install can restore a session and
//! talk to a backend on `localhost:5001` without any configuration.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults

use std::{env, path::PathBuf};

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:3000/callback";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_WEB_HOST: &str = "open.spotify.com";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5001";

/// Loads `vibecli/.env` from the local data directory into the environment.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error; a present but unreadable one is.
///
/// Locations:
/// - Linux: `~/.local/share/vibecli/.env`
/// - macOS: `~/Library/Application Support/vibecli/.env`
/// - Windows: `%LOCALAPPDATA%/vibecli/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))
}

/// Root of everything vibecli keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("vibecli");
    path
}

/// Where the session token and its expiry are persisted.
pub fn session_path() -> PathBuf {
    data_dir().join("cache/session.json")
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:3000`.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Client ID of the registered Spotify application.
///
/// The only setting without a default; the authorize URL is meaningless
/// without it.
pub fn spotify_client_id() -> Result<String, String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| "SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string())
}

pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Requested scopes. Empty means public playlists only.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").unwrap_or_default()
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Host of the web player used when the desktop app does not pick up a link.
pub fn spotify_web_host() -> String {
    var_or("SPOTIFY_WEB_HOST", DEFAULT_WEB_HOST)
}

/// `implicit` (default) or `pkce`.
pub fn spotify_auth_flow() -> String {
    var_or("SPOTIFY_AUTH_FLOW", "implicit").to_lowercase()
}

/// Base URL of the scoring backend.
pub fn backend_url() -> String {
    var_or("VIBE_BACKEND_URL", DEFAULT_BACKEND_URL)
        .trim_end_matches('/')
        .to_string()
}
