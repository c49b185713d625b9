//! # CLI Module
//!
//! User-facing commands. Each one restores the Spotify session first and
//! delegates the actual work to [`crate::spotify`], [`crate::backend`] and
//! [`crate::management`]; this layer only handles progress output, tables
//! and turning failures into messages.
//!
//! ## Commands
//!
//! - [`auth`] - sign in through the browser, or capture a pasted redirect URL
//! - [`tracks`] - list the tracks of all public playlists
//! - [`analyze`] - score a voice note and show the best matching tracks
//! - [`open`] - open a track in the Spotify app, falling back to the web player
//! - [`health`] - check that the scoring backend is reachable
//!
//! ## Typical session
//!
//! ```bash
//! vibecli auth
//! vibecli analyze --file diary.m4a --top 10
//! vibecli open 4uLU6hMCjMI75M1A2tKUQC
//! ```

mod analyze;
mod auth;
mod health;
mod open;
mod tracks;

use std::time::Duration;

use chrono::{Local, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error,
    management::{AppState, FileStore, NoRedirect, SessionManager},
    spotify::catalog::Catalog,
    types::{SessionToken, TrackRecord, TrackTableRow},
};

pub use analyze::analyze;
pub use auth::auth;
pub use health::health;
pub use open::open;
pub use tracks::tracks;

/// Restores the persisted session or exits with a hint to sign in.
async fn require_session() -> SessionToken {
    let mut session = SessionManager::new(FileStore::default());
    match session.restore_or_capture(&mut NoRedirect, Utc::now()).await {
        Some(token) => token,
        None => error!("Not signed in to Spotify. Run `vibecli auth` first."),
    }
}

/// Reads every public playlist into `state` behind a spinner.
async fn load_catalog(state: &mut AppState) {
    let catalog = Catalog::new(crate::config::spotify_apiurl());
    let pb = spinner("Fetching tracks from your public playlists...");
    state.sync_catalog(&catalog, Utc::now()).await;
    pb.finish_and_clear();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

fn print_tracks(tracks: &[TrackRecord]) {
    let rows: Vec<TrackTableRow> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            rank: i + 1,
            name: t.name.clone(),
            artist: t.artist.clone(),
            id: t.id.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}

fn format_expiry(token: &SessionToken) -> String {
    token
        .expires_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
