use chrono::{DateTime, Utc};

use crate::{
    spotify::catalog::Catalog,
    types::{SessionToken, TrackRecord},
    utils::TopTracks,
};

/// Score used for ranking until a clip has been analysed.
pub const DEFAULT_INPUT_SCORE: f64 = 0.5;

/// Top-level owner of the session token, the track list and the score used
/// to rank it.
///
/// Everything else reads the tracks through [`AppState::tracks`] or
/// [`AppState::top`] and asks for changes through the methods here.
pub struct AppState {
    token: Option<SessionToken>,
    aggregated_for: Option<String>,
    tracks: Vec<TrackRecord>,
    input_score: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            token: None,
            aggregated_for: None,
            tracks: Vec::new(),
            input_score: DEFAULT_INPUT_SCORE,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&mut self, token: Option<SessionToken>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Token the catalog should be read with, if it has not been read with
    /// it already.
    pub fn pending_aggregation(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.token.as_ref().filter(|t| t.is_usable(now))?;
        match &self.aggregated_for {
            Some(done) if *done == token.access_token => None,
            _ => Some(token.access_token.as_str()),
        }
    }

    /// Reads the catalog once per distinct usable token, replacing the track
    /// list. Returns whether a read happened.
    pub async fn sync_catalog(&mut self, catalog: &Catalog, now: DateTime<Utc>) -> bool {
        let Some(token) = self.pending_aggregation(now).map(str::to_string) else {
            return false;
        };

        let tracks = catalog.aggregate_all_tracks(&token).await;
        self.replace_tracks(tracks);
        self.aggregated_for = Some(token);
        true
    }

    /// Swaps in a new list wholesale, e.g. the backend's re-ranked tracks.
    pub fn replace_tracks(&mut self, tracks: Vec<TrackRecord>) {
        self.tracks = tracks;
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn top(&self, top: TopTracks) -> &[TrackRecord] {
        &self.tracks[..top.limit(self.tracks.len())]
    }

    /// Score the next ranking request is made with.
    pub fn record_score(&mut self, score: f64) {
        self.input_score = score;
    }

    pub fn input_score(&self) -> f64 {
        self.input_score
    }
}
