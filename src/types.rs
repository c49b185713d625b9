use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

/// Seconds an implicit-grant token stays valid after capture.
pub const TOKEN_VALIDITY_SECS: i64 = 3600;

/// Bearer credential plus the absolute instant after which it is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// A token captured at `now`, valid for the fixed implicit-grant window.
    pub fn issued_at(access_token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(access_token, now + Duration::seconds(TOKEN_VALIDITY_SECS))
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && now < self.expires_at
    }

    pub fn expires_at_millis(&self) -> i64 {
        self.expires_at.timestamp_millis()
    }
}

/// A playlist entry from `/me/playlists`, reduced to what filtering needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub public: Option<bool>,
}

impl PlaylistRef {
    pub fn is_public(&self) -> bool {
        self.public == Some(true)
    }
}

/// The projected fields of a playlist track, in the shape the scoring backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub uri: String,
}

/// One page of a cursor-paginated collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Option<Vec<Value>>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<RawTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<RawArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtist {
    pub name: String,
}

/// Where the identity provider sent the browser back to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirect {
    pub query: HashMap<String, String>,
    pub fragment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentPayload {
    pub fragment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Result of sending a clip to the backend `/upload` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioAnalysis {
    #[serde(default)]
    pub transcription: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub energy: f64,
    #[serde(rename = "audioFinalScore")]
    pub audio_final_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeTracksRequest<'a> {
    pub tracks: &'a [TrackRecord],
    pub input_final_score: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeTracksResponse {
    #[serde(default)]
    pub tracks: Option<Vec<TrackRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub name: String,
    pub artist: String,
    pub id: String,
}
