use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{
    spotify::pagination::{self, WalkError},
    types::{PlaylistItem, PlaylistRef, TrackRecord},
    warning,
};

/// Builds the client every Spotify catalog request goes through.
pub fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("vibecli/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Reads the authenticated user's playlists and flattens their tracks.
pub struct Catalog {
    client: Client,
    api_url: String,
}

impl Catalog {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(http_client(), api_url)
    }

    pub fn with_client(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Every track of every public playlist, in playlist order then page
    /// order. Duplicates across playlists are kept.
    ///
    /// The caller checks token validity. This never fails: the first
    /// failed page ends the call, and the tracks of the playlists already
    /// completed are returned. A playlist that fails part-way contributes
    /// nothing.
    pub async fn aggregate_all_tracks(&self, token: &str) -> Vec<TrackRecord> {
        let playlists = match self.public_playlists(token).await {
            Ok(playlists) => playlists,
            Err(e) => {
                warning!("Error fetching playlists: {}", e);
                return Vec::new();
            }
        };

        let mut all_tracks = Vec::new();
        for playlist in &playlists {
            match self.playlist_tracks(token, playlist).await {
                Ok(tracks) => all_tracks.extend(tracks),
                Err(e) => {
                    warning!(
                        "Error fetching tracks of playlist '{}': {}. Keeping {} tracks.",
                        playlist.name,
                        e,
                        all_tracks.len()
                    );
                    break;
                }
            }
        }

        all_tracks
    }

    /// All playlists of the account that are marked public. Null or
    /// malformed entries are skipped.
    pub async fn public_playlists(&self, token: &str) -> Result<Vec<PlaylistRef>, WalkError> {
        let url = format!("{}/me/playlists", self.api_url);
        let items = pagination::walk_pages(&self.client, &url, token).await?;

        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<PlaylistRef>(item).ok())
            .filter(PlaylistRef::is_public)
            .collect())
    }

    pub async fn playlist_tracks(
        &self,
        token: &str,
        playlist: &PlaylistRef,
    ) -> Result<Vec<TrackRecord>, WalkError> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist.id);
        let items = pagination::walk_pages(&self.client, &url, token).await?;

        Ok(items.into_iter().filter_map(project_track).collect())
    }
}

/// Reduces a raw playlist item to a [`TrackRecord`].
///
/// Items without a track (removed tracks) or whose track lacks an id, name,
/// uri or artist (local files, episodes) yield `None`.
pub fn project_track(item: Value) -> Option<TrackRecord> {
    let track = serde_json::from_value::<PlaylistItem>(item).ok()?.track?;
    let artist = track.artists.into_iter().next()?.name;

    Some(TrackRecord {
        id: track.id?,
        name: track.name?,
        artist,
        uri: track.uri?,
    })
}
