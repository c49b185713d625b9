use crate::{config, info, utils, warning};

/// Opens a track in the Spotify app, then in the web player.
pub async fn open(track_id: String) {
    let track_id = track_id.trim();
    if track_id.is_empty() || !track_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        warning!("'{}' does not look like a Spotify track id.", track_id);
        return;
    }

    info!("Opening track {}...", track_id);
    utils::open_track(&config::spotify_web_host(), track_id).await;
}
