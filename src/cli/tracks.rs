use crate::{management::AppState, success, utils::TopTracks, warning};

use super::{load_catalog, print_tracks, require_session};

pub async fn tracks(top: TopTracks) {
    let token = require_session().await;

    let mut state = AppState::new();
    state.set_token(Some(token));
    load_catalog(&mut state).await;

    if state.tracks().is_empty() {
        warning!("No tracks found.");
        return;
    }

    success!(
        "Collected {} tracks from your public playlists",
        state.tracks().len()
    );
    print_tracks(state.top(top));
}
