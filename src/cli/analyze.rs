use std::path::PathBuf;

use colored::Colorize;

use crate::{
    backend::Backend,
    config, error, info,
    management::AppState,
    success,
    types::AudioAnalysis,
    utils::{self, TopTracks},
    warning,
};

use super::{load_catalog, print_tracks, require_session, spinner};

/// Scores a clip (or takes a given score), reads the catalog, and shows the
/// tracks the backend ranks closest to that score.
pub async fn analyze(file: Option<PathBuf>, score: Option<f64>, top: TopTracks) {
    let token = require_session().await;
    let backend = Backend::new(config::backend_url());

    match backend.health().await {
        Ok(true) => {}
        Ok(false) => error!("Backend at {} is up but not healthy.", backend.url()),
        Err(e) => error!(
            "Cannot connect to backend at {}. Please ensure it is running. ({})",
            backend.url(),
            e
        ),
    }

    let mut state = AppState::new();
    state.set_token(Some(token.clone()));

    match (file, score) {
        (Some(path), _) => {
            let pb = spinner("Processing...");
            let analysis = backend.upload(&path).await;
            pb.finish_and_clear();

            match analysis {
                Ok(analysis) => {
                    print_analysis(&analysis);
                    state.record_score(analysis.audio_final_score);
                }
                Err(e) => error!(
                    "Error uploading file or processing transcription. {}",
                    e
                ),
            }
        }
        (None, Some(score)) => state.record_score(score),
        (None, None) => error!("Please select an audio file with --file or pass --score."),
    }

    load_catalog(&mut state).await;
    if state.tracks().is_empty() {
        warning!("No tracks found.");
        return;
    }

    let pb = spinner(&format!(
        "Matching {} tracks to your vibe...",
        state.tracks().len()
    ));
    let ranked = backend
        .analyze_tracks(&token.access_token, state.tracks(), state.input_score())
        .await;
    pb.finish_and_clear();

    match ranked {
        Ok(ranked) => {
            state.replace_tracks(ranked);
            if state.tracks().is_empty() {
                warning!("No tracks found.");
                return;
            }
            success!("Showing {} tracks that match your vibe:", top);
        }
        Err(e) => {
            warning!("Error sending tracks to backend: {}", e);
            info!("Showing {} tracks, unranked:", top);
        }
    }

    print_tracks(state.top(top));
}

fn print_analysis(analysis: &AudioAnalysis) {
    let transcript = utils::clean_transcription(&analysis.transcription);
    if !transcript.is_empty() {
        println!("{}", transcript.italic());
    }

    let color = utils::score_to_color(analysis.audio_final_score);
    let line = format!("Score: {:.2}%", analysis.audio_final_score * 100.0);
    println!("{}", line.truecolor(color.r, color.g, color.b).bold());
}
