use std::{fmt, path::Path, str::FromStr, time::Duration};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use tokio::time::sleep;

use crate::{types::Rgba, warning};

/// Audio formats the scoring backend transcribes.
pub const SUPPORTED_AUDIO_EXTENSIONS: [&str; 3] = ["m4a", "wav", "mp3"];

/// Delay between trying the app link and opening the web player.
pub const WEB_FALLBACK_DELAY: Duration = Duration::from_millis(500);

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Extracts the `access_token` entry from an implicit-grant URL fragment.
///
/// The fragment is a list of `key=value` pairs joined by `&`, optionally
/// prefixed with `#`. The key must match exactly and the value must be
/// non-empty.
pub fn access_token_from_fragment(fragment: &str) -> Option<String> {
    fragment
        .trim_start_matches('#')
        .split('&')
        .filter_map(|entry| entry.split_once('='))
        .find(|(key, _)| *key == "access_token")
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Maps a mood score to a red → yellow → green colour, breaking at 0.5.
pub fn score_to_color(score: f64) -> Rgba {
    let score = if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    };

    if score <= 0.5 {
        Rgba {
            r: 255,
            g: ((score / 0.5) * 255.0).floor() as u8,
            b: 0,
            a: 0.5,
        }
    } else {
        let yellow_to_green = (((score - 0.5) / 0.5) * 255.0).floor() as u8;
        Rgba {
            r: 255 - yellow_to_green,
            g: 255,
            b: 0,
            a: 0.5,
        }
    }
}

/// Strips the `Transcription(text='...')` wrapper the backend leaves around
/// the transcript text.
pub fn clean_transcription(raw: &str) -> &str {
    raw.strip_prefix("Transcription(text='")
        .and_then(|rest| rest.strip_suffix("')"))
        .unwrap_or(raw)
}

pub fn is_supported_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_AUDIO_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

pub fn app_link(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

pub fn web_link(web_host: &str, track_id: &str) -> String {
    format!("https://{}/track/{}", web_host, track_id)
}

/// Tries the desktop app first, then opens the web player after a short delay.
pub async fn open_track(web_host: &str, track_id: &str) {
    if let Err(e) = webbrowser::open(&app_link(track_id)) {
        warning!("Could not hand track to the Spotify app: {}", e);
    }

    sleep(WEB_FALLBACK_DELAY).await;

    let web = web_link(web_host, track_id);
    if webbrowser::open(&web).is_err() {
        warning!("Failed to open browser. Open the track manually:\n{}", web);
    }
}

/// How many of the matched tracks to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopTracks {
    Count(usize),
    All,
}

impl Default for TopTracks {
    fn default() -> Self {
        TopTracks::Count(5)
    }
}

impl TopTracks {
    pub fn limit(&self, len: usize) -> usize {
        match self {
            TopTracks::Count(n) => (*n).min(len),
            TopTracks::All => len,
        }
    }
}

impl fmt::Display for TopTracks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopTracks::Count(n) => write!(f, "top {}", n),
            TopTracks::All => write!(f, "all"),
        }
    }
}

impl FromStr for TopTracks {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(TopTracks::All);
        }

        match s.parse::<usize>() {
            Ok(0) => Err("track count must be greater than zero".to_string()),
            Ok(n) => Ok(TopTracks::Count(n)),
            Err(_) => Err(format!("expected a number or 'all', got '{}'", s)),
        }
    }
}

pub fn parse_top_tracks(s: &str) -> Result<TopTracks, String> {
    s.parse()
}

pub fn parse_score(s: &str) -> Result<f64, String> {
    let score: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(format!("score must be between 0 and 1, got {}", score));
    }
    Ok(score)
}
