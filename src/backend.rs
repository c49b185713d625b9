//! Client for the scoring backend.
//!
//! The backend transcribes an uploaded clip, turns it into a mood score in
//! `[0, 1]`, and re-ranks a list of tracks against that score. vibecli only
//! forwards data and shows what comes back.

use std::{fmt, path::Path, time::Duration};

use reqwest::{Client, StatusCode, multipart};
use serde_json::Value;

use crate::{
    types::{AnalyzeTracksRequest, AnalyzeTracksResponse, AudioAnalysis, HealthResponse, TrackRecord},
    utils,
};

#[derive(Debug)]
pub enum BackendError {
    Request(reqwest::Error),
    Status { status: StatusCode, message: String },
    Rejected(String),
    Parse(String),
    UnsupportedFile(String),
    ScoreOutOfRange(f64),
    Io(std::io::Error),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Request(err)
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err)
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Request(e) if e.is_connect() => write!(
                f,
                "no response from the backend, check that it is running: {}",
                e
            ),
            BackendError::Request(e) => write!(f, "backend request failed: {}", e),
            BackendError::Status { status, message } => {
                write!(f, "backend answered {}: {}", status, message)
            }
            BackendError::Rejected(msg) => write!(f, "{}", msg),
            BackendError::Parse(msg) => write!(f, "unexpected backend response: {}", msg),
            BackendError::UnsupportedFile(name) => write!(
                f,
                "'{}' is not a supported audio file ({})",
                name,
                utils::SUPPORTED_AUDIO_EXTENSIONS.join(", ")
            ),
            BackendError::ScoreOutOfRange(score) => {
                write!(f, "score {} is outside [0, 1]", score)
            }
            BackendError::Io(e) => write!(f, "cannot read audio file: {}", e),
        }
    }
}

impl std::error::Error for BackendError {}

pub struct Backend {
    client: Client,
    url: String,
}

impl Backend {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(client, url)
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `true` when the backend reports `"status": "healthy"`.
    pub async fn health(&self) -> Result<bool, BackendError> {
        let response = self
            .client
            .get(format!("{}/health", self.url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(false);
        }

        let health = response
            .json::<HealthResponse>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(health.status == "healthy")
    }

    /// Sends a clip for transcription and scoring.
    pub async fn upload(&self, path: &Path) -> Result<AudioAnalysis, BackendError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if !utils::is_supported_audio(path) {
            return Err(BackendError::UnsupportedFile(file_name));
        }

        let bytes = async_fs::read(path).await?;
        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(format!("{}/upload", self.url))
            .multipart(form)
            .send()
            .await?;

        let body = read_json(response).await?;
        serde_json::from_value(body).map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Asks the backend to re-rank `tracks` against `score`.
    pub async fn analyze_tracks(
        &self,
        token: &str,
        tracks: &[TrackRecord],
        score: f64,
    ) -> Result<Vec<TrackRecord>, BackendError> {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(BackendError::ScoreOutOfRange(score));
        }

        let response = self
            .client
            .post(format!("{}/analyze-tracks", self.url))
            .bearer_auth(token)
            .json(&AnalyzeTracksRequest {
                tracks,
                input_final_score: score,
            })
            .send()
            .await?;

        let body = read_json(response).await?;
        let parsed: AnalyzeTracksResponse =
            serde_json::from_value(body).map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(parsed.tracks.unwrap_or_default())
    }
}

/// Decodes a JSON body, turning non-2xx answers and `{"error": ...}`
/// payloads into errors.
async fn read_json(response: reqwest::Response) -> Result<Value, BackendError> {
    let status = response.status();
    let text = response.text().await?;
    let body: Option<Value> = serde_json::from_str(&text).ok();

    let error = body
        .as_ref()
        .and_then(|b| b.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if !status.is_success() {
        return Err(BackendError::Status {
            status,
            message: error.unwrap_or(text),
        });
    }
    if let Some(error) = error {
        return Err(BackendError::Rejected(error));
    }

    body.ok_or_else(|| BackendError::Parse("body is not JSON".to_string()))
}
