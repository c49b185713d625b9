use std::io::Write;

use reqwest::{Client, StatusCode};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, header_regex, method, path},
};

use vibecli::backend::{Backend, BackendError};
use vibecli::types::TrackRecord;

fn track(id: &str) -> TrackRecord {
    TrackRecord {
        id: id.to_string(),
        name: format!("Song {}", id),
        artist: "Artist".to_string(),
        uri: format!("spotify:track:{}", id),
    }
}

fn backend(server: &MockServer) -> Backend {
    Backend::with_client(Client::new(), server.uri())
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .mount(&server)
        .await;

    assert!(backend(&server).health().await.unwrap());
}

#[tokio::test]
async fn test_health_reports_unhealthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "degraded" })))
        .mount(&server)
        .await;
    assert!(!backend(&server).health().await.unwrap());

    let failing = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&failing)
        .await;
    assert!(!backend(&failing).health().await.unwrap());
}

#[tokio::test]
async fn test_health_unreachable_is_an_error() {
    let backend = Backend::with_client(Client::new(), "http://127.0.0.1:9");
    let err = backend.health().await.unwrap_err();
    assert!(matches!(err, BackendError::Request(_)));
}

#[tokio::test]
async fn test_analyze_tracks_sends_tracks_and_score() {
    let server = MockServer::start().await;
    let tracks = vec![track("a"), track("b"), track("c")];

    Mock::given(method("POST"))
        .and(path("/analyze-tracks"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "tracks": [
                { "id": "a", "name": "Song a", "artist": "Artist", "uri": "spotify:track:a" },
                { "id": "b", "name": "Song b", "artist": "Artist", "uri": "spotify:track:b" },
                { "id": "c", "name": "Song c", "artist": "Artist", "uri": "spotify:track:c" }
            ],
            "input_final_score": 0.75
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": [
                { "id": "c", "name": "Song c", "artist": "Artist", "uri": "spotify:track:c" },
                { "id": "a", "name": "Song a", "artist": "Artist", "uri": "spotify:track:a" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ranked = backend(&server)
        .analyze_tracks("tok", &tracks, 0.75)
        .await
        .unwrap();

    assert_eq!(ranked, vec![track("c"), track("a")]);
}

#[tokio::test]
async fn test_analyze_tracks_without_tracks_field_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze-tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let ranked = backend(&server)
        .analyze_tracks("tok", &[track("a")], 0.5)
        .await
        .unwrap();
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn test_analyze_tracks_error_payload_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze-tracks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "no features for tracks" })),
        )
        .mount(&server)
        .await;

    let err = backend(&server)
        .analyze_tracks("tok", &[track("a")], 0.5)
        .await
        .unwrap_err();

    match err {
        BackendError::Rejected(msg) => assert_eq!(msg, "no features for tracks"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_analyze_tracks_status_error_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze-tracks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let err = backend(&server)
        .analyze_tracks("tok", &[track("a")], 0.5)
        .await
        .unwrap_err();

    match err {
        BackendError::Status { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_analyze_tracks_rejects_out_of_range_score_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tracks": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let backend = backend(&server);
    for score in [-0.01, 1.5, f64::NAN] {
        let err = backend
            .analyze_tracks("tok", &[track("a")], score)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ScoreOutOfRange(_)));
    }
}

#[tokio::test]
async fn test_upload_sends_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transcription": "Transcription(text='what a day')",
            "label": "POSITIVE",
            "score": 0.9,
            "valence": 0.7,
            "danceability": 0.6,
            "energy": 0.8,
            "audioFinalScore": 0.74
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut clip = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
    clip.write_all(b"RIFF....WAVEfmt ").unwrap();

    let analysis = backend(&server).upload(clip.path()).await.unwrap();

    assert_eq!(analysis.audio_final_score, 0.74);
    assert_eq!(analysis.label, "POSITIVE");
    assert_eq!(analysis.transcription, "Transcription(text='what a day')");
}

#[tokio::test]
async fn test_upload_rejects_unsupported_extension_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notes = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let err = backend(&server).upload(notes.path()).await.unwrap_err();

    assert!(matches!(err, BackendError::UnsupportedFile(_)));
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let err = backend(&server)
        .upload(&dir.path().join("gone.mp3"))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Io(_)));
}

#[tokio::test]
async fn test_upload_non_json_answer_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let clip = tempfile::Builder::new().suffix(".mp3").tempfile().unwrap();
    let err = backend(&server).upload(clip.path()).await.unwrap_err();

    assert!(matches!(err, BackendError::Parse(_)));
}
