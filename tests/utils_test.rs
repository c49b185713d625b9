use std::path::Path;

use vibecli::types::Rgba;
use vibecli::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let challenge = generate_code_challenge("test_verifier_123");

    assert!(!challenge.is_empty());
    assert_eq!(challenge, generate_code_challenge("test_verifier_123"));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA-256 digest, base64url without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_code_challenge_known_vector() {
    // RFC 7636 appendix B
    assert_eq!(
        generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_access_token_from_fragment() {
    assert_eq!(
        access_token_from_fragment("#access_token=ABC123&token_type=Bearer"),
        Some("ABC123".to_string())
    );
    assert_eq!(
        access_token_from_fragment("token_type=Bearer&expires_in=3600&access_token=XYZ"),
        Some("XYZ".to_string())
    );
}

#[test]
fn test_access_token_from_fragment_rejects_near_misses() {
    assert_eq!(access_token_from_fragment(""), None);
    assert_eq!(access_token_from_fragment("#"), None);
    assert_eq!(access_token_from_fragment("#token_type=Bearer"), None);
    assert_eq!(access_token_from_fragment("#access_token="), None);
    assert_eq!(access_token_from_fragment("#access_token"), None);
    assert_eq!(access_token_from_fragment("#access_token_hint=nope"), None);
    assert_eq!(access_token_from_fragment("#error=access_denied"), None);
}

#[test]
fn test_score_to_color_breakpoints() {
    assert_eq!(
        score_to_color(0.0),
        Rgba {
            r: 255,
            g: 0,
            b: 0,
            a: 0.5
        }
    );
    assert_eq!(
        score_to_color(0.5),
        Rgba {
            r: 255,
            g: 255,
            b: 0,
            a: 0.5
        }
    );
    assert_eq!(
        score_to_color(1.0),
        Rgba {
            r: 0,
            g: 255,
            b: 0,
            a: 0.5
        }
    );
}

#[test]
fn test_score_to_color_interpolates() {
    // red → yellow below the midpoint
    let low = score_to_color(0.25);
    assert_eq!((low.r, low.g, low.b), (255, 127, 0));

    // yellow → green above it
    let high = score_to_color(0.75);
    assert_eq!((high.r, high.g, high.b), (128, 255, 0));
}

#[test]
fn test_score_to_color_clamps() {
    assert_eq!(score_to_color(-3.0), score_to_color(0.0));
    assert_eq!(score_to_color(7.0), score_to_color(1.0));
    assert_eq!(score_to_color(f64::NAN), score_to_color(0.0));
}

#[test]
fn test_clean_transcription() {
    assert_eq!(
        clean_transcription("Transcription(text='I had a great day')"),
        "I had a great day"
    );
    assert_eq!(clean_transcription("plain text"), "plain text");
    assert_eq!(clean_transcription(""), "");
}

#[test]
fn test_is_supported_audio() {
    assert!(is_supported_audio(Path::new("clip.wav")));
    assert!(is_supported_audio(Path::new("/tmp/voice.MP3")));
    assert!(is_supported_audio(Path::new("diary.m4a")));
    assert!(!is_supported_audio(Path::new("notes.txt")));
    assert!(!is_supported_audio(Path::new("noextension")));
    assert!(!is_supported_audio(Path::new("clip.flac")));
}

#[test]
fn test_links() {
    assert_eq!(app_link("4uLU6hMC"), "spotify:track:4uLU6hMC");
    assert_eq!(
        web_link("open.spotify.com", "4uLU6hMC"),
        "https://open.spotify.com/track/4uLU6hMC"
    );
    assert_eq!(WEB_FALLBACK_DELAY.as_millis(), 500);
}

#[test]
fn test_parse_top_tracks() {
    assert_eq!(parse_top_tracks("5"), Ok(TopTracks::Count(5)));
    assert_eq!(parse_top_tracks(" 20 "), Ok(TopTracks::Count(20)));
    assert_eq!(parse_top_tracks("all"), Ok(TopTracks::All));
    assert_eq!(parse_top_tracks("ALL"), Ok(TopTracks::All));
    assert!(parse_top_tracks("0").is_err());
    assert!(parse_top_tracks("-1").is_err());
    assert!(parse_top_tracks("many").is_err());
    assert_eq!(TopTracks::default(), TopTracks::Count(5));
}

#[test]
fn test_top_tracks_limit() {
    assert_eq!(TopTracks::Count(5).limit(3), 3);
    assert_eq!(TopTracks::Count(5).limit(30), 5);
    assert_eq!(TopTracks::All.limit(30), 30);
}

#[test]
fn test_parse_score() {
    assert_eq!(parse_score("0.42"), Ok(0.42));
    assert_eq!(parse_score("0"), Ok(0.0));
    assert_eq!(parse_score("1"), Ok(1.0));
    assert!(parse_score("1.01").is_err());
    assert!(parse_score("-0.1").is_err());
    assert!(parse_score("NaN").is_err());
    assert!(parse_score("happy").is_err());
}
