//! # Spotify Integration Module
//!
//! Everything vibecli needs from the Spotify Web API: getting a bearer token
//! through a browser redirect, and turning the user's playlists into one
//! flat list of tracks.
//!
//! ## Layout
//!
//! ```text
//! CLI / AppState
//!      ↓
//! catalog     : playlists → public filter → tracks → TrackRecord
//!      ↓
//! pagination  : follows `next` links one page at a time
//!      ↓
//! reqwest     : bearer-authenticated GET
//! ```
//!
//! [`auth`] sits beside this stack. It builds authorize URLs and converts a
//! captured redirect into a [`crate::types::SessionToken`], either by reading
//! the `access_token` fragment (implicit grant) or by exchanging a code with
//! a PKCE verifier.
//!
//! ## Failure policy
//!
//! Catalog reads are best effort. A page that fails to load ends the
//! aggregation and whatever was gathered from fully read playlists is
//! returned; nothing is raised past [`catalog::Catalog::aggregate_all_tracks`].
//! Pages are never fetched concurrently, so the result order is the server's
//! order.
//!
//! ## Endpoints
//!
//! - `GET /me/playlists`
//! - `GET /playlists/{id}/tracks`
//! - `POST /api/token` (PKCE only)

pub mod auth;
pub mod catalog;
pub mod pagination;
