//! # API Module
//!
//! Handlers of the short-lived local server that catches the OAuth redirect.
//!
//! ## Endpoints
//!
//! - [`callback`] - the registered redirect URI. Stores `code`/`error` query
//!   parameters directly; for implicit-grant redirects it serves a relay page
//!   that posts the URL fragment to [`fragment`].
//! - [`fragment`] - accepts `{"fragment": "..."}` from the relay page.
//! - [`health`] - status and version of the running binary, and whether a
//!   captured redirect is still waiting to be picked up.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::{get, post}};
//! use vibecli::api::{callback, fragment, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/fragment", post(fragment))
//!     .route("/health", get(health))
//!     .layer(Extension(state));
//! ```

mod callback;
mod health;

pub use callback::{SharedRedirect, callback, fragment};
pub use health::health;
