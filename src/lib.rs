//! vibecli library
//!
//! Core of a command-line companion that matches a user's public Spotify
//! playlist tracks to the mood of a short voice note. It restores or captures
//! a Spotify session token, walks the user's playlists page by page, and
//! hands the flattened track list to an external scoring backend.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `backend` - Client for the scoring backend (upload, re-ranking, health)
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Session lifecycle, persisted storage and application state
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API authentication and catalog aggregation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use vibecli::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> vibecli::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for CLI-level glue code.
///
/// Library modules return their own error enums; this boxed form lets the
/// command layer mix them with `?` across async boundaries.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line prefixed with a blue `o`.
///
/// ```
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completion line prefixed with a green `✓`.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` and exits with status 1.
///
/// Only the command layer may use this; library code logs with
/// [`warning!`] and degrades instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a recoverable problem prefixed with a yellow `!`.
///
/// ```
/// warning!("Stopped after {} playlists", walked);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
