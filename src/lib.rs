//! mixtape library
//!
//! A small web service that authorizes a Spotify account through the OAuth2
//! authorization-code flow, merges the tracks of several playlists into one
//! new shuffled playlist and starts playback of it.
//!
//! # Modules
//!
//! - `api` - HTTP handlers (authorization redirect, callback, merge form, health)
//! - `config` - Configuration loaded from the environment and `.env` files
//! - `error` - HTTP-facing error type
//! - `merge` - The playlist merge workflow
//! - `server` - Router, shared state and listener setup
//! - `session` - Session store and signed session cookies
//! - `spotify` - Spotify Web API client
//! - `types` - Data structures exchanged with Spotify
//! - `utils` - Small helpers

pub mod api;
pub mod config;
pub mod error;
pub mod merge;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for process-level operations that may fail.
///
/// Used for startup work (configuration, binding, serving) where the only
/// thing left to do with an error is report it.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for startup failures the server cannot recover from. Request-level
/// failures are logged through `tracing` instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("CLIENT_ID is not set");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
