//! # API Module
//!
//! HTTP handlers of the mixtape web server.
//!
//! ## Endpoints
//!
//! - [`authorize`] - `GET /` redirects to Spotify's authorization page
//! - [`callback`] - `GET /callback` exchanges the authorization code for tokens
//!   and stores them in the session
//! - [`playlist_form`] - `GET /playlist` serves the form for entering playlist ids
//! - [`merge`] - `POST /playlist` runs the merge workflow
//! - [`health`] - `GET /health` returns status and version
//!
//! Handlers take the shared [`crate::server::AppState`] and report failures
//! through [`crate::error::AppError`].

mod authorize;
mod callback;
mod health;
mod playlist;

pub use authorize::authorize;
pub use callback::{CallbackParams, callback};
pub use health::{HealthResponse, health};
pub use playlist::{MergeForm, merge, playlist_form};
