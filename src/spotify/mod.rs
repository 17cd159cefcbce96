//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Accounts service and Web API the
//! merge workflow needs. Every call is a single request: no retries, no
//! rate-limit handling, no pagination.
//!
//! ```text
//! Handlers (api)  →  merge workflow
//!          ↓
//!     SpotifyClient
//!     ├── auth      authorize URL, code exchange
//!     ├── playlist  read, create, add tracks
//!     └── player    start playback
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## API Coverage
//!
//! - `GET  {auth_url}` - authorization redirect target
//! - `POST {token_url}` - authorization-code exchange
//! - `GET  /playlists/{id}` - playlist name and tracks
//! - `POST /me/playlists` - create a playlist
//! - `POST /playlists/{id}/tracks` - add tracks
//! - `PUT  /me/player/play` - start playback
//!
//! Web API calls authenticate with the user's access token as a bearer token.

pub mod auth;
pub mod player;
pub mod playlist;

use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use crate::config::SpotifyConfig;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("token exchange rejected: {0}")]
    TokenRejected(Value),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Client for the Spotify Accounts service and Web API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    config: SpotifyConfig,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    pub fn with_http_client(http: Client, config: SpotifyConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    /// Builds a Web API URL by appending `segments` to the configured base.
    ///
    /// Each segment is percent-encoded on its own, so ids containing `/`, `?`
    /// or `#` stay inside their path segment.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::InvalidUrl`] when the base URL cannot be parsed or
    /// cannot carry a path.
    fn api_url(&self, segments: &[&str]) -> Result<Url, SpotifyError> {
        let base = &self.config.api_url;
        let mut url = Url::parse(base).map_err(|_| SpotifyError::InvalidUrl(base.clone()))?;
        url.path_segments_mut()
            .map_err(|_| SpotifyError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turns a response with an unexpected status into [`SpotifyError::Status`].
async fn unexpected_status(response: Response) -> SpotifyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    SpotifyError::Status { status, body }
}
