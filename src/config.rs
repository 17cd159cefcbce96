//! Configuration management for mixtape.
//!
//! Configuration is read once at startup into a [`Config`] value which is then
//! handed to the server state. Nothing reads the environment after that.
//!
//! Sources, highest priority first:
//! 1. Process environment variables
//! 2. `.env` file in the local data directory (`<data_local_dir>/mixtape/.env`)
//! 3. `.env` file in the working directory
//! 4. Defaults (where applicable)

use std::{env, fmt, path::PathBuf};

use crate::utils;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

/// Length of the session secret generated when `SESSION_SECRET` is unset.
const GENERATED_SECRET_LEN: usize = 64;

/// Loads environment variables from `.env` files.
///
/// Creates the local data directory if it doesn't exist, then loads
/// `<data_local_dir>/mixtape/.env` followed by `.env` in the working
/// directory. `dotenv` never overrides variables that are already set, so the
/// process environment always wins and the data-dir file wins over the
/// working-directory one.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or if an existing
/// `.env` file cannot be parsed. A missing file is not an error.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("mixtape/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Spotify application credentials and endpoints.
#[derive(Clone)]
pub struct SpotifyConfig {
    /// `CLIENT_ID` - client id of the registered Spotify application.
    pub client_id: String,
    /// `CLIENT_SECRET` - client secret of the registered Spotify application.
    pub client_secret: String,
    /// `REDIRECT_URI` - must match the redirect URI registered with Spotify.
    pub redirect_uri: String,
    /// `SPOTIFY_API_AUTH_URL` - authorization endpoint users are sent to.
    pub auth_url: String,
    /// `SPOTIFY_API_TOKEN_URL` - endpoint authorization codes are exchanged at.
    pub token_url: String,
    /// `SPOTIFY_API_URL` - base URL of the Web API.
    pub api_url: String,
}

impl SpotifyConfig {
    /// Reads the Spotify settings from the environment.
    ///
    /// Credentials default to empty strings. Requests built from empty
    /// credentials are rejected by Spotify, see [`SpotifyConfig::missing_credentials`].
    pub fn from_env() -> Self {
        Self {
            client_id: var_or("CLIENT_ID", ""),
            client_secret: var_or("CLIENT_SECRET", ""),
            redirect_uri: var_or("REDIRECT_URI", ""),
            auth_url: var_or("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            token_url: var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            api_url: var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
        }
    }

    /// Names of the credential variables that are empty.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("CLIENT_ID", &self.client_id),
            ("CLIENT_SECRET", &self.client_secret),
            ("REDIRECT_URI", &self.redirect_uri),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Process-wide configuration, created once at startup.
#[derive(Clone)]
pub struct Config {
    /// `SERVER_ADDRESS` - address the HTTP server binds to.
    pub server_address: String,
    /// `SESSION_SECRET` - key used to sign session cookies. A random key is
    /// generated when unset, which invalidates all sessions on restart.
    pub session_secret: String,
    pub spotify: SpotifyConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let session_secret = env::var("SESSION_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| utils::generate_random_string(GENERATED_SECRET_LEN));

        Self {
            server_address: var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            session_secret,
            spotify: SpotifyConfig::from_env(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_address", &self.server_address)
            .field("session_secret", &"<redacted>")
            .field("spotify", &self.spotify)
            .finish()
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spotify_config(client_id: &str, client_secret: &str, redirect_uri: &str) -> SpotifyConfig {
        SpotifyConfig {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            auth_url: DEFAULT_SPOTIFY_AUTH_URL.to_string(),
            token_url: DEFAULT_SPOTIFY_TOKEN_URL.to_string(),
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
        }
    }

    #[test]
    fn test_missing_credentials_lists_empty_values() {
        let config = spotify_config("id", "", "");
        assert_eq!(
            config.missing_credentials(),
            vec!["CLIENT_SECRET", "REDIRECT_URI"]
        );

        let config = spotify_config("id", "secret", "http://127.0.0.1:5000/callback");
        assert!(config.missing_credentials().is_empty());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            session_secret: "session-key".to_string(),
            spotify: spotify_config("id", "client-secret", "http://localhost/callback"),
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("session-key"));
        assert!(!debug.contains("client-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
