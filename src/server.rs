use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    Res, api,
    config::Config,
    session::{MemorySessionStore, SessionStore},
    spotify::SpotifyClient,
};

/// State shared by all handlers.
///
/// Cloned into every request; the config and the session store sit behind
/// `Arc`s and the Spotify client shares its connection pool between clones.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub spotify: SpotifyClient,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Creates the shared state from a loaded configuration.
    ///
    /// A [`SpotifyClient`] is built from `config.spotify`, so all handlers
    /// talk to the same accounts and Web API endpoints.
    ///
    /// # Arguments
    ///
    /// * `config` - Server, session and Spotify settings
    /// * `sessions` - Store holding the tokens of authorized users
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_env();
    /// let state = AppState::new(config, Arc::new(MemorySessionStore::new()));
    /// ```
    pub fn new(config: Config, sessions: Arc<dyn SessionStore>) -> Self {
        let spotify = SpotifyClient::new(config.spotify.clone());
        Self {
            config: Arc::new(config),
            spotify,
            sessions,
        }
    }

    /// State backed by an in-memory session store.
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(MemorySessionStore::new()))
    }
}

/// Builds the HTTP router with all routes and request tracing.
///
/// # Routes
///
/// - `GET  /` - redirect to the Spotify authorization page
/// - `GET  /callback` - authorization-code exchange, sets the session cookie
/// - `GET  /playlist` - playlist id form
/// - `POST /playlist` - merge the submitted playlists and start playback
/// - `GET  /health` - liveness and version
///
/// # Arguments
///
/// * `state` - Shared state handed to every handler
///
/// # Returns
///
/// A [`Router`] ready for [`axum::serve`] or, in tests, for
/// `tower::ServiceExt::oneshot`.
///
/// # Example
///
/// ```
/// let app = router(AppState::in_memory(Config::from_env()));
/// axum::serve(listener, app).await?;
/// ```
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::authorize))
        .route("/callback", get(api::callback))
        .route("/playlist", get(api::playlist_form).post(api::merge))
        .route("/health", get(api::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener for `address` (`host:port`).
///
/// # Errors
///
/// Returns an error when `address` is not a socket address or the port
/// cannot be bound.
pub async fn bind(address: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(address)
        .map_err(|e| format!("Failed to parse server address '{}': {}", address, e))?;
    let listener = TcpListener::bind(addr).await?;
    Ok(listener)
}

/// Serves [`router`] on `listener` until the process is stopped.
pub async fn start_api_server(listener: TcpListener, state: AppState) -> Res<()> {
    tracing::info!(address = %listener.local_addr()?, "server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
