use axum::{Form, Json, extract::State, http::HeaderMap, response::Html};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{error::AppError, merge::merge_playlists, server::AppState, session, utils};

const PLAYLIST_FORM: &str = include_str!("playlist_form.html");

#[derive(Debug, Deserialize)]
pub struct MergeForm {
    /// Comma-separated Spotify playlist ids.
    pub playlist_ids: Option<String>,
}

/// GET /playlist
pub async fn playlist_form() -> Html<&'static str> {
    Html(PLAYLIST_FORM)
}

/// POST /playlist
/// Merges the submitted playlists into a new shuffled playlist and starts
/// playback.
///
/// Requires an access token in the session; without one nothing is sent to
/// Spotify. Success is reported once the playlist has been created, whether
/// or not adding tracks and starting playback worked.
pub async fn merge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<MergeForm>,
) -> Result<Json<Value>, AppError> {
    let tokens = match session::session_id_from_headers(&headers, &state.config.session_secret) {
        Some(session_id) => state.sessions.get(&session_id).await,
        None => None,
    };
    let access_token = tokens
        .map(|tokens| tokens.access_token)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingSession)?;

    let input = form.playlist_ids.ok_or(AppError::MissingPlaylistIds)?;
    let playlist_ids = utils::parse_playlist_ids(&input);

    let mut rng = StdRng::from_os_rng();
    let outcome = merge_playlists(&state.spotify, &access_token, &playlist_ids, &mut rng).await?;

    tracing::info!(
        playlist_id = %outcome.playlist_id,
        name = %outcome.playlist.name,
        tracks = outcome.playlist.track_uris.len(),
        tracks_added = outcome.tracks_added,
        playback_started = outcome.playback_started,
        "merge finished"
    );

    Ok(Json(json!({ "message": "Playlist created successfully" })))
}
