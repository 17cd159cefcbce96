use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{error::AppError, server::AppState};

/// GET /
/// Redirects the browser to Spotify's authorization page with `302 Found`.
pub async fn authorize(State(state): State<AppState>) -> Result<Response, AppError> {
    let url = state
        .spotify
        .authorize_url()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
