use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, server::AppState, session};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    /// Set by Spotify when the user denied access.
    pub error: Option<String>,
}

/// GET /callback
/// Exchanges the authorization code for tokens, stores them in the session
/// and redirects to `/playlist`.
///
/// Every successful exchange starts a new session; a session cookie sent
/// with the request is ignored. Failures answer `400` with the provider's
/// response as `details`.
///
/// # Errors
///
/// [`AppError::AuthExchange`] when Spotify reports an error in the callback
/// query, the `code` is missing, or the token endpoint returns no access token.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    if let Some(error) = params.error {
        return Err(AppError::AuthExchange {
            details: json!({ "error": error }),
        });
    }

    let Some(code) = params.code else {
        return Err(AppError::AuthExchange {
            details: json!({ "error": "missing authorization code" }),
        });
    };

    let tokens = state
        .spotify
        .exchange_code(&code)
        .await
        .map_err(AppError::auth_exchange)?;

    // Never reuse the id of an incoming cookie.
    let session_id = session::new_session_id();
    state.sessions.put(&session_id, tokens).await;
    tracing::info!("authorization completed");

    let cookie = session::session_cookie(
        &state.config.session_secret,
        &session_id,
        session::secure_cookies(&state.config.spotify.redirect_uri),
    );

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/playlist".to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response())
}
