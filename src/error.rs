//! HTTP-facing error type.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::{merge::MergeError, spotify::SpotifyError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to retrieve access token")]
    AuthExchange { details: Value },

    #[error("Access token not found. Please authorize your application.")]
    MissingSession,

    #[error("No playlist IDs provided")]
    MissingPlaylistIds,

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps a failed code exchange, keeping the provider's answer as details.
    pub fn auth_exchange(err: SpotifyError) -> Self {
        let details = match err {
            SpotifyError::TokenRejected(body) => body,
            other => Value::String(other.to_string()),
        };
        AppError::AuthExchange { details }
    }
}

impl IntoResponse for AppError {
    /// Merge endpoint failures are reported with `200 OK` and an `error`
    /// payload. Only the token exchange uses `400`.
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match self {
            AppError::AuthExchange { details } => {
                tracing::warn!(%details, "token exchange failed");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": message, "details": details }),
                )
            }
            AppError::MissingSession | AppError::MissingPlaylistIds => {
                (StatusCode::OK, json!({ "error": message }))
            }
            AppError::Merge(ref e) => {
                if let MergeError::PlaylistCreate(source) = e {
                    tracing::error!("Error creating playlist: {}", source);
                }
                (StatusCode::OK, json!({ "error": message }))
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
