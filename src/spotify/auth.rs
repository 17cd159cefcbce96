use reqwest::Url;
use serde_json::Value;

use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::Tokens,
    utils,
};

/// Permissions requested during authorization.
pub const SCOPE: &str = "user-read-private user-read-email user-read-playback-state user-modify-playback-state playlist-modify-private";

/// Used when the token response carries no `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

impl SpotifyClient {
    /// Builds the URL users are redirected to for authorization.
    ///
    /// Query: `client_id`, `response_type=code`, `redirect_uri` and the fixed
    /// [`SCOPE`]. No `state` parameter is sent, so the callback cannot tell a
    /// forged redirect from a genuine one.
    pub fn authorize_url(&self) -> Result<String, SpotifyError> {
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", SCOPE),
            ],
        )
        .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", self.config.auth_url, e)))?;

        Ok(url.into())
    }

    /// Exchanges an authorization code for an access and refresh token.
    ///
    /// Sends a form-encoded `authorization_code` grant including the client
    /// secret. The exchange succeeds when the response body contains an
    /// `access_token`, regardless of status. Otherwise the provider body is
    /// returned in [`SpotifyError::TokenRejected`]; a body that is not JSON is
    /// wrapped as a JSON string.
    pub async fn exchange_code(&self, code: &str) -> Result<Tokens, SpotifyError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, body = %body, "token exchange response");

        let json: Value = serde_json::from_str(&body).unwrap_or(Value::String(body));
        tokens_from_response(json)
    }
}

fn tokens_from_response(json: Value) -> Result<Tokens, SpotifyError> {
    let Some(access_token) = json["access_token"].as_str() else {
        return Err(SpotifyError::TokenRejected(json));
    };

    Ok(Tokens {
        access_token: access_token.to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_u64().unwrap_or(DEFAULT_EXPIRES_IN),
        obtained_at: utils::unix_now(),
    })
}
