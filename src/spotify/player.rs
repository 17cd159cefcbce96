use reqwest::StatusCode;

use crate::{
    spotify::{SpotifyClient, SpotifyError, unexpected_status},
    types::StartPlaybackRequest,
    utils,
};

impl SpotifyClient {
    /// Starts playback of a playlist on the user's active device.
    ///
    /// Spotify answers `204 No Content` on success. Without an active device
    /// it answers `404`, which is returned as [`SpotifyError::Status`].
    pub async fn start_playback(&self, token: &str, playlist_id: &str) -> Result<(), SpotifyError> {
        let body = StartPlaybackRequest {
            context_uri: utils::playlist_context_uri(playlist_id),
        };

        let response = self
            .http
            .put(self.api_url(&["me", "player", "play"])?)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(unexpected_status(response).await);
        }

        Ok(())
    }
}
