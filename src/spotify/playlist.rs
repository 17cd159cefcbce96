use reqwest::StatusCode;

use crate::{
    spotify::{SpotifyClient, SpotifyError, unexpected_status},
    types::{
        AddTrackToPlaylistRequest, CreatePlaylistRequest, CreatePlaylistResponse,
        GetPlaylistResponse, SourcePlaylist,
    },
};

impl SpotifyClient {
    /// Fetches a playlist's name and track URIs.
    ///
    /// Only the first page of tracks the API returns is read. Items without a
    /// track (local files, unavailable tracks) are skipped.
    ///
    /// # Errors
    ///
    /// - [`SpotifyError::MissingField`] when the body has no non-empty `name`
    ///   (this is also how error bodies for unknown ids surface) or no `tracks`
    /// - [`SpotifyError::Http`] on transport or decoding failures
    /// - [`SpotifyError::InvalidUrl`] when the configured API base is unusable
    pub async fn get_playlist(
        &self,
        token: &str,
        playlist_id: &str,
    ) -> Result<SourcePlaylist, SpotifyError> {
        let url = self.api_url(&["playlists", playlist_id])?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let status = response.status();
        let playlist = response.json::<GetPlaylistResponse>().await?;

        let name = playlist
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                tracing::debug!(%status, playlist_id, "playlist response has no name");
                SpotifyError::MissingField("name")
            })?;
        let tracks = playlist.tracks.ok_or(SpotifyError::MissingField("tracks"))?;

        let track_uris = tracks
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .map(|track| track.uri)
            .collect();

        Ok(SourcePlaylist {
            id: playlist_id.to_string(),
            name,
            track_uris,
        })
    }

    /// Creates a private playlist for the current user and returns its id.
    ///
    /// Anything but `201 Created` is an error.
    pub async fn create_playlist(
        &self,
        token: &str,
        name: &str,
        description: &str,
    ) -> Result<String, SpotifyError> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
        };

        let response = self
            .http
            .post(self.api_url(&["me", "playlists"])?)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(unexpected_status(response).await);
        }

        response
            .json::<CreatePlaylistResponse>()
            .await?
            .id
            .ok_or(SpotifyError::MissingField("id"))
    }

    /// Adds all `uris` to a playlist in a single request.
    ///
    /// Spotify accepts at most 100 URIs per request; longer lists are sent as
    /// is and rejected by the API.
    pub async fn add_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), SpotifyError> {
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .http
            .post(self.api_url(&["playlists", playlist_id, "tracks"])?)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(unexpected_status(response).await);
        }

        Ok(())
    }
}
