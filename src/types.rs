use serde::{Deserialize, Serialize};

/// Tokens obtained from the authorization-code exchange, kept per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    /// Stored but never used, tokens are not refreshed.
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// A source playlist reduced to what the merge needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePlaylist {
    pub id: String,
    pub name: String,
    pub track_uris: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPlaylistResponse {
    pub name: Option<String>,
    pub tracks: Option<PlaylistTracks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracks {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    /// `null` for local or unavailable tracks.
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrack {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartPlaybackRequest {
    pub context_uri: String,
}
