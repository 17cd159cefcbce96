use rand::{Rng, distr::Alphanumeric};

/// Returns a random alphanumeric string of `len` characters.
pub fn generate_random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Splits a comma-separated list of playlist ids, trimming each entry.
///
/// Order is kept. Empty entries and duplicates are passed through unchanged.
pub fn parse_playlist_ids(input: &str) -> Vec<String> {
    input.split(',').map(|id| id.trim().to_string()).collect()
}

/// Spotify context URI for a playlist.
pub fn playlist_context_uri(playlist_id: &str) -> String {
    format!("spotify:playlist:{}", playlist_id)
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
