//! Playlist merge workflow.
//!
//! Per request the workflow moves through
//! `Fetching(1..n) → Shuffling → Creating → Populating → Playing → Done`.
//! Only `Fetching` and `Creating` can fail the request. Populating and
//! playback are best-effort: their failures are logged and the merge still
//! reports success.

use std::fmt;

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;

use crate::{
    spotify::{SpotifyClient, SpotifyError},
    types::SourcePlaylist,
};

pub const MERGED_PLAYLIST_DESCRIPTION: &str =
    "A playlist created by shuffling tracks from other playlists.";

pub const NAME_SEPARATOR: &str = " x ";

/// Progress of a single merge, logged at `debug` level on every transition.
///
/// Stages are entered strictly in order. A failed fetch or create ends the
/// merge in that stage; every other stage always advances.
///
/// # Example
///
/// ```
/// let stage = MergeStage::Fetching { index: 2, total: 3 };
/// assert_eq!(stage.to_string(), "fetching 2/3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    /// Reading source playlist `index` (1-based) of `total`.
    Fetching { index: usize, total: usize },
    Shuffling,
    Creating,
    Populating,
    Playing,
    Done,
}

impl fmt::Display for MergeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStage::Fetching { index, total } => write!(f, "fetching {}/{}", index, total),
            MergeStage::Shuffling => f.write_str("shuffling"),
            MergeStage::Creating => f.write_str("creating"),
            MergeStage::Populating => f.write_str("populating"),
            MergeStage::Playing => f.write_str("playing"),
            MergeStage::Done => f.write_str("done"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Error retrieving playlist with ID {id}")]
    PlaylistFetch {
        id: String,
        #[source]
        source: SpotifyError,
    },

    #[error("Error creating playlist")]
    PlaylistCreate(#[source] SpotifyError),
}

/// The playlist about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPlaylist {
    pub name: String,
    pub description: String,
    pub track_uris: Vec<String>,
}

impl MergedPlaylist {
    /// Concatenates the tracks of all sources in order and shuffles them.
    ///
    /// The name joins the source names with [`NAME_SEPARATOR`]. Duplicate
    /// tracks are kept.
    pub fn assemble<R: Rng + ?Sized>(sources: Vec<SourcePlaylist>, rng: &mut R) -> Self {
        let name = sources
            .iter()
            .map(|source| source.name.as_str())
            .collect::<Vec<_>>()
            .join(NAME_SEPARATOR);

        let mut track_uris: Vec<String> = sources
            .into_iter()
            .flat_map(|source| source.track_uris)
            .collect();
        track_uris.shuffle(rng);

        Self {
            name,
            description: MERGED_PLAYLIST_DESCRIPTION.to_string(),
            track_uris,
        }
    }
}

/// What a successful merge produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub playlist_id: String,
    pub playlist: MergedPlaylist,
    pub tracks_added: bool,
    pub playback_started: bool,
}

fn enter(stage: MergeStage) {
    tracing::debug!(%stage, "merge stage");
}

/// Merges the given playlists into a new shuffled playlist and plays it.
///
/// Source playlists are fetched one after another. The first one that cannot
/// be read aborts the merge before anything is created.
///
/// # Arguments
///
/// * `client` - Spotify client used for every request
/// * `access_token` - The user's bearer token
/// * `playlist_ids` - Source playlist ids, in the order their names are joined
/// * `rng` - Randomness for the shuffle; seed it to get a fixed order
///
/// # Returns
///
/// A [`MergeOutcome`] with the new playlist's id and contents, and whether
/// adding tracks and starting playback succeeded.
///
/// # Errors
///
/// - [`MergeError::PlaylistFetch`] naming the first id that could not be read
/// - [`MergeError::PlaylistCreate`] when the new playlist was not created
///
/// # Example
///
/// ```
/// let ids = utils::parse_playlist_ids("37i9dQZF1DX4WYpdgoIcn6, 37i9dQZF1DXcBWIGoYBM5M");
/// let mut rng = StdRng::from_os_rng();
/// let outcome = merge_playlists(&client, &token, &ids, &mut rng).await?;
/// println!("created {}", outcome.playlist_id);
/// ```
pub async fn merge_playlists<R>(
    client: &SpotifyClient,
    access_token: &str,
    playlist_ids: &[String],
    rng: &mut R,
) -> Result<MergeOutcome, MergeError>
where
    R: Rng + Send,
{
    let total = playlist_ids.len();
    let mut sources = Vec::with_capacity(total);
    for (index, id) in playlist_ids.iter().enumerate() {
        enter(MergeStage::Fetching {
            index: index + 1,
            total,
        });
        let source = client
            .get_playlist(access_token, id)
            .await
            .map_err(|source| {
                tracing::warn!(playlist_id = %id, error = %source, "failed to fetch playlist");
                MergeError::PlaylistFetch {
                    id: id.clone(),
                    source,
                }
            })?;
        sources.push(source);
    }

    enter(MergeStage::Shuffling);
    let playlist = MergedPlaylist::assemble(sources, rng);

    enter(MergeStage::Creating);
    let playlist_id = client
        .create_playlist(access_token, &playlist.name, &playlist.description)
        .await
        .map_err(MergeError::PlaylistCreate)?;
    tracing::info!(%playlist_id, name = %playlist.name, "playlist created");

    enter(MergeStage::Populating);
    let tracks_added = match client
        .add_tracks(access_token, &playlist_id, &playlist.track_uris)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(%playlist_id, error = %e, "failed to add tracks to playlist");
            false
        }
    };

    enter(MergeStage::Playing);
    let playback_started = match client.start_playback(access_token, &playlist_id).await {
        Ok(()) => {
            tracing::info!(%playlist_id, "playback started");
            true
        }
        Err(e) => {
            tracing::warn!(%playlist_id, error = %e, "error starting playback");
            false
        }
    };

    enter(MergeStage::Done);
    Ok(MergeOutcome {
        playlist_id,
        playlist,
        tracks_added,
        playback_started,
    })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn source(id: &str, name: &str, tracks: &[&str]) -> SourcePlaylist {
        SourcePlaylist {
            id: id.to_string(),
            name: name.to_string(),
            track_uris: tracks.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn sorted(mut uris: Vec<String>) -> Vec<String> {
        uris.sort();
        uris
    }

    #[test]
    fn test_assemble_joins_names() {
        let mut rng = StdRng::seed_from_u64(7);
        let merged = MergedPlaylist::assemble(
            vec![
                source("A", "Chill", &["t1", "t2"]),
                source("B", "Workout", &["t3"]),
            ],
            &mut rng,
        );

        assert_eq!(merged.name, "Chill x Workout");
        assert_eq!(merged.description, MERGED_PLAYLIST_DESCRIPTION);
        assert_eq!(sorted(merged.track_uris), vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_assemble_single_source_has_plain_name() {
        let mut rng = StdRng::seed_from_u64(7);
        let merged = MergedPlaylist::assemble(vec![source("A", "Chill", &["t1"])], &mut rng);
        assert_eq!(merged.name, "Chill");
    }

    #[test]
    fn test_assemble_keeps_duplicates() {
        let mut rng = StdRng::seed_from_u64(1);
        let merged = MergedPlaylist::assemble(
            vec![
                source("A", "Chill", &["t1", "t2"]),
                source("A", "Chill", &["t1", "t2"]),
            ],
            &mut rng,
        );

        assert_eq!(merged.name, "Chill x Chill");
        assert_eq!(sorted(merged.track_uris), vec!["t1", "t1", "t2", "t2"]);
    }

    #[test]
    fn test_assemble_is_a_permutation() {
        let a: Vec<String> = (0..30).map(|i| format!("spotify:track:a{}", i)).collect();
        let b: Vec<String> = (0..20).map(|i| format!("spotify:track:b{}", i)).collect();
        let concatenated: Vec<String> = a.iter().chain(b.iter()).cloned().collect();

        let mut rng = StdRng::seed_from_u64(42);
        let merged = MergedPlaylist::assemble(
            vec![
                SourcePlaylist {
                    id: "A".to_string(),
                    name: "A".to_string(),
                    track_uris: a,
                },
                SourcePlaylist {
                    id: "B".to_string(),
                    name: "B".to_string(),
                    track_uris: b,
                },
            ],
            &mut rng,
        );

        assert_eq!(merged.track_uris.len(), concatenated.len());
        assert_eq!(sorted(merged.track_uris), sorted(concatenated));
    }

    #[test]
    fn test_assemble_order_varies_between_runs() {
        let tracks: Vec<String> = (0..20).map(|i| format!("t{}", i)).collect();
        let runs = 50;

        let shuffled = (0..runs)
            .filter(|seed| {
                let mut rng = StdRng::seed_from_u64(*seed);
                let merged = MergedPlaylist::assemble(
                    vec![SourcePlaylist {
                        id: "A".to_string(),
                        name: "A".to_string(),
                        track_uris: tracks.clone(),
                    }],
                    &mut rng,
                );
                merged.track_uris != tracks
            })
            .count();

        // The identity permutation has probability 1/20! per run.
        assert!(shuffled >= runs as usize - 1);
    }

    #[test]
    fn test_assemble_empty_sources() {
        let mut rng = StdRng::seed_from_u64(0);
        let merged = MergedPlaylist::assemble(vec![source("A", "Empty", &[])], &mut rng);
        assert!(merged.track_uris.is_empty());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(
            MergeStage::Fetching { index: 2, total: 3 }.to_string(),
            "fetching 2/3"
        );
        assert_eq!(MergeStage::Populating.to_string(), "populating");
    }

    #[test]
    fn test_merge_error_messages() {
        let err = MergeError::PlaylistFetch {
            id: "abc".to_string(),
            source: SpotifyError::MissingField("name"),
        };
        assert_eq!(err.to_string(), "Error retrieving playlist with ID abc");

        let err = MergeError::PlaylistCreate(SpotifyError::MissingField("id"));
        assert_eq!(err.to_string(), "Error creating playlist");
    }
}
