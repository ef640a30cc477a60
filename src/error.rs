use crate::discogs::DiscogsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort tagging a release.
///
/// Malformed-but-recoverable release data never shows up here; it is
/// replaced with a default and logged where it is resolved.
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error(
        "Unable to match multi-disc track position '{position}' ('{title}') on a {disc_total}-disc release"
    )]
    UnparseablePosition {
        position: String,
        title: String,
        disc_total: u32,
    },

    #[error("Disc {disc_number} track {track_number} appears more than once in the tracklist")]
    DuplicatePosition { disc_number: u32, track_number: u32 },

    #[error("Track count mismatch: found {files} audio files but release has {tracks} tracks")]
    TrackCountMismatch { files: usize, tracks: usize },

    #[error("No audio files found in {0}")]
    NoAudioFiles(PathBuf),

    #[error("Tracks {first} and {second} would both be written to '{name}'")]
    DuplicateDestination {
        name: String,
        first: u32,
        second: u32,
    },

    #[error("Failed to read dir {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No release id given and none found in {0:?}")]
    MissingReleaseId(PathBuf),

    #[error("Discogs release unavailable: {0}")]
    Discogs(#[from] DiscogsError),
}

impl TaggerError {
    /// True when the release cannot be mapped onto the files at hand
    pub fn is_mapping_failure(&self) -> bool {
        matches!(
            self,
            TaggerError::UnparseablePosition { .. }
                | TaggerError::DuplicatePosition { .. }
                | TaggerError::TrackCountMismatch { .. }
                | TaggerError::NoAudioFiles(_)
                | TaggerError::DuplicateDestination { .. }
        )
    }
}
