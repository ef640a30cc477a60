use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::TaggerConfig;
use crate::error::TaggerError;
use crate::import::template::{render, render_name, RenderContext};
use crate::import::types::{CanonicalAlbum, TagMapEntry, TrackList};

/// True when tracks are written into one folder per disc
pub fn splits_into_disc_folders(album: &CanonicalAlbum, config: &TaggerConfig) -> bool {
    album.disc_total > 1 && config.split_discs_folder
}

/// True when album titles carry a per-disc suffix
pub fn splits_discs(album: &CanonicalAlbum, config: &TaggerConfig) -> bool {
    album.disc_total > 1 && (config.split_discs || config.split_discs_folder)
}

/// Folder name for one disc: the rendered disc template plus the disc number
pub fn disc_folder_name(album: &CanonicalAlbum, disc_number: u32, config: &TaggerConfig) -> String {
    let prefix = render_name(
        &config.disc_folder_format,
        &RenderContext::for_album(album, config),
    );
    format!("{}{}", prefix, disc_number)
}

/// Original extension with its leading dot, or empty
fn file_type(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Pair sorted audio files with canonical tracks by index.
///
/// This is all or nothing: if the counts differ no entry is produced, since
/// tagging a release partially is worse than not tagging it. Compilations
/// render file names with the various-artists song template.
pub fn map_tracks_to_files(
    album: &CanonicalAlbum,
    tracks: &TrackList,
    audio_files: &[PathBuf],
    source_dir: &Path,
    config: &TaggerConfig,
) -> Result<Vec<TagMapEntry>, TaggerError> {
    info!(
        "Mapping {} tracks to {} audio files",
        tracks.len(),
        audio_files.len()
    );

    if audio_files.is_empty() {
        return Err(TaggerError::NoAudioFiles(source_dir.to_path_buf()));
    }

    // Require exact 1:1 match between tracks and files
    if audio_files.len() != tracks.len() {
        return Err(TaggerError::TrackCountMismatch {
            files: audio_files.len(),
            tracks: tracks.len(),
        });
    }

    let song_format = config.song_format_for(album.is_compilation);
    let split_folders = splits_into_disc_folders(album, config);
    let split_titles = splits_discs(album, config);

    let mut entries = Vec::with_capacity(tracks.len());
    let mut destinations: HashMap<PathBuf, u32> = HashMap::new();

    for (track, path) in tracks.iter().zip(audio_files) {
        let file_type = file_type(path);
        let context = RenderContext::for_track(album, track, Some(file_type.as_str()), config);

        let disc_folder = split_folders.then(|| disc_folder_name(album, track.disc_number, config));
        let disc_title_suffix = if split_titles {
            config
                .disc_title_format
                .as_deref()
                .map(|format| render(format, &context))
        } else {
            None
        };

        let mut new_file = render_name(song_format, &context);
        if new_file.is_empty() {
            new_file = format!("{:02}{}", track.track_number, file_type);
            warn!(
                "Song template rendered nothing for track {}, using {}",
                track.position, new_file
            );
        }

        let entry = TagMapEntry {
            track: track.clone(),
            original_path: path.clone(),
            new_file,
            disc_folder,
            disc_title_suffix,
        };

        let destination = entry.relative_destination();
        if let Some(first) = destinations.insert(destination.clone(), track.position) {
            return Err(TaggerError::DuplicateDestination {
                name: destination.to_string_lossy().into_owned(),
                first,
                second: track.position,
            });
        }

        debug!(
            "Mapped {:?} -> {:?} ({} - {})",
            path, destination, track.artist, track.title
        );

        entries.push(entry);
    }

    info!("Created {} tag map entries", entries.len());

    Ok(entries)
}
