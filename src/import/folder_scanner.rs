//! Source folder listing for a single release.
//!
//! Supports two layouts:
//! 1. Flat - audio files directly in the source folder
//! 2. Multi-disc - no audio at the top, audio one level down in disc subfolders

use crate::error::TaggerError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files of a release, split into audio and everything else
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveredFiles {
    /// Audio files in lexicographic order (subfolders in order, then files)
    pub audio: Vec<PathBuf>,
    /// Non-audio files, same ordering
    pub other: Vec<PathBuf>,
}

/// Check if a file has one of the recognized audio extensions (case-insensitive)
pub fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Check if a file is noise (.DS_Store, Thumbs.db, etc.)
fn is_noise_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name == ".DS_Store" || name == "Thumbs.db" || name == "desktop.ini")
        .unwrap_or(false)
}

/// List a directory, returning its files and subdirectories sorted by path
fn list_dir(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>), TaggerError> {
    let entries = fs::read_dir(dir).map_err(|source| TaggerError::Filesystem {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|source| TaggerError::Filesystem {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            dirs.push(path);
        } else if path.is_file() && !is_noise_file(&path) {
            files.push(path);
        }
    }

    files.sort();
    dirs.sort();

    Ok((files, dirs))
}

fn partition(files: Vec<PathBuf>, extensions: &[String], into: &mut DiscoveredFiles) {
    for file in files {
        if is_audio_file(&file, extensions) {
            into.audio.push(file);
        } else {
            into.other.push(file);
        }
    }
}

/// Discover the audio and other files of a release.
///
/// If the source folder holds no audio directly, each immediate subfolder
/// is partitioned the same way (in sorted order) and the results are
/// concatenated. Nothing deeper than one level is visited.
pub fn discover_files(
    source_dir: &Path,
    extensions: &[String],
) -> Result<DiscoveredFiles, TaggerError> {
    info!("Scanning for audio files in: {:?}", source_dir);

    let (files, subdirs) = list_dir(source_dir)?;

    let mut discovered = DiscoveredFiles::default();
    partition(files, extensions, &mut discovered);

    if discovered.audio.is_empty() {
        debug!(
            "No audio directly in {:?}, checking {} subfolder(s)",
            source_dir,
            subdirs.len()
        );

        for subdir in subdirs {
            let (files, _) = list_dir(&subdir)?;
            partition(files, extensions, &mut discovered);
        }
    }

    info!(
        "Found {} audio file(s) and {} other file(s)",
        discovered.audio.len(),
        discovered.other.len()
    );

    Ok(discovered)
}
