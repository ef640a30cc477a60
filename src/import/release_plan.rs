use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{ReleaseOverrides, TaggerConfig};
use crate::discogs::{DiscogsRelease, ReleaseSource};
use crate::error::TaggerError;
use crate::import::album_info::{info_body, playlist_body};
use crate::import::discogs_parser::parse_album;
use crate::import::folder_scanner::discover_files;
use crate::import::template::{render_dir, render_name, RenderContext};
use crate::import::track_resolver::resolve_tracks;
use crate::import::track_to_file_mapper::{
    disc_folder_name, map_tracks_to_files, splits_into_disc_folders,
};
use crate::import::types::{CanonicalAlbum, TagMapEntry, TrackList};

/// Every naming decision for one release, computed once.
///
/// The tag writer and file copier consume this as-is; nothing in it is
/// recomputed later in the run.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    /// Effective configuration, with per-release overrides applied
    pub config: TaggerConfig,
    pub album: CanonicalAlbum,
    pub tracks: TrackList,
    pub tag_map: Vec<TagMapEntry>,
    pub source_dir: PathBuf,
    /// Album directory all output goes into
    pub dest_dir: PathBuf,
    /// Disc number to folder name, empty unless split into disc folders
    pub disc_folders: BTreeMap<u32, String>,
    pub playlist_name: String,
    pub playlist_body: String,
    pub info_name: String,
    pub info_body: String,
    /// Non-audio files to copy along, empty unless `copy_other_files` is set
    pub other_files: Vec<PathBuf>,
    /// `tag:` entries from the release id file
    pub extra_tags: BTreeMap<String, String>,
}

impl ReleasePlan {
    /// Resolve `release` against the audio files in `source_dir`.
    ///
    /// Output goes under `destination` if given, otherwise next to the
    /// source directory.
    pub fn build(
        release: &DiscogsRelease,
        source_dir: &Path,
        destination: Option<&Path>,
        config: &TaggerConfig,
    ) -> Result<Self, TaggerError> {
        info!("Planning release {} from {:?}", release.id, source_dir);

        let album = parse_album(release, config);
        let tracks = resolve_tracks(release, &album, config)?;
        let discovered = discover_files(source_dir, &config.audio_extensions)?;
        let tag_map = map_tracks_to_files(&album, &tracks, &discovered.audio, source_dir, config)?;

        let context = RenderContext::for_album(&album, config);
        let root = match destination {
            Some(root) => root.to_path_buf(),
            None => source_dir
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        let dest_dir = root.join(render_dir(&config.dir_format, &context));

        // Keyed by the discs tracks actually land on, which can exceed the format quantity
        let disc_folders = if splits_into_disc_folders(&album, config) {
            tracks
                .discs
                .keys()
                .map(|&disc| (disc, disc_folder_name(&album, disc, config)))
                .collect()
        } else {
            BTreeMap::new()
        };

        let other_files = if config.copy_other_files {
            discovered
                .other
                .into_iter()
                .filter(|path| !is_playlist(path))
                .collect()
        } else {
            Vec::new()
        };

        let plan = Self {
            playlist_name: sidecar_name(&config.m3u_format, "m3u", &context),
            playlist_body: playlist_body(&tag_map),
            info_name: sidecar_name(&config.nfo_format, "nfo", &context),
            info_body: info_body(&album, &tracks),
            config: config.clone(),
            album,
            tracks,
            tag_map,
            source_dir: source_dir.to_path_buf(),
            dest_dir,
            disc_folders,
            other_files,
            extra_tags: BTreeMap::new(),
        };

        info!(
            "Planned {} files into {:?}",
            plan.tag_map.len(),
            plan.dest_dir
        );

        Ok(plan)
    }

    /// Fetch and plan the release whose files are in `source_dir`.
    ///
    /// The id file in the source directory can supply the release id (when
    /// `release_id` is `None`), override options for this release only and
    /// add extra tags.
    pub async fn from_source(
        source: &dyn ReleaseSource,
        release_id: Option<u64>,
        source_dir: &Path,
        destination: Option<&Path>,
        config: &TaggerConfig,
    ) -> Result<Self, TaggerError> {
        let overrides = ReleaseOverrides::load(source_dir, &config.id_file).map_err(|source| {
            TaggerError::Filesystem {
                path: source_dir.join(&config.id_file),
                source,
            }
        })?;
        let config = overrides.apply(config);

        let release_id = release_id
            .or_else(|| overrides.release_id(&config.id_tag))
            .ok_or_else(|| TaggerError::MissingReleaseId(source_dir.to_path_buf()))?;

        let release = source.fetch_release(release_id).await?;

        let mut plan = Self::build(&release, source_dir, destination, &config)?;
        plan.extra_tags = overrides.extra_tags();

        Ok(plan)
    }

    /// Whether the source files stay in place after copying
    pub fn keeps_source(&self) -> bool {
        self.config.keep_original
    }

    /// Full output path of a tag map entry
    pub fn destination_of(&self, entry: &TagMapEntry) -> PathBuf {
        self.dest_dir.join(entry.relative_destination())
    }

    /// Playlist and info files to write, as (path, contents)
    pub fn sidecar_files(&self) -> Vec<(PathBuf, &str)> {
        let mut files = Vec::new();
        if self.config.write_m3u {
            files.push((self.dest_dir.join(&self.playlist_name), self.playlist_body.as_str()));
        }
        if self.config.write_nfo {
            files.push((self.dest_dir.join(&self.info_name), self.info_body.as_str()));
        }
        files
    }
}

/// Rendered sidecar file name, or `<release id>.<extension>` if nothing survives sanitizing
fn sidecar_name(format: &str, extension: &str, context: &RenderContext) -> String {
    let name = render_name(format, context);
    if !name.is_empty() {
        return name;
    }

    let fallback = format!("{}.{}", context.album.release_id, extension);
    warn!("Template {:?} rendered nothing, using {}", format, fallback);
    fallback
}

fn is_playlist(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("m3u"))
        .unwrap_or(false)
}
