use std::collections::BTreeMap;
use std::path::PathBuf;

/// Album-level facts derived once from a Discogs release
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalAlbum {
    pub release_id: u64,
    pub title: String,
    /// Credited artists, cleaned and joined with the artist separator
    pub artist: String,
    /// Each resolvable credited artist, cleaned
    pub artists: Vec<String>,
    /// First credited artist only
    pub sort_artist: String,
    pub label: String,
    pub catalog_number: String,
    /// Always four digits
    pub year: String,
    /// First style or first genre, depending on `use_style`
    pub genre: String,
    pub genres: String,
    /// First style
    pub style: String,
    pub styles: String,
    pub country: String,
    pub master_id: Option<u64>,
    pub note: Option<String>,
    /// Never below 1
    pub disc_total: u32,
    pub is_compilation: bool,
}

impl CanonicalAlbum {
    pub fn url(&self) -> String {
        format!("http://www.discogs.com/release/{}", self.release_id)
    }

    pub fn master_url(&self) -> Option<String> {
        self.master_id
            .map(|id| format!("http://www.discogs.com/master/{}", id))
    }
}

/// A playable track with resolved numbering and credits
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTrack {
    /// 1-based index among real tracks (headings excluded)
    pub position: u32,
    pub disc_number: u32,
    pub track_number: u32,
    pub artist: String,
    pub sort_artist: String,
    pub title: String,
    /// Raw Discogs position, kept for diagnostics
    pub discogs_position: String,
    pub disc_subtitle: Option<String>,
}

/// Per-disc facts gathered after the full tracklist pass
#[derive(Debug, Clone, PartialEq)]
pub struct DiscSummary {
    pub disc_number: u32,
    /// Highest track number seen on this disc
    pub track_total: u32,
    pub subtitle: Option<String>,
}

/// Ordered canonical tracks plus their per-disc summary
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackList {
    pub tracks: Vec<CanonicalTrack>,
    pub discs: BTreeMap<u32, DiscSummary>,
}

impl TrackList {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalTrack> {
        self.tracks.iter()
    }

    pub fn track_total_on_disc(&self, disc_number: u32) -> Option<u32> {
        self.discs.get(&disc_number).map(|disc| disc.track_total)
    }

    pub fn disc_subtitle(&self, disc_number: u32) -> Option<&str> {
        self.discs
            .get(&disc_number)
            .and_then(|disc| disc.subtitle.as_deref())
    }
}

/// One source file paired with its canonical track and destination name
#[derive(Debug, Clone, PartialEq)]
pub struct TagMapEntry {
    pub track: CanonicalTrack,
    pub original_path: PathBuf,
    /// Rendered and sanitized file name
    pub new_file: String,
    /// Disc folder under the destination directory, for split-disc releases
    pub disc_folder: Option<String>,
    /// Suffix the tag writer appends to the album title, for split-disc releases
    pub disc_title_suffix: Option<String>,
}

impl TagMapEntry {
    /// Destination path relative to the album directory
    pub fn relative_destination(&self) -> PathBuf {
        match &self.disc_folder {
            Some(folder) => PathBuf::from(folder).join(&self.new_file),
            None => PathBuf::from(&self.new_file),
        }
    }
}
