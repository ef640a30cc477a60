// # Import Module
//
// Turns a Discogs release and a folder of audio files into a naming plan:
//
// - **discogs_parser**: Canonical album facts and artist name cleanup
// - **track_resolver**: Canonical track order and disc/track numbering
// - **folder_scanner**: Sorted audio and other files of a source folder
// - **track_to_file_mapper**: All-or-nothing pairing of files with tracks
// - **template** / **filename**: `%TOKEN%` rendering and name sanitizing
// - **release_plan**: Everything above, computed once per release
//
// Public API:
// - `ReleasePlan`: Build the plan from a release or a `ReleaseSource`
// - `sanitize_filename`, `render`: Reusable naming helpers

mod album_info;
mod discogs_parser;
mod filename;
mod folder_scanner;
mod position_parser;
mod release_plan;
mod template;
mod track_resolver;
mod track_to_file_mapper;
mod types;

// Public API exports
pub use album_info::{info_body, playlist_body};
pub use discogs_parser::{clean_name, is_compilation, parse_album, parse_year};
pub use filename::{sanitize_filename, sanitize_with_config};
pub use folder_scanner::{discover_files, DiscoveredFiles};
pub use position_parser::{parse_disc_position, DiscPosition};
pub use release_plan::ReleasePlan;
pub use template::{render, render_dir, render_name, RenderContext, Token};
pub use track_resolver::resolve_tracks;
pub use track_to_file_mapper::map_tracks_to_files;
pub use types::{CanonicalAlbum, CanonicalTrack, DiscSummary, TagMapEntry, TrackList};
