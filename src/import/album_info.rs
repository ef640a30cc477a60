//! Text bodies written next to the tagged files: the `.nfo` info sheet and
//! the `.m3u` playlist.

use crate::import::types::{CanonicalAlbum, TagMapEntry, TrackList};

const DIVIDER: &str = "_ _______________________________________________ _ _";

fn join_lines(lines: Vec<String>) -> String {
    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Human-readable release summary followed by one line per track
pub fn info_body(album: &CanonicalAlbum, tracks: &TrackList) -> String {
    let mut lines = vec![
        DIVIDER.to_string(),
        format!("  Name : {} - {}", album.artist, album.title),
        format!(" Label : {}", album.label),
        format!(" Genre : {}", album.genre),
        format!(" Catno : {}", album.catalog_number),
        format!("  Year : {}", album.year),
        format!("   URL : {}", album.url()),
    ];
    if let Some(master_url) = album.master_url() {
        lines.push(format!("Master : {}", master_url));
    }
    lines.push(DIVIDER.to_string());

    lines.extend(
        tracks
            .iter()
            .map(|track| format!("{:02}. {} - {}", track.position, track.artist, track.title)),
    );

    join_lines(lines)
}

/// Extended M3U playlist, paths relative to the album directory
pub fn playlist_body(tag_map: &[TagMapEntry]) -> String {
    let mut lines = vec!["#EXTM3U".to_string()];

    for entry in tag_map {
        lines.push(format!(
            "#EXTINF:-1,{} - {}",
            entry.track.artist, entry.track.title
        ));
        lines.push(match &entry.disc_folder {
            Some(folder) => format!("{}/{}", folder, entry.new_file),
            None => entry.new_file.clone(),
        });
    }

    join_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::types::CanonicalTrack;
    use std::path::PathBuf;

    fn album(master_id: Option<u64>) -> CanonicalAlbum {
        CanonicalAlbum {
            release_id: 40522,
            title: "House For All".to_string(),
            artist: "Blunted Dummies".to_string(),
            artists: vec!["Blunted Dummies".to_string()],
            sort_artist: "Blunted Dummies".to_string(),
            label: "Definitive Recordings".to_string(),
            catalog_number: "12DEF006".to_string(),
            year: "1993".to_string(),
            genre: "Electronic".to_string(),
            genres: "Electronic".to_string(),
            style: "House".to_string(),
            styles: "House".to_string(),
            country: "Canada".to_string(),
            master_id,
            note: None,
            disc_total: 1,
            is_compilation: false,
        }
    }

    fn track(position: u32, title: &str) -> CanonicalTrack {
        CanonicalTrack {
            position,
            disc_number: 1,
            track_number: position,
            artist: "Blunted Dummies".to_string(),
            sort_artist: "Blunted Dummies".to_string(),
            title: title.to_string(),
            discogs_position: position.to_string(),
            disc_subtitle: None,
        }
    }

    #[test]
    fn test_info_body_layout() {
        let tracks = TrackList {
            tracks: vec![track(1, "House For All (Original Mix)"), track(2, "Dub")],
            ..Default::default()
        };

        let body = info_body(&album(Some(206510)), &tracks);
        let lines: Vec<&str> = body.lines().collect();

        assert_eq!(
            lines,
            vec![
                DIVIDER,
                "  Name : Blunted Dummies - House For All",
                " Label : Definitive Recordings",
                " Genre : Electronic",
                " Catno : 12DEF006",
                "  Year : 1993",
                "   URL : http://www.discogs.com/release/40522",
                "Master : http://www.discogs.com/master/206510",
                DIVIDER,
                "01. Blunted Dummies - House For All (Original Mix)",
                "02. Blunted Dummies - Dub",
            ]
        );
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_info_body_without_master() {
        let body = info_body(&album(None), &TrackList::default());
        assert!(!body.contains("Master :"));
        assert!(body.ends_with(&format!("{}\n", DIVIDER)));
    }

    #[test]
    fn test_playlist_body() {
        let entries = vec![
            TagMapEntry {
                track: track(1, "Intro"),
                original_path: PathBuf::from("a.flac"),
                new_file: "01-Intro.flac".to_string(),
                disc_folder: None,
                disc_title_suffix: None,
            },
            TagMapEntry {
                track: track(2, "Outro"),
                original_path: PathBuf::from("b.flac"),
                new_file: "01-Outro.flac".to_string(),
                disc_folder: Some("Album-CD2".to_string()),
                disc_title_suffix: None,
            },
        ];

        assert_eq!(
            playlist_body(&entries),
            "#EXTM3U\n\
             #EXTINF:-1,Blunted Dummies - Intro\n\
             01-Intro.flac\n\
             #EXTINF:-1,Blunted Dummies - Outro\n\
             Album-CD2/01-Outro.flac\n"
        );
    }
}
