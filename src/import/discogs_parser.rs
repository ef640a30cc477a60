use crate::config::TaggerConfig;
use crate::discogs::{DiscogsArtist, DiscogsRelease};
use crate::import::types::CanonicalAlbum;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Artist credit Discogs uses for compilations
const VARIOUS_ARTISTS: &str = "Various";
/// Formats that are tagged as one disc whatever their quantity
const SINGLE_DISC_FORMATS: &[&str] = &["File", "Vinyl"];
const DEFAULT_YEAR: &str = "1900";
const UNDEFINED: &str = "Undefined";
const UNKNOWN: &str = "Unknown";
const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Discogs' own placeholder for releases without a catalog number
const NO_CATALOG_NUMBER: &str = "none";

fn disambiguation_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Metro Area (3) -> Metro Area
    PATTERN.get_or_init(|| Regex::new(r"(?:\s*\(\d+\))+$").expect("valid regex"))
}

fn trailing_article() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Aphex Twin, The -> The Aphex Twin
    PATTERN.get_or_init(|| Regex::new(r"^(.*),\s+The$").expect("valid regex"))
}

fn four_digits() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{4}").expect("valid regex"))
}

/// Clean up an artist or label name as listed by Discogs.
///
/// Strips the numeric disambiguation suffix, then moves a trailing ", The"
/// to the front: `"Goldie (12)"` becomes `"Goldie"`, `"Aphex Twin, The"`
/// becomes `"The Aphex Twin"`.
pub fn clean_name(name: &str) -> String {
    let mut current = name.trim().to_string();

    // Each rewrite shortens the string, so this settles quickly
    loop {
        let stripped = disambiguation_suffix().replace(&current, "");
        let next = trailing_article()
            .replace(stripped.trim(), "The $1")
            .into_owned();

        if next == current {
            return current;
        }
        current = next;
    }
}

/// Cleaned display names of every credit that has one
pub fn artist_names(artists: &[DiscogsArtist]) -> Vec<String> {
    artists
        .iter()
        .filter_map(DiscogsArtist::display_name)
        .map(clean_name)
        .collect()
}

/// First four consecutive digits of the raw year, or "1900"
pub fn parse_year(raw: Option<&str>) -> String {
    match raw.and_then(|year| four_digits().find(year)) {
        Some(found) => found.as_str().to_string(),
        None => {
            warn!("Unparseable release year {:?}, using {}", raw, DEFAULT_YEAR);
            DEFAULT_YEAR.to_string()
        }
    }
}

/// Number of discs, taken from the first format descriptor
pub fn disc_total(release: &DiscogsRelease) -> u32 {
    let Some(format) = release.formats.first() else {
        warn!("Release {} lists no formats, assuming 1 disc", release.id);
        return 1;
    };

    if SINGLE_DISC_FORMATS.contains(&format.name.as_str()) {
        return 1;
    }

    match format.qty.as_deref().map(str::trim).map(str::parse::<u32>) {
        Some(Ok(qty)) => qty.max(1),
        _ => {
            warn!(
                "Unparseable format quantity {:?} on release {}, assuming 1 disc",
                format.qty, release.id
            );
            1
        }
    }
}

/// "Various" as primary artist, or any format described as a compilation
pub fn is_compilation(release: &DiscogsRelease) -> bool {
    let various = release
        .artists
        .first()
        .and_then(DiscogsArtist::display_name)
        .map(|name| name == VARIOUS_ARTISTS)
        .unwrap_or(false);

    various
        || release.formats.iter().any(|format| {
            format
                .descriptions
                .iter()
                .any(|description| description.eq_ignore_ascii_case("compilation"))
        })
}

fn first_or_default(values: &[String], what: &str, release_id: u64) -> String {
    match values.first() {
        Some(value) => value.clone(),
        None => {
            warn!("Release {} has no {}, using {}", release_id, what, UNDEFINED);
            UNDEFINED.to_string()
        }
    }
}

fn joined_or_default(values: &[String], separator: &str) -> String {
    if values.is_empty() {
        UNDEFINED.to_string()
    } else {
        values.join(separator)
    }
}

/// Derive album-level facts from a Discogs release.
///
/// Missing or malformed fields are replaced with defaults (and logged);
/// this never fails.
pub fn parse_album(release: &DiscogsRelease, config: &TaggerConfig) -> CanonicalAlbum {
    let artists = artist_names(&release.artists);

    let (artist, sort_artist) = if artists.is_empty() {
        warn!(
            "Release {} has no named artist credit, using '{}'",
            release.id, UNKNOWN_ARTIST
        );
        (UNKNOWN_ARTIST.to_string(), UNKNOWN_ARTIST.to_string())
    } else {
        (artists.join(&config.artist_separator), artists[0].clone())
    };

    let (label, catalog_number) = match release.labels.first() {
        Some(label) => (
            clean_name(&label.name),
            label
                .catno
                .clone()
                .filter(|catno| !catno.trim().is_empty())
                .unwrap_or_else(|| NO_CATALOG_NUMBER.to_string()),
        ),
        None => {
            warn!("Release {} has no label, using '{}'", release.id, UNKNOWN);
            (UNKNOWN.to_string(), NO_CATALOG_NUMBER.to_string())
        }
    };

    let style = first_or_default(&release.styles, "styles", release.id);
    let genre = if config.use_style {
        style.clone()
    } else {
        first_or_default(&release.genres, "genres", release.id)
    };

    let country = release
        .country
        .clone()
        .filter(|country| !country.trim().is_empty())
        .unwrap_or_else(|| {
            warn!("Release {} has no country, using '{}'", release.id, UNKNOWN);
            UNKNOWN.to_string()
        });

    let album = CanonicalAlbum {
        release_id: release.id,
        title: release.title.trim().to_string(),
        artist,
        artists,
        sort_artist,
        label,
        catalog_number,
        year: parse_year(release.year.as_deref()),
        genre,
        genres: joined_or_default(&release.genres, &config.genre_separator),
        style,
        styles: joined_or_default(&release.styles, &config.genre_separator),
        country,
        master_id: release.master_id,
        note: release.notes.clone().filter(|note| !note.trim().is_empty()),
        disc_total: disc_total(release),
        is_compilation: is_compilation(release),
    };

    debug!(
        "Resolved album '{} - {}' ({} disc(s), compilation={})",
        album.artist, album.title, album.disc_total, album.is_compilation
    );

    album
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discogs::{DiscogsFormat, DiscogsLabel};

    fn format(name: &str, qty: &str, descriptions: &[&str]) -> DiscogsFormat {
        DiscogsFormat {
            name: name.to_string(),
            qty: Some(qty.to_string()),
            descriptions: descriptions.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn create_test_release() -> DiscogsRelease {
        DiscogsRelease {
            id: 40522,
            title: "House For All".to_string(),
            year: Some("1993".to_string()),
            labels: vec![DiscogsLabel {
                name: "Definitive Recordings".to_string(),
                catno: Some("12DEF006".to_string()),
            }],
            genres: vec!["Electronic".to_string()],
            styles: vec!["House".to_string(), "Garage House".to_string()],
            artists: vec![DiscogsArtist::named("Blunted Dummies")],
            formats: vec![format("Vinyl", "1", &["12\"", "33 ⅓ RPM"])],
            master_id: Some(206510),
            country: Some("Canada".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("Goldie (12)"), "Goldie");
        assert_eq!(clean_name("Aphex Twin, The"), "The Aphex Twin");
        assert_eq!(clean_name("Beatles, The (2)"), "The Beatles");
        assert_eq!(clean_name("Metro Area"), "Metro Area");
        assert_eq!(clean_name("Sunn O)))"), "Sunn O)))");
    }

    #[test]
    fn test_clean_name_is_idempotent() {
        for name in [
            "Goldie (12)",
            "Goldie (12) (3)",
            "Aphex Twin, The",
            "Beatles, The (2)",
            "Foo (1), The",
            "The The",
            "",
        ] {
            let once = clean_name(name);
            assert_eq!(clean_name(&once), once, "not idempotent for {:?}", name);
        }
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(Some("1993")), "1993");
        assert_eq!(parse_year(Some("1993-05")), "1993");
        assert_eq!(parse_year(Some("unknown")), "1900");
        assert_eq!(parse_year(Some("0")), "1900");
        assert_eq!(parse_year(None), "1900");
    }

    #[test]
    fn test_disc_total() {
        let mut release = create_test_release();
        release.formats = vec![format("CD", "2", &[])];
        assert_eq!(disc_total(&release), 2);

        release.formats = vec![format("File", "2", &["320 kbps"])];
        assert_eq!(disc_total(&release), 1);

        release.formats = vec![format("Vinyl", "3", &["LP"])];
        assert_eq!(disc_total(&release), 1);

        release.formats = vec![format("CD", "0", &[])];
        assert_eq!(disc_total(&release), 1);

        release.formats = vec![format("CD", "two", &[])];
        assert_eq!(disc_total(&release), 1);

        release.formats.clear();
        assert_eq!(disc_total(&release), 1);
    }

    #[test]
    fn test_compilation_detection() {
        let mut release = create_test_release();
        assert!(!is_compilation(&release));

        release.artists = vec![DiscogsArtist::named("Various")];
        assert!(is_compilation(&release));

        release.artists = vec![DiscogsArtist::named("Blunted Dummies")];
        release.formats = vec![format("CD", "1", &["Album", "compilation"])];
        assert!(is_compilation(&release));
    }

    #[test]
    fn test_parse_album() {
        let album = parse_album(&create_test_release(), &TaggerConfig::default());

        assert_eq!(album.title, "House For All");
        assert_eq!(album.artist, "Blunted Dummies");
        assert_eq!(album.sort_artist, "Blunted Dummies");
        assert_eq!(album.label, "Definitive Recordings");
        assert_eq!(album.catalog_number, "12DEF006");
        assert_eq!(album.year, "1993");
        assert_eq!(album.genre, "Electronic");
        assert_eq!(album.style, "House");
        assert_eq!(album.styles, "House, Garage House");
        assert_eq!(album.country, "Canada");
        assert_eq!(album.master_id, Some(206510));
        assert_eq!(album.note, None);
        assert_eq!(album.disc_total, 1);
        assert!(!album.is_compilation);
        assert_eq!(album.url(), "http://www.discogs.com/release/40522");
        assert_eq!(
            album.master_url().as_deref(),
            Some("http://www.discogs.com/master/206510")
        );
    }

    #[test]
    fn test_parse_album_joins_and_cleans_artists() {
        let mut release = create_test_release();
        release.artists = vec![
            DiscogsArtist::named("Goldie (12)"),
            DiscogsArtist::default(),
            DiscogsArtist::named("Aphex Twin, The"),
        ];
        let config = TaggerConfig {
            artist_separator: "&".to_string(),
            use_style: true,
            ..TaggerConfig::default()
        };

        let album = parse_album(&release, &config);
        assert_eq!(album.artist, "Goldie&The Aphex Twin");
        assert_eq!(album.sort_artist, "Goldie");
        assert_eq!(album.genre, "House");
    }

    #[test]
    fn test_parse_album_defaults_for_missing_fields() {
        let release = DiscogsRelease {
            id: 1,
            title: "Untitled".to_string(),
            year: Some("????".to_string()),
            notes: Some("  ".to_string()),
            ..Default::default()
        };

        let album = parse_album(&release, &TaggerConfig::default());
        assert_eq!(album.year, "1900");
        assert_eq!(album.country, "Unknown");
        assert_eq!(album.label, "Unknown");
        assert_eq!(album.catalog_number, "none");
        assert_eq!(album.genre, "Undefined");
        assert_eq!(album.styles, "Undefined");
        assert_eq!(album.artist, "Unknown Artist");
        assert_eq!(album.master_id, None);
        assert_eq!(album.note, None);
        assert_eq!(album.disc_total, 1);
    }
}
