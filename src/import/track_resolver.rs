use crate::config::TaggerConfig;
use crate::discogs::{DiscogsRelease, DiscogsTrack};
use crate::error::TaggerError;
use crate::import::discogs_parser::artist_names;
use crate::import::position_parser::{
    parse_disc_position, parse_single_disc_position, DiscPosition,
};
use crate::import::types::{CanonicalAlbum, CanonicalTrack, DiscSummary, TrackList};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Walk the Discogs tracklist once and produce the canonical track order.
///
/// Heading entries (title without position or duration) are not tracks:
/// they consume no position and their title becomes the disc subtitle of
/// the next real track. On a multi-disc release every track position must
/// match a numbering scheme, otherwise the release cannot be placed.
pub fn resolve_tracks(
    release: &DiscogsRelease,
    album: &CanonicalAlbum,
    config: &TaggerConfig,
) -> Result<TrackList, TaggerError> {
    let mut tracks = Vec::new();
    let mut pending_subtitle: Option<String> = None;
    let mut sequential = 0u32;

    for entry in &release.tracklist {
        if entry.is_heading() {
            debug!("Disc subtitle entry: '{}'", entry.title);
            pending_subtitle = Some(entry.title.trim().to_string());
            continue;
        }

        if is_blank(entry) {
            warn!("Skipping empty tracklist entry on release {}", release.id);
            continue;
        }

        sequential += 1;

        let position = resolve_position(entry, album.disc_total, sequential)?;
        let (artist, sort_artist) = resolve_artist(entry, album, config);

        let track = CanonicalTrack {
            position: sequential,
            disc_number: position.disc_number,
            track_number: position.track_number,
            artist,
            sort_artist,
            title: entry.title.trim().to_string(),
            discogs_position: entry.position.clone(),
            disc_subtitle: pending_subtitle.take(),
        };

        debug!(
            "[{:02}] disc {} track {} ({:?}): {} - {}",
            track.position,
            track.disc_number,
            track.track_number,
            track.discogs_position,
            track.artist,
            track.title
        );

        tracks.push(track);
    }

    ensure_unique_positions(&mut tracks, album.disc_total)?;

    let discs = summarize_discs(&tracks);
    if let Some(&highest) = discs.keys().next_back() {
        if highest > album.disc_total {
            warn!(
                "Tracks reach disc {} but release {} lists {} disc(s)",
                highest, release.id, album.disc_total
            );
        }
    }
    info!(
        "Resolved {} tracks across {} disc(s)",
        tracks.len(),
        discs.len()
    );

    Ok(TrackList { tracks, discs })
}

fn is_blank(entry: &DiscogsTrack) -> bool {
    entry.title.trim().is_empty()
        && entry.position.trim().is_empty()
        && entry
            .duration
            .as_deref()
            .map(|d| d.trim().is_empty())
            .unwrap_or(true)
}

fn resolve_position(
    entry: &DiscogsTrack,
    disc_total: u32,
    sequential: u32,
) -> Result<DiscPosition, TaggerError> {
    if disc_total > 1 {
        parse_disc_position(&entry.position).ok_or_else(|| TaggerError::UnparseablePosition {
            position: entry.position.clone(),
            title: entry.title.clone(),
            disc_total,
        })
    } else {
        Ok(parse_single_disc_position(&entry.position, sequential))
    }
}

/// Track credits if the entry has any, otherwise the album's
fn resolve_artist(
    entry: &DiscogsTrack,
    album: &CanonicalAlbum,
    config: &TaggerConfig,
) -> (String, String) {
    let names = artist_names(&entry.artists);

    match names.first() {
        Some(first) => (names.join(&config.artist_separator), first.clone()),
        None => (album.artist.clone(), album.sort_artist.clone()),
    }
}

/// A single disc with colliding numbers is renumbered by position; on a
/// multi-disc release a collision cannot be resolved.
fn ensure_unique_positions(
    tracks: &mut [CanonicalTrack],
    disc_total: u32,
) -> Result<(), TaggerError> {
    let mut seen = HashSet::new();
    let duplicate = tracks
        .iter()
        .map(|t| DiscPosition::new(t.disc_number, t.track_number))
        .find(|position| !seen.insert(*position));

    let Some(duplicate) = duplicate else {
        return Ok(());
    };

    if disc_total > 1 {
        return Err(TaggerError::DuplicatePosition {
            disc_number: duplicate.disc_number,
            track_number: duplicate.track_number,
        });
    }

    warn!(
        "Track number {} appears more than once, numbering tracks sequentially",
        duplicate.track_number
    );
    for track in tracks.iter_mut() {
        track.disc_number = 1;
        track.track_number = track.position;
    }

    Ok(())
}

fn summarize_discs(tracks: &[CanonicalTrack]) -> BTreeMap<u32, DiscSummary> {
    let mut discs: BTreeMap<u32, DiscSummary> = BTreeMap::new();

    for track in tracks {
        let disc = discs
            .entry(track.disc_number)
            .or_insert_with(|| DiscSummary {
                disc_number: track.disc_number,
                track_total: 0,
                subtitle: None,
            });

        disc.track_total = disc.track_total.max(track.track_number);
        if disc.subtitle.is_none() {
            disc.subtitle = track.disc_subtitle.clone();
        }
    }

    discs
}
