//! Disc and track numbers from Discogs position strings.
//!
//! Discogs is inconsistent about multi-disc positions. The schemes below
//! are tried in order and the first match wins; add new ones as releases
//! turn up that none of them cover.

use regex::Regex;
use std::sync::OnceLock;

/// Resolved disc and track number, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscPosition {
    pub disc_number: u32,
    pub track_number: u32,
}

impl DiscPosition {
    pub fn new(disc_number: u32, track_number: u32) -> Self {
        Self {
            disc_number,
            track_number,
        }
    }
}

fn numbering_schemes() -> &'static [Regex] {
    static SCHEMES: OnceLock<Vec<Regex>> = OnceLock::new();
    SCHEMES.get_or_init(|| {
        [
            r"^CD(?P<disc>\d+)-(?P<track>\d+)$", // CD01-12
            r"^(?P<disc>\d+)-(?P<track>\d+)$",   // 1-02
            r"^(?P<disc>\d+)\.(?P<track>\d+)$",  // 1.05
        ]
        .iter()
        .map(|scheme| Regex::new(scheme).expect("valid numbering scheme"))
        .collect()
    })
}

/// Parse a multi-disc position such as `"CD01-12"`, `"1-02"` or `"1.05"`.
///
/// Returns `None` when no scheme matches or a number is zero.
pub fn parse_disc_position(position: &str) -> Option<DiscPosition> {
    let position = position.trim();

    numbering_schemes().iter().find_map(|scheme| {
        let captures = scheme.captures(position)?;
        let disc_number = captures["disc"].parse::<u32>().ok()?;
        let track_number = captures["track"].parse::<u32>().ok()?;

        (disc_number > 0 && track_number > 0)
            .then(|| DiscPosition::new(disc_number, track_number))
    })
}

/// Resolve a position on a single-disc release.
///
/// A plain number is the track number, and so is the track part of a disc
/// scheme (the disc is always 1 here). Anything else (vinyl sides such as
/// `"A1"`, empty positions) falls back to the sequential index among real
/// tracks.
pub fn parse_single_disc_position(position: &str, sequential: u32) -> DiscPosition {
    let trimmed = position.trim();

    if let Ok(track_number) = trimmed.parse::<u32>() {
        if track_number > 0 {
            return DiscPosition::new(1, track_number);
        }
    }

    parse_disc_position(trimmed)
        .map(|parsed| DiscPosition::new(1, parsed.track_number))
        .unwrap_or_else(|| DiscPosition::new(1, sequential))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_schemes() {
        assert_eq!(parse_disc_position("CD01-12"), Some(DiscPosition::new(1, 12)));
        assert_eq!(parse_disc_position("1-02"), Some(DiscPosition::new(1, 2)));
        assert_eq!(parse_disc_position("1.05"), Some(DiscPosition::new(1, 5)));
        assert_eq!(parse_disc_position("2-10"), Some(DiscPosition::new(2, 10)));
        assert_eq!(parse_disc_position(" CD2-3 "), Some(DiscPosition::new(2, 3)));
    }

    #[test]
    fn test_unparseable_positions() {
        assert_eq!(parse_disc_position("A1"), None);
        assert_eq!(parse_disc_position("7"), None);
        assert_eq!(parse_disc_position(""), None);
        assert_eq!(parse_disc_position("1x05"), None);
        assert_eq!(parse_disc_position("1-0"), None);
        assert_eq!(parse_disc_position("CD1-"), None);
    }

    #[test]
    fn test_single_disc_fallback() {
        assert_eq!(parse_single_disc_position("3", 1), DiscPosition::new(1, 3));
        assert_eq!(parse_single_disc_position("A1", 1), DiscPosition::new(1, 1));
        assert_eq!(parse_single_disc_position("B2", 4), DiscPosition::new(1, 4));
        assert_eq!(parse_single_disc_position("", 6), DiscPosition::new(1, 6));
        assert_eq!(parse_single_disc_position("0", 2), DiscPosition::new(1, 2));
        assert_eq!(parse_single_disc_position("1-04", 9), DiscPosition::new(1, 4));
        assert_eq!(parse_single_disc_position("2-03", 9), DiscPosition::new(1, 3));
    }
}
