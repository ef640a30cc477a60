use serde::{Deserialize, Deserializer, Serialize};

/// Artist credit from Discogs
///
/// `name` is optional because credit lists occasionally carry entries
/// without a display name (bare join words such as "Presents").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscogsArtist {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl DiscogsArtist {
    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: Some(name.to_string()),
        }
    }

    /// Display name, if the credit has a non-blank one
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Label credit (first entry is the releasing label)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscogsLabel {
    pub name: String,
    #[serde(default)]
    pub catno: Option<String>,
}

/// Format descriptor, e.g. `{"name": "CD", "qty": "2", "descriptions": ["Album"]}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscogsFormat {
    pub name: String,
    /// Quantity as sent by Discogs (a string in the API response)
    #[serde(default, deserialize_with = "string_or_number")]
    pub qty: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
}

/// Represents a tracklist entry from Discogs
///
/// Entries with a title but no position and no duration are headings
/// (disc subtitles), not playable tracks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscogsTrack {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<String>, // Duration as string from Discogs (e.g., "3:45")
    #[serde(default)]
    pub artists: Vec<DiscogsArtist>,
}

impl DiscogsTrack {
    pub fn new(position: &str, title: &str, duration: Option<&str>) -> Self {
        Self {
            position: position.to_string(),
            title: title.to_string(),
            duration: duration.map(str::to_string),
            artists: Vec::new(),
        }
    }

    /// True for title-only entries that name the disc rather than a track
    pub fn is_heading(&self) -> bool {
        let no_duration = self
            .duration
            .as_deref()
            .map(|d| d.trim().is_empty())
            .unwrap_or(true);

        !self.title.trim().is_empty() && self.position.trim().is_empty() && no_duration
    }
}

/// Full release record as returned by `GET /releases/{id}`
///
/// Read-only for the rest of a run; everything derived from it lives in
/// `crate::import::types`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiscogsRelease {
    pub id: u64,
    pub title: String,
    /// Free-form year ("1993", "1993-05", "0", missing...)
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    #[serde(default)]
    pub labels: Vec<DiscogsLabel>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub artists: Vec<DiscogsArtist>,
    #[serde(default)]
    pub tracklist: Vec<DiscogsTrack>,
    #[serde(default)]
    pub formats: Vec<DiscogsFormat>,
    #[serde(default)]
    pub master_id: Option<u64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Accepts `"1993"`, `1993` or `null` for fields Discogs sends inconsistently
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_accepts_number_and_string() {
        let numeric: DiscogsRelease =
            serde_json::from_str(r#"{"id": 1, "title": "A", "year": 1993}"#).unwrap();
        assert_eq!(numeric.year.as_deref(), Some("1993"));

        let text: DiscogsRelease =
            serde_json::from_str(r#"{"id": 1, "title": "A", "year": "1993-05"}"#).unwrap();
        assert_eq!(text.year.as_deref(), Some("1993-05"));

        let missing: DiscogsRelease = serde_json::from_str(r#"{"id": 1, "title": "A"}"#).unwrap();
        assert_eq!(missing.year, None);
        assert!(missing.tracklist.is_empty());
    }

    #[test]
    fn test_heading_detection() {
        assert!(DiscogsTrack::new("", "The Early Years", None).is_heading());
        assert!(DiscogsTrack::new("", "The Early Years", Some("")).is_heading());
        assert!(!DiscogsTrack::new("", "Hidden Track", Some("4:01")).is_heading());
        assert!(!DiscogsTrack::new("A1", "Intro", None).is_heading());
        assert!(!DiscogsTrack::new("", "", None).is_heading());
    }

    #[test]
    fn test_artist_display_name() {
        assert_eq!(DiscogsArtist::named(" Goldie ").display_name(), Some("Goldie"));
        assert_eq!(DiscogsArtist::default().display_name(), None);
        assert_eq!(DiscogsArtist::named("  ").display_name(), None);
    }
}
