//! `%TOKEN%` placeholder rendering for file, folder and sidecar names.

use crate::config::TaggerConfig;
use crate::import::filename::sanitize_with_config;
use crate::import::types::{CanonicalAlbum, CanonicalTrack};
use std::path::PathBuf;

const MARKER: char = '%';

/// A placeholder recognized inside name templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    AlbumTitle,
    AlbumArtist,
    Year,
    CatalogNumber,
    Genre,
    Style,
    Label,
    Group,
    Country,
    Artist,
    Title,
    TrackNumber,
    DiscNumber,
    FileType,
}

impl Token {
    pub fn from_name(name: &str) -> Option<Self> {
        let token = match name {
            "ALBTITLE" => Token::AlbumTitle,
            "ALBARTIST" => Token::AlbumArtist,
            "YEAR" => Token::Year,
            "CATNO" => Token::CatalogNumber,
            "GENRE" => Token::Genre,
            "STYLE" => Token::Style,
            "LABEL" => Token::Label,
            "GROUP" => Token::Group,
            "COUNTRY" => Token::Country,
            "ARTIST" => Token::Artist,
            "TITLE" => Token::Title,
            "TRACKNO" => Token::TrackNumber,
            "DISCNO" => Token::DiscNumber,
            "TYPE" => Token::FileType,
            _ => return None,
        };
        Some(token)
    }

    /// Value of this token; track tokens are empty outside a track context
    fn value(self, context: &RenderContext<'_>) -> String {
        let album = context.album;
        let track = context.track;

        match self {
            Token::AlbumTitle => album.title.clone(),
            Token::AlbumArtist => album.artist.clone(),
            Token::Year => album.year.clone(),
            Token::CatalogNumber => album.catalog_number.clone(),
            Token::Genre => album.genre.clone(),
            Token::Style => album.style.clone(),
            Token::Label => album.label.clone(),
            Token::Group => context.config.group_name.clone(),
            Token::Country => album.country.clone(),
            Token::Artist => track.map(|t| t.artist.clone()).unwrap_or_default(),
            Token::Title => track.map(|t| t.title.clone()).unwrap_or_default(),
            Token::TrackNumber => track
                .map(|t| format!("{:02}", t.track_number))
                .unwrap_or_default(),
            Token::DiscNumber => track
                .map(|t| t.disc_number.to_string())
                .unwrap_or_default(),
            Token::FileType => context.file_type.unwrap_or_default().to_string(),
        }
    }
}

/// Everything a template can draw values from
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub album: &'a CanonicalAlbum,
    pub track: Option<&'a CanonicalTrack>,
    /// Original file extension including its dot, e.g. `".flac"`
    pub file_type: Option<&'a str>,
    pub config: &'a TaggerConfig,
}

impl<'a> RenderContext<'a> {
    pub fn for_album(album: &'a CanonicalAlbum, config: &'a TaggerConfig) -> Self {
        Self {
            album,
            track: None,
            file_type: None,
            config,
        }
    }

    pub fn for_track(
        album: &'a CanonicalAlbum,
        track: &'a CanonicalTrack,
        file_type: Option<&'a str>,
        config: &'a TaggerConfig,
    ) -> Self {
        Self {
            album,
            track: Some(track),
            file_type,
            config,
        }
    }
}

/// Substitute every recognized token in a single left-to-right pass.
///
/// Substituted values are never rescanned, so a title containing
/// `%ARTIST%` stays literal. Unknown `%NAME%` sequences and stray markers
/// are copied through unchanged.
pub fn render(template: &str, context: &RenderContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(MARKER) {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let token = after
            .find(MARKER)
            .and_then(|end| Token::from_name(&after[..end]).map(|token| (token, end)));

        match token {
            Some((token, end)) => {
                out.push_str(&token.value(context));
                rest = &after[end + 1..];
            }
            None => {
                out.push(MARKER);
                rest = after;
            }
        }
    }
    out.push_str(rest);

    if context.config.use_lower_filenames {
        out.to_lowercase()
    } else {
        out
    }
}

/// Render and sanitize a single file or folder name
pub fn render_name(template: &str, context: &RenderContext<'_>) -> String {
    sanitize_with_config(&render(template, context), context.config)
}

/// Render a directory template that may contain `/`-separated segments.
///
/// Each template segment is rendered and sanitized on its own, so a `/`
/// inside a value (`AC/DC`) never adds a level. Segments that sanitize to
/// nothing are dropped; if none remain the release id is used.
pub fn render_dir(template: &str, context: &RenderContext<'_>) -> PathBuf {
    let segments: Vec<String> = template
        .split('/')
        .map(|segment| render_name(segment, context))
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        return PathBuf::from(context.album.release_id.to_string());
    }

    segments.iter().collect()
}
