//! Filesystem-safe names for rendered templates.
//!
//! The pipeline order matters: substitutions first (so `&` can become
//! `and`), then decomposition so accented letters degrade to their ASCII
//! base instead of being dropped, then the whitelist.

use crate::config::TaggerConfig;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Extensions kept verbatim besides the configured audio ones
pub const SIDECAR_EXTENSIONS: &[&str] = &["m3u", "nfo"];

fn repeated_underscores() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"_{2,}").expect("valid regex"))
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')') || c.is_whitespace()
}

/// Split `name` into stem and extension, only if the extension is known
fn split_known_extension<'a>(name: &'a str, extensions: &[String]) -> (&'a str, Option<&'a str>) {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if extensions.iter().any(|known| known.eq_ignore_ascii_case(ext))
                || SIDECAR_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext)) =>
        {
            (stem, Some(ext))
        }
        _ => (name, None),
    }
}

fn collapse(mut name: String) -> String {
    loop {
        let next = repeated_underscores()
            .replace_all(&name, "_")
            .replace("_-_", "-");
        if next == name {
            return name;
        }
        name = next;
    }
}

/// Upper bound on pipeline passes, for substitution maps that keep growing
const MAX_PASSES: usize = 8;

fn substitute(name: &str, exceptions: &BTreeMap<String, String>) -> String {
    let mut substituted = name.to_string();
    for (from, to) in exceptions {
        if !from.is_empty() {
            substituted = substituted.replace(from.as_str(), to);
        }
    }
    substituted
}

/// One run of substitutions, decomposition, whitelist and collapse
fn sanitize_pass(stem: &str, exceptions: &BTreeMap<String, String>) -> String {
    let filtered: String = substitute(stem, exceptions)
        .nfkd()
        .filter(|c| c.is_ascii() && is_allowed(*c))
        .collect();

    collapse(filtered)
}

/// Names made only of dots (`.`, `..`) address a directory, not an entry
fn is_dot_only(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c == '.')
}

/// Make a rendered name safe to use as a file or directory name.
///
/// Never fails; the empty string stays empty, and so does a name that
/// would be nothing but dots. Decomposition can surface characters the
/// substitution map covers (a no-break space becomes a plain space), so
/// the pipeline reruns until the name stops changing.
pub fn sanitize_filename(
    name: &str,
    exceptions: &BTreeMap<String, String>,
    extensions: &[String],
) -> String {
    let (stem, extension) = split_known_extension(name, extensions);

    let mut sanitized = sanitize_pass(stem, exceptions);
    for _ in 1..MAX_PASSES {
        let next = sanitize_pass(&sanitized, exceptions);
        if next == sanitized {
            break;
        }
        sanitized = next;
    }

    match extension {
        Some(extension) => {
            sanitized.push('.');
            sanitized.push_str(extension);
        }
        None if is_dot_only(&sanitized) => sanitized.clear(),
        None => {}
    }

    sanitized
}

/// [`sanitize_filename`] with the configured substitutions and extensions
pub fn sanitize_with_config(name: &str, config: &TaggerConfig) -> String {
    sanitize_filename(name, &config.char_exceptions, &config.audio_extensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio() -> Vec<String> {
        vec!["flac".to_string(), "mp3".to_string()]
    }

    fn exceptions(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    #[test]
    fn test_degrades_accents_and_strips_punctuation() {
        let map = exceptions(&[(" ", "_"), ("+", "_and_")]);
        assert_eq!(
            sanitize_filename("Th!s%Is^^Ü+ TĚsŤ__", &map, &audio()),
            "ThsIsU_and_TEsT_"
        );
    }

    #[test]
    fn test_default_exceptions() {
        let config = TaggerConfig::default();
        assert_eq!(
            sanitize_with_config("01-Simon & Garfunkel-Über Alles.flac", &config),
            "01-Simon_and_Garfunkel-Ueber_Alles.flac"
        );
        assert_eq!(
            sanitize_with_config("Blunted Dummies - House For All", &config),
            "Blunted_Dummies-House_For_All"
        );
    }

    #[test]
    fn test_known_extension_is_preserved() {
        let map = exceptions(&[(" ", "_")]);
        assert_eq!(sanitize_filename("My Song.FLAC", &map, &audio()), "My_Song.FLAC");
        assert_eq!(sanitize_filename("00-list.m3u", &map, &audio()), "00-list.m3u");
        // Not a known extension, so the dot is just a character
        assert_eq!(sanitize_filename("Mr. Oizo", &map, &audio()), "Mr._Oizo");
        assert_eq!(sanitize_filename("cover.j+pg", &map, &audio()), "cover.jpg");
    }

    #[test]
    fn test_collapses_separators() {
        let map = BTreeMap::new();
        assert_eq!(sanitize_filename("a___b", &map, &audio()), "a_b");
        assert_eq!(sanitize_filename("a_-_b", &map, &audio()), "a-b");
        assert_eq!(sanitize_filename("a__-__b", &map, &audio()), "a-b");
        assert_eq!(sanitize_filename("AC/DC: Live?", &map, &audio()), "ACDC Live");
    }

    #[test]
    fn test_empty_and_fully_stripped_input() {
        let config = TaggerConfig::default();
        assert_eq!(sanitize_with_config("", &config), "");
        assert_eq!(sanitize_with_config("?!*", &config), "");
        assert_eq!(sanitize_with_config("東京", &config), "");
    }

    #[test]
    fn test_unicode_whitespace_gets_substituted() {
        let config = TaggerConfig::default();
        assert_eq!(
            sanitize_with_config("Blunted\u{a0}Dummies", &config),
            "Blunted_Dummies"
        );
        assert_eq!(sanitize_with_config("A\u{3000}B", &config), "A_B");
    }

    #[test]
    fn test_dot_only_names_are_emptied() {
        let config = TaggerConfig::default();
        assert_eq!(sanitize_with_config("..", &config), "");
        assert_eq!(sanitize_with_config("?..", &config), "");
        assert_eq!(sanitize_with_config("...", &config), "");
        assert_eq!(sanitize_with_config("..flac", &config), "..flac");
        assert_eq!(sanitize_with_config("Vol. 2...", &config), "Vol._2...");
    }

    #[test]
    fn test_idempotent() {
        let config = TaggerConfig::default();
        for name in [
            "Th!s%Is^^Ü+ TĚsŤ__",
            "01-Simon & Garfunkel-Über Alles.flac",
            "Björk - Jóga (Howie B Mix).mp3",
            "__-__-__",
            "a _ - _ b",
            "Mr. Oizo.nfo",
            "x.mp3.txt",
            ".flac",
            "\tTabs\tand  spaces ",
            "Blunted\u{a0}Dummies",
            "A\u{3000}B",
            "Em\u{2003}Space.flac",
            "..",
            "",
        ] {
            let once = sanitize_with_config(name, &config);
            assert_eq!(
                sanitize_with_config(&once, &config),
                once,
                "not idempotent for {:?}",
                name
            );
        }
    }
}
