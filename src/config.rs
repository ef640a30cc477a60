use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

const ENV_PREFIX: &str = "DISCOTAG_";

/// Default audio types picked up from a source directory
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["flac", "mp3", "wav", "m4a", "aac", "ogg"];

/// Tagging configuration
///
/// Loaded from `DISCOTAG_*` environment variables (optionally via a `.env`
/// file). Unset values fall back to `Default`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Joins multiple credited artists into one string
    pub artist_separator: String,
    /// Joins genre and style lists into one string
    pub genre_separator: String,
    /// Value of `%GROUP%`
    pub group_name: String,
    pub dir_format: String,
    pub m3u_format: String,
    pub nfo_format: String,
    pub song_format: String,
    /// Song format used for compilations
    pub va_song_format: String,
    /// Disc folder prefix; the disc number is appended
    pub disc_folder_format: String,
    /// Suffix appended to the album tag of split-disc releases
    pub disc_title_format: Option<String>,
    /// Tag multi-disc releases per disc even when they share one folder
    pub split_discs: bool,
    pub split_discs_folder: bool,
    pub use_lower_filenames: bool,
    /// Use the first style instead of the first genre as `genre`
    pub use_style: bool,
    /// Substitutions applied to file names before normalization
    pub char_exceptions: BTreeMap<String, String>,
    pub audio_extensions: Vec<String>,
    pub copy_other_files: bool,
    pub write_m3u: bool,
    pub write_nfo: bool,
    /// Leave the source files in place once copied; the copy step reads this
    pub keep_original: bool,
    /// Per-release override file looked up in the source directory
    pub id_file: String,
    /// Key in the id file that holds the release id
    pub id_tag: String,
    /// Personal access token for the Discogs API
    #[serde(skip)]
    pub discogs_api_key: Option<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            artist_separator: " & ".to_string(),
            genre_separator: ", ".to_string(),
            group_name: "jW".to_string(),
            dir_format: "%ALBARTIST%-%ALBTITLE%-(%CATNO%)-%YEAR%-%GROUP%".to_string(),
            m3u_format: "00-%ALBARTIST%-%ALBTITLE%.m3u".to_string(),
            nfo_format: "00-%ALBARTIST%-%ALBTITLE%.nfo".to_string(),
            song_format: "%TRACKNO%-%ARTIST%-%TITLE%%TYPE%".to_string(),
            va_song_format: "%TRACKNO%-%ARTIST%-%TITLE%%TYPE%".to_string(),
            disc_folder_format: "%ALBTITLE%-CD".to_string(),
            disc_title_format: None,
            split_discs: false,
            split_discs_folder: true,
            use_lower_filenames: false,
            use_style: false,
            char_exceptions: default_char_exceptions(),
            audio_extensions: DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            copy_other_files: false,
            write_m3u: true,
            write_nfo: true,
            keep_original: true,
            id_file: "id.txt".to_string(),
            id_tag: "discogs_id".to_string(),
            discogs_api_key: None,
        }
    }
}

fn default_char_exceptions() -> BTreeMap<String, String> {
    [
        ("&", "and"),
        (" ", "_"),
        ("ö", "oe"),
        ("Ö", "Oe"),
        ("Ä", "Ae"),
        ("ä", "ae"),
        ("Ü", "Ue"),
        ("ü", "ue"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Config files cannot express a bare space as a key
fn exception_key(key: &str) -> String {
    match key {
        "{space}" => " ".to_string(),
        other => other.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Separators are often quoted so surrounding whitespace survives
fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}

impl TaggerConfig {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_ok() {
            info!("Config: loaded .env file");
        } else {
            debug!("Config: no .env file found, using process environment");
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a `DISCOTAG_*` key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        macro_rules! string_var {
            ($name:literal, $field:ident) => {
                if let Some(value) = get($name) {
                    config.$field = value;
                }
            };
        }

        macro_rules! bool_var {
            ($name:literal, $field:ident) => {
                if let Some(value) = get($name) {
                    match parse_bool(&value) {
                        Some(flag) => config.$field = flag,
                        None => warn!("Config: ignoring non-boolean {}{}={}", ENV_PREFIX, $name, value),
                    }
                }
            };
        }

        if let Some(value) = get("ARTIST_SEPARATOR") {
            config.artist_separator = unquote(&value);
        }
        if let Some(value) = get("GENRE_SEPARATOR") {
            config.genre_separator = unquote(&value);
        }
        string_var!("GROUP", group_name);
        string_var!("DIR_FORMAT", dir_format);
        string_var!("M3U_FORMAT", m3u_format);
        string_var!("NFO_FORMAT", nfo_format);
        string_var!("SONG_FORMAT", song_format);
        string_var!("VA_SONG_FORMAT", va_song_format);
        string_var!("DISC_FOLDER_FORMAT", disc_folder_format);
        string_var!("ID_FILE", id_file);
        string_var!("ID_TAG", id_tag);

        config.discogs_api_key = get("DISCOGS_API_KEY").filter(|key| !key.trim().is_empty());

        if let Some(value) = get("DISC_TITLE_FORMAT") {
            config.disc_title_format = Some(unquote(&value)).filter(|v| !v.is_empty());
        }

        bool_var!("SPLIT_DISCS", split_discs);
        bool_var!("SPLIT_DISCS_FOLDER", split_discs_folder);
        bool_var!("USE_LOWER_FILENAMES", use_lower_filenames);
        bool_var!("USE_STYLE", use_style);
        bool_var!("COPY_OTHER_FILES", copy_other_files);
        bool_var!("WRITE_M3U", write_m3u);
        bool_var!("WRITE_NFO", write_nfo);
        bool_var!("KEEP_ORIGINAL", keep_original);

        if let Some(value) = get("AUDIO_EXTENSIONS") {
            config.audio_extensions = value
                .split(',')
                .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect();
        }

        if let Some(value) = get("CHAR_EXCEPTIONS") {
            match serde_json::from_str::<BTreeMap<String, String>>(&value) {
                Ok(map) => {
                    config.char_exceptions = map
                        .into_iter()
                        .map(|(k, v)| (exception_key(&k), v))
                        .collect();
                }
                Err(e) => warn!("Config: ignoring malformed {}CHAR_EXCEPTIONS: {}", ENV_PREFIX, e),
            }
        }

        config
    }

    /// Song template for this release (compilations use their own)
    pub fn song_format_for(&self, is_compilation: bool) -> &str {
        if is_compilation {
            &self.va_song_format
        } else {
            &self.song_format
        }
    }
}

/// Per-release settings read from an id file in the source directory
///
/// ```text
/// discogs_id=40522
/// group=xyz
/// tag:comments=ripped from vinyl
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseOverrides {
    entries: BTreeMap<String, String>,
}

impl ReleaseOverrides {
    pub fn parse(contents: &str) -> Self {
        let entries = contents
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
            .collect();

        Self { entries }
    }

    /// Read the id file from `source_dir`, returning empty overrides if absent
    pub fn load(source_dir: &Path, id_file: &str) -> std::io::Result<Self> {
        let path = source_dir.join(id_file);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Loaded release overrides from {}", path.display());
                Ok(Self::parse(&contents))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Release id stored under the configured id tag
    pub fn release_id(&self, id_tag: &str) -> Option<u64> {
        self.get(id_tag).and_then(|id| id.trim().parse().ok())
    }

    /// `tag:<name>` entries, handed to the tag writer untouched
    pub fn extra_tags(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix("tag:")
                    .map(|tag| (tag.to_string(), value.clone()))
            })
            .collect()
    }

    /// Return a copy of `config` with this release's option keys applied
    pub fn apply(&self, config: &TaggerConfig) -> TaggerConfig {
        let mut config = config.clone();

        for (name, value) in &self.entries {
            match name.as_str() {
                "dir" => config.dir_format = value.clone(),
                "song" => config.song_format = value.clone(),
                "va_song" => config.va_song_format = value.clone(),
                "discs" => config.disc_folder_format = value.clone(),
                "group" => config.group_name = value.clone(),
                "split_artists" => config.artist_separator = unquote(value),
                "split_genres_and_styles" => config.genre_separator = unquote(value),
                "split_discs_extension" => {
                    config.disc_title_format = Some(unquote(value)).filter(|v| !v.is_empty())
                }
                "split_discs" => match parse_bool(value) {
                    Some(flag) => config.split_discs = flag,
                    None => warn!("Ignoring non-boolean override {}={}", name, value),
                },
                "split_discs_folder" => match parse_bool(value) {
                    Some(flag) => config.split_discs_folder = flag,
                    None => warn!("Ignoring non-boolean override {}={}", name, value),
                },
                "use_style" => match parse_bool(value) {
                    Some(flag) => config.use_style = flag,
                    None => warn!("Ignoring non-boolean override {}={}", name, value),
                },
                other if other == config.id_tag || other.starts_with("tag:") => {}
                other => debug!("Ignoring unknown release override '{}'", other),
            }
        }

        config
    }
}
