use crate::app::config::audio::AudioConfig;
use crate::app::config::binds::BindsConfig;
use crate::app::config::colors::ColorsConfig;
use crate::app::config::logging::LoggingConfig;
use crate::app::config::source::SourceConfig;
use crate::app::library::FilterMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub mode: FilterMode,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub colors: ColorsConfig,
    #[serde(default)]
    pub binds: BindsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

const KNOWN_SECTIONS: &[&str] = &["source", "filter", "audio", "colors", "binds", "logging"];

const KNOWN_SOURCE_FIELDS: &[&str] = &[
    "base_url",
    "request_timeout_secs",
    "connect_timeout_secs",
];

const KNOWN_FILTER_FIELDS: &[&str] = &["mode"];

const KNOWN_AUDIO_FIELDS: &[&str] = &["enabled", "mpd_address", "status_interval_ms"];

const KNOWN_COLORS_FIELDS: &[&str] = &[
    "border",
    "border_title",
    "artist",
    "album",
    "song_title",
    "track_number",
    "duration",
    "selected_highlight",
    "selected_text",
    "now_playing",
    "placeholder",
    "playing",
    "paused",
    "stopped",
    "error",
];

const KNOWN_BINDS_FIELDS: &[&str] = &[
    "quit",
    "navigate_up",
    "navigate_down",
    "go_to_top",
    "go_to_bottom",
    "open",
    "back",
    "search",
    "toggle_sort",
    "toggle_play_pause",
    "reload",
];

const KNOWN_LOGGING_FIELDS: &[&str] = &[
    "enabled",
    "level",
    "log_to_console",
    "append_to_file",
    "rotate_logs",
    "rotation_size_mb",
    "keep_log_files",
    "directory",
];

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest candidate within a reasonable edit distance
fn find_similar<'a>(unknown: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let unknown_lower = unknown.to_lowercase();

    candidates
        .iter()
        .map(|&candidate| {
            (
                candidate,
                levenshtein_distance(&unknown_lower, &candidate.to_lowercase()),
            )
        })
        .filter(|&(candidate, distance)| {
            let threshold = (unknown.len().max(candidate.len()) / 2).max(3);
            distance <= threshold
        })
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

fn unknown_section_warning(key: &str) -> String {
    match find_similar(key, KNOWN_SECTIONS) {
        Some(s) => format!("Unknown config section: [{}] (did you mean: [{}]?)", key, s),
        None => format!("Unknown config section: [{}]", key),
    }
}

fn unknown_field_warning(section: &str, key: &str, known: &[&str]) -> String {
    match find_similar(key, known) {
        Some(s) => format!(
            "Unknown option in [{}]: {} (did you mean: {}?)",
            section, key, s
        ),
        None => format!("Unknown option in [{}]: {}", section, key),
    }
}

impl Config {
    /// Returns the default config file path based on the platform:
    /// - Linux: ~/.config/platter/config.toml (XDG_CONFIG_HOME)
    /// - macOS: ~/Library/Application Support/platter/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\platter\config.toml
    pub fn default_config_path() -> color_eyre::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;
        Ok(config_dir.join("platter").join("config.toml"))
    }

    /// Load the config, creating a default file on first run.
    ///
    /// Returns the config plus warnings about unknown keys or a file that
    /// failed to parse. The logger is not running yet, so the caller logs them.
    pub fn load(config_path: Option<PathBuf>) -> color_eyre::Result<(Self, Vec<String>)> {
        let config_path = match config_path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            let config = Config::default();
            config.write_to(&config_path)?;
            eprintln!("Created default config file at: {}", config_path.display());
            return Ok((config, Vec::new()));
        }

        let contents = std::fs::read_to_string(&config_path)?;
        Ok(Self::parse(&contents))
    }

    /// Parse config text. A file that does not parse falls back to defaults
    /// with a warning instead of failing startup.
    pub fn parse(contents: &str) -> (Self, Vec<String>) {
        let mut warnings = Self::check_unknown_fields(contents);

        let config = toml::from_str(contents).unwrap_or_else(|e| {
            warnings.push(format!("Failed to parse config file, using defaults: {}", e));
            Config::default()
        });
        (config, warnings)
    }

    /// Check for unknown fields in the config file and return warnings
    fn check_unknown_fields(contents: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        let table = match toml::from_str::<toml::Table>(contents) {
            Ok(t) => t,
            Err(_) => return warnings, // Let the main parser report it
        };

        for (key, value) in &table {
            let known = match key.as_str() {
                "source" => KNOWN_SOURCE_FIELDS,
                "filter" => KNOWN_FILTER_FIELDS,
                "audio" => KNOWN_AUDIO_FIELDS,
                "colors" => KNOWN_COLORS_FIELDS,
                "binds" => KNOWN_BINDS_FIELDS,
                "logging" => KNOWN_LOGGING_FIELDS,
                _ => {
                    warnings.push(unknown_section_warning(key));
                    continue;
                }
            };

            if let toml::Value::Table(section) = value {
                for field in section.keys() {
                    if !known.contains(&field.as_str()) {
                        warnings.push(unknown_field_warning(key, field, known));
                    }
                }
            }
        }

        warnings
    }

    fn write_to(&self, path: &Path) -> color_eyre::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Generate a default config file at the specified path
    pub fn generate_default(path: PathBuf) -> color_eyre::Result<()> {
        if path.exists() {
            return Err(color_eyre::eyre::eyre!(
                "Config file already exists at: {}",
                path.display()
            ));
        }

        Config::default().write_to(&path)?;
        println!("Generated default config at: {}", path.display());
        Ok(())
    }
}
